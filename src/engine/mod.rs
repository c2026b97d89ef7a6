// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution engine: order resolution and the `process` call driver.

mod call;
mod executor;
pub mod order;


pub use call::Call;
