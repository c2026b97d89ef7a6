// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in processing units.
//!
//! ## Local Backend
//! In-process processors created by [`local::LocalProcessorFactory`] from a
//! kind name and a JSON state block:
//! - **Plumbing**: `source`, `sink`, `identity`
//! - **Producers**: `constant`
//! - **Numeric**: `offset` (element-wise), `sum` and `stack` (whole batch)
//!
//! The factory backs the default [`crate::config::UnitRegistry`], so every
//! local processor can be declared in a pipeline file and restored from a
//! saved graph.
//!
//! ## Stub Backend (Test-Only)
//! Instrumented processors for engine tests: call counters and forced
//! failures. NOT available in production builds.

pub mod local;
#[cfg(test)]
pub mod stub;
