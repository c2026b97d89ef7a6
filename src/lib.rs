// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;      // built-in processors
pub mod config;        // pipeline files, registries, runtime
pub mod data;          // values, containers, shapes
pub mod engine;        // execution order + call driver
pub mod errors;        // error handling
pub mod graph;         // tasks, nodes, edges
pub mod observability;
pub mod persistence;   // save / load
pub mod traits;        // processor abstraction
pub mod unit;          // processing-unit contract

pub use config::Runtime;
pub use data::{DataContainer, Value};
pub use engine::Call;
pub use graph::{Graph, Task};
pub use unit::ProcessingUnit;
