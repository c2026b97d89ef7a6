// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! # Organization
//!
//! * `graph` - graph construction events
//! * `engine` - execution lifecycle events
//! * `persistence` - save/load events
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_dagflow::observability::messages::engine::ExecutionStarted;
//!
//! let msg = ExecutionStarted {
//!     graph_id: "5c1e",
//!     node_count: 5,
//!     input_count: 2,
//! };
//!
//! tracing::info!("{}", msg);
//! ```

pub mod engine;
pub mod graph;
pub mod persistence;

use tracing::Span;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog: std::fmt::Display {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
