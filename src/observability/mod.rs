// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types follow a struct-based pattern with a `Display`
//! implementation and a [`messages::StructuredLog`] implementation that emits
//! the same event with typed fields. Call sites never format log strings
//! themselves.
//!
//! # Architecture
//!
//! * `messages::graph` - graph construction, sink synthesis, cycle detection
//! * `messages::engine` - `process` call lifecycle and per-node execution
//! * `messages::persistence` - save, load and checksum events
//! * `logger` - named component loggers handed out by the runtime
//!
//! # Usage
//!
//! ```rust
//! use the_dagflow::observability::messages::{graph::SinkSynthesized, StructuredLog};
//!
//! SinkSynthesized {
//!     variable: "eleven",
//!     producer: "add",
//! }
//! .log();
//! ```

pub mod logger;
pub mod messages;

pub use logger::{Logger, LoggerRegistry};

use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber. `RUST_LOG` wins over `default_filter`.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
