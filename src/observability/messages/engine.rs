// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the `process` call lifecycle.
//!
//! This module contains message types for logging events related to:
//! * Call start, completion and failure
//! * Per-node execution and batch sizes

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A `process` call started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ExecutionStarted<'a> {
    pub graph_id: &'a str,
    pub node_count: usize,
    pub input_count: usize,
}

impl Display for ExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting graph execution {}: {} nodes, {} inputs",
            self.graph_id, self.node_count, self.input_count
        )
    }
}

impl StructuredLog for ExecutionStarted<'_> {
    fn log(&self) {
        tracing::info!(
            graph_id = self.graph_id,
            node_count = self.node_count,
            input_count = self.input_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution",
            span_name = name,
            graph_id = self.graph_id,
            node_count = self.node_count,
            input_count = self.input_count,
        )
    }
}

/// A `process` call finished successfully.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ExecutionCompleted<'a> {
    pub graph_id: &'a str,
    pub node_count: usize,
    pub fetched: usize,
    pub duration: std::time::Duration,
}

impl Display for ExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Graph execution {} completed: {} nodes, {} variables fetched in {:?}",
            self.graph_id, self.node_count, self.fetched, self.duration
        )
    }
}

impl StructuredLog for ExecutionCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            graph_id = self.graph_id,
            node_count = self.node_count,
            fetched = self.fetched,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution_completed",
            span_name = name,
            graph_id = self.graph_id,
            fetched = self.fetched,
            duration = ?self.duration,
        )
    }
}

/// A `process` call failed. Slots are cleared regardless.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ExecutionFailed<'a> {
    pub graph_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Graph execution {} failed: {}", self.graph_id, self.error)
    }
}

impl StructuredLog for ExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            graph_id = self.graph_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "execution_failed",
            span_name = name,
            graph_id = self.graph_id,
            error = %self.error,
        )
    }
}

/// A node is about to run.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct NodeExecutionStarted<'a> {
    pub unit: &'a str,
    pub kind: &'a str,
    pub mode: &'a str,
    pub batch_len: usize,
}

impl Display for NodeExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Running unit '{}' ({}, {} mode) on {} elements",
            self.unit, self.kind, self.mode, self.batch_len
        )
    }
}

impl StructuredLog for NodeExecutionStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            unit = self.unit,
            kind = self.kind,
            mode = self.mode,
            batch_len = self.batch_len,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "node_execution",
            span_name = name,
            unit = self.unit,
            kind = self.kind,
            mode = self.mode,
            batch_len = self.batch_len,
        )
    }
}

/// A node finished and wrote its outputs.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct NodeExecutionCompleted<'a> {
    pub unit: &'a str,
    pub outputs: usize,
    pub duration: std::time::Duration,
}

impl Display for NodeExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Unit '{}' produced {} outputs in {:?}",
            self.unit, self.outputs, self.duration
        )
    }
}

impl StructuredLog for NodeExecutionCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            unit = self.unit,
            outputs = self.outputs,
            duration_us = self.duration.as_micros() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "node_completed",
            span_name = name,
            unit = self.unit,
            outputs = self.outputs,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_display() {
        let started = ExecutionStarted {
            graph_id: "g1",
            node_count: 4,
            input_count: 2,
        };
        assert_eq!(started.to_string(), "Starting graph execution g1: 4 nodes, 2 inputs");

        let node = NodeExecutionStarted {
            unit: "add",
            kind: "offset",
            mode: "EACH",
            batch_len: 3,
        };
        assert_eq!(node.to_string(), "Running unit 'add' (offset, EACH mode) on 3 elements");
    }

    #[test]
    fn test_failure_message_includes_error() {
        let error = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let msg = ExecutionFailed {
            graph_id: "g1",
            error: &error,
        };
        assert!(msg.to_string().contains("boom"));
        msg.log();
    }
}
