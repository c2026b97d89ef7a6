// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph construction.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Tasks were added and the graph re-validated.
///
/// # Log Level
/// `info!` - Important operational event
pub struct GraphBuilt<'a> {
    pub graph_id: &'a str,
    pub task_count: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub signature: &'a [String],
}

impl Display for GraphBuilt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Graph {} built from {} tasks: {} nodes, {} edges, signature ({})",
            self.graph_id,
            self.task_count,
            self.node_count,
            self.edge_count,
            self.signature.join(", ")
        )
    }
}

impl StructuredLog for GraphBuilt<'_> {
    fn log(&self) {
        tracing::info!(
            graph_id = self.graph_id,
            task_count = self.task_count,
            node_count = self.node_count,
            edge_count = self.edge_count,
            signature = self.signature.join(", "),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "graph_built",
            span_name = name,
            graph_id = self.graph_id,
            node_count = self.node_count,
            edge_count = self.edge_count,
        )
    }
}

/// A sink was added for a variable nothing consumes.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct SinkSynthesized<'a> {
    pub variable: &'a str,
    pub producer: &'a str,
}

impl Display for SinkSynthesized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Added sink for unconsumed variable '{}' produced by '{}'",
            self.variable, self.producer
        )
    }
}

impl StructuredLog for SinkSynthesized<'_> {
    fn log(&self) {
        tracing::debug!(variable = self.variable, producer = self.producer, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "sink_synthesized",
            span_name = name,
            variable = self.variable,
            producer = self.producer,
        )
    }
}

/// Cyclic dependency detected while ordering nodes.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct CyclicDependencyDetected<'a> {
    pub cycle: &'a [String],
}

impl Display for CyclicDependencyDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cyclic dependency detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for CyclicDependencyDetected<'_> {
    fn log(&self) {
        tracing::error!(
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "cyclic_dependency",
            span_name = name,
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
        )
    }
}

/// A batch of tasks was rejected; the graph is unchanged.
///
/// # Log Level
/// `warn!` - Recoverable, the caller gets the error
pub struct TasksRejected<'a> {
    pub graph_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for TasksRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Rejected tasks for graph {}: {}", self.graph_id, self.error)
    }
}

impl StructuredLog for TasksRejected<'_> {
    fn log(&self) {
        tracing::warn!(graph_id = self.graph_id, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "tasks_rejected",
            span_name = name,
            graph_id = self.graph_id,
            error = %self.error,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message() {
        let cycle = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        let msg = CyclicDependencyDetected { cycle: &cycle };

        assert_eq!(msg.to_string(), "Cyclic dependency detected: a -> b -> a");
    }

    #[test]
    fn test_graph_built_lists_signature() {
        let signature = vec!["zero".to_string(), "one".to_string()];
        let msg = GraphBuilt {
            graph_id: "g",
            task_count: 3,
            node_count: 5,
            edge_count: 4,
            signature: &signature,
        };

        assert!(msg.to_string().ends_with("signature (zero, one)"));
    }
}
