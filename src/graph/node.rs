// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::data::DataContainer;
use crate::unit::ProcessingUnit;

/// Index of a node in the graph's arena.
pub type NodeId = usize;

/// A unit placed in the graph with its resolved wiring.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub unit: Arc<ProcessingUnit>,
    /// Input variables in argument order.
    pub inputs: Vec<String>,
    /// Output variables in return order.
    pub outputs: Vec<String>,
}

impl Node {
    pub fn name(&self) -> &str {
        self.unit.name()
    }
}

/// Carries one variable from a producer output to one consumer argument.
///
/// The slot holds data only while a call is running.
#[derive(Debug, Clone)]
pub struct Edge {
    pub variable: String,
    pub producer: NodeId,
    pub consumer: NodeId,
    pub output_index: usize,
    pub input_index: usize,
    pub(crate) slot: Option<Arc<DataContainer>>,
}

impl Edge {
    pub(crate) fn new(
        variable: impl Into<String>,
        producer: NodeId,
        output_index: usize,
        consumer: NodeId,
        input_index: usize,
    ) -> Self {
        Self {
            variable: variable.into(),
            producer,
            consumer,
            output_index,
            input_index,
            slot: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.is_some()
    }

    pub fn data(&self) -> Option<&DataContainer> {
        self.slot.as_deref()
    }
}

/// A source variable and the data loaded for the current call.
#[derive(Debug, Clone)]
pub struct SourceSlot {
    pub variable: String,
    pub node: NodeId,
    /// Positional index, `None` for keyword-only sources.
    pub index: Option<usize>,
    pub(crate) loaded: Option<Arc<DataContainer>>,
}
