// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Turns an ordered task list into nodes, edges, sources and an execution
//! order. Always builds from the full task list, so a failed build never
//! touches an existing graph.

use std::collections::{HashMap, HashSet};

use crate::config::consts::{is_reserved, SINK_PREFIX};
use crate::engine::order::compute_topological_levels;
use crate::errors::BuildError;
use crate::graph::{Edge, Node, NodeId, SourceSlot, Task};
use crate::observability::messages::{graph::SinkSynthesized, StructuredLog};
use crate::unit::{ProcessingUnit, UnitRole};

/// Where a variable comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Producer {
    pub node: NodeId,
    pub output_index: usize,
}

/// Everything derived from the task list.
#[derive(Debug, Clone)]
pub(crate) struct Layout {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub variables: HashMap<String, Producer>,
    /// Positional sources sorted by index, then keyword sources by name.
    pub sources: Vec<SourceSlot>,
    pub levels: Vec<Vec<NodeId>>,
}

pub(crate) fn assemble(tasks: &[Task]) -> Result<Layout, BuildError> {
    let variables = register_outputs(tasks)?;

    let mut nodes = Vec::with_capacity(tasks.len());
    let mut sources = Vec::new();
    let mut edges = Vec::new();

    for (id, task) in tasks.iter().enumerate() {
        let unit = &task.unit;

        if unit.is_source() {
            if task.outputs.len() != 1 {
                return Err(BuildError::SourceOutputs {
                    unit: unit.name().to_string(),
                    count: task.outputs.len(),
                });
            }
            if let UnitRole::Source { index } = unit.role() {
                sources.push(SourceSlot {
                    variable: task.outputs[0].clone(),
                    node: id,
                    index,
                    loaded: None,
                });
            }
        }

        unit.check_setup(&task.inputs)?;

        for (input_index, variable) in task.inputs.iter().enumerate() {
            let producer = variables.get(variable).ok_or_else(|| BuildError::UnknownVariable {
                variable: variable.clone(),
                unit: unit.name().to_string(),
            })?;

            let producing_unit = &tasks[producer.node].unit;
            if producing_unit.is_void() {
                return Err(BuildError::VoidConsumed {
                    variable: variable.clone(),
                    producer: producing_unit.name().to_string(),
                    consumer: unit.name().to_string(),
                });
            }

            edges.push(Edge::new(
                variable.clone(),
                producer.node,
                producer.output_index,
                id,
                input_index,
            ));
        }

        nodes.push(Node {
            id,
            unit: unit.clone(),
            inputs: task.inputs.clone(),
            outputs: task.outputs.clone(),
        });
    }

    synthesize_sinks(&mut nodes, &mut edges);
    let sources = order_sources(sources)?;
    let levels = compute_topological_levels(&nodes, &edges)?;

    Ok(Layout {
        nodes,
        edges,
        variables,
        sources,
        levels,
    })
}

/// Sink tasks may name their outputs, or declare none. Those names are
/// claimed but never become variables: a sink produces nothing.
fn register_outputs(tasks: &[Task]) -> Result<HashMap<String, Producer>, BuildError> {
    let mut variables = HashMap::new();
    let mut claimed = HashSet::new();

    for (node, task) in tasks.iter().enumerate() {
        let unit = task.unit.name().to_string();
        let is_sink = task.unit.is_sink();

        if task.outputs.is_empty() && !is_sink {
            return Err(BuildError::EmptyOutputs { unit });
        }

        for (output_index, variable) in task.outputs.iter().enumerate() {
            if is_reserved(variable) {
                return Err(BuildError::ReservedName {
                    variable: variable.clone(),
                    unit,
                });
            }
            if !claimed.insert(variable.clone()) {
                return Err(BuildError::DuplicateVariable {
                    variable: variable.clone(),
                    unit,
                });
            }
            if !is_sink {
                variables.insert(variable.clone(), Producer { node, output_index });
            }
        }
    }

    Ok(variables)
}

/// One sink per output variable nothing consumes, skipping void units.
fn synthesize_sinks(nodes: &mut Vec<Node>, edges: &mut Vec<Edge>) {
    let consumed: HashSet<(NodeId, usize)> = edges
        .iter()
        .map(|edge| (edge.producer, edge.output_index))
        .collect();

    let mut sinks = Vec::new();
    for node in nodes.iter() {
        if node.unit.is_void() || node.unit.is_sink() {
            continue;
        }
        for (output_index, variable) in node.outputs.iter().enumerate() {
            if !consumed.contains(&(node.id, output_index)) {
                sinks.push((node.id, output_index, variable.clone()));
            }
        }
    }

    for (producer, output_index, variable) in sinks {
        let id = nodes.len();
        SinkSynthesized {
            variable: &variable,
            producer: nodes[producer].name(),
        }
        .log();

        edges.push(Edge::new(variable.clone(), producer, output_index, id, 0));
        nodes.push(Node {
            id,
            unit: ProcessingUnit::sink(format!("{}{}", SINK_PREFIX, variable)).into_shared(),
            inputs: vec![variable],
            outputs: Vec::new(),
        });
    }
}

/// Positional sources must carry the indices `0..n` exactly once.
fn order_sources(sources: Vec<SourceSlot>) -> Result<Vec<SourceSlot>, BuildError> {
    let (mut positional, mut keyword): (Vec<SourceSlot>, Vec<SourceSlot>) =
        sources.into_iter().partition(|slot| slot.index.is_some());

    positional.sort_by_key(|slot| slot.index);
    let count = positional.len();
    for (expected, slot) in positional.iter().enumerate() {
        let index = slot.index.unwrap_or(expected);
        if index != expected {
            return Err(BuildError::SourceIndex {
                variable: slot.variable.clone(),
                index,
                expected,
                count,
            });
        }
    }

    keyword.sort_by(|a, b| a.variable.cmp(&b.variable));
    positional.extend(keyword);
    Ok(positional)
}
