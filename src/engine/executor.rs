// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Drives data through a built graph.
//!
//! A call loads every source, walks the nodes in level order, runs each
//! non-source node once its incoming edges hold data, reads the requested
//! variables and finally clears every edge and source, on success and on
//! failure alike.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::data::{DataContainer, ShapeRegistry};
use crate::engine::Call;
use crate::errors::ExecutionError;
use crate::graph::{Graph, NodeId};
use crate::observability::messages::{
    engine::{
        ExecutionCompleted, ExecutionFailed, ExecutionStarted, NodeExecutionCompleted,
        NodeExecutionStarted,
    },
    StructuredLog,
};

impl Graph {
    /// Run the graph once.
    ///
    /// Takes `&mut self`: a graph serves one call at a time. Use
    /// [`Graph::copy`] to run the same units from several places.
    pub fn process(&mut self, call: Call) -> Result<HashMap<String, DataContainer>, ExecutionError> {
        let graph_id = self.id().to_string();
        let started = ExecutionStarted {
            graph_id: &graph_id,
            node_count: self.nodes().len(),
            input_count: call.input_count(),
        };
        let span = started.span("process");
        let _guard = span.enter();
        started.log();

        let start_time = Instant::now();
        let result = self.run(call);
        self.clear();

        match &result {
            Ok(values) => ExecutionCompleted {
                graph_id: &graph_id,
                node_count: self.nodes().len(),
                fetched: values.len(),
                duration: start_time.elapsed(),
            }
            .log(),
            Err(error) => ExecutionFailed {
                graph_id: &graph_id,
                error,
            }
            .log(),
        }

        result
    }

    fn run(&mut self, call: Call) -> Result<HashMap<String, DataContainer>, ExecutionError> {
        let Call {
            args,
            kwargs,
            fetch,
            skip_checks,
        } = call;

        let runtime = Arc::clone(self.runtime());
        let skip_checks = skip_checks || runtime.options.skip_checks;
        let fetch = self.resolve_fetch(fetch)?;

        self.load_inputs(args, kwargs)?;
        for id in self.execution_order() {
            self.run_node(id, skip_checks, &runtime.shapes)?;
        }

        self.read(&fetch)
    }

    fn resolve_fetch(&self, fetch: Option<Vec<String>>) -> Result<Vec<String>, ExecutionError> {
        let Some(requested) = fetch else {
            return Ok(self
                .variables()
                .into_iter()
                .filter(|variable| !self.is_void_variable(variable))
                .map(String::from)
                .collect());
        };

        for variable in &requested {
            let producer = self
                .producer_of(variable)
                .ok_or_else(|| ExecutionError::UnknownVariable {
                    variable: variable.clone(),
                })?;
            let unit = &self.nodes()[producer.node].unit;
            if unit.is_void() {
                return Err(ExecutionError::UnexpectedInput {
                    reason: format!(
                        "variable '{}' is produced by void unit '{}' and is never stored",
                        variable,
                        unit.name()
                    ),
                });
            }
        }

        Ok(requested)
    }

    fn is_void_variable(&self, variable: &str) -> bool {
        self.producer_of(variable)
            .map(|producer| self.nodes()[producer.node].unit.is_void())
            .unwrap_or(false)
    }

    fn load_inputs(
        &mut self,
        args: Vec<DataContainer>,
        kwargs: Vec<(String, DataContainer)>,
    ) -> Result<(), ExecutionError> {
        let positional = self.positional_count();
        if args.len() > positional {
            return Err(ExecutionError::UnexpectedInput {
                reason: format!(
                    "{} positional inputs supplied but the graph takes {}",
                    args.len(),
                    positional
                ),
            });
        }

        let sources = &mut self.layout_mut().sources;
        for (slot, data) in sources.iter_mut().zip(args) {
            slot.loaded = Some(Arc::new(data));
        }

        for (variable, data) in kwargs {
            let slot = sources
                .iter_mut()
                .find(|slot| slot.variable == variable)
                .ok_or_else(|| ExecutionError::UnexpectedInput {
                    reason: format!("no source named '{}'", variable),
                })?;
            if slot.loaded.is_some() {
                return Err(ExecutionError::InputAlreadyLoaded { variable });
            }
            slot.loaded = Some(Arc::new(data));
        }

        let missing: Vec<String> = sources
            .iter()
            .filter(|slot| slot.loaded.is_none())
            .map(|slot| slot.variable.clone())
            .collect();
        if !missing.is_empty() {
            return Err(ExecutionError::MissingInput { variables: missing });
        }

        Ok(())
    }

    fn run_node(
        &mut self,
        id: NodeId,
        skip_checks: bool,
        shapes: &ShapeRegistry,
    ) -> Result<(), ExecutionError> {
        let layout = self.layout_mut();
        let node = &layout.nodes[id];
        let unit = Arc::clone(&node.unit);

        if unit.is_sink() {
            return Ok(());
        }

        if unit.is_source() {
            let data = layout
                .sources
                .iter()
                .find(|slot| slot.node == id)
                .and_then(|slot| slot.loaded.clone())
                .ok_or_else(|| ExecutionError::NotReady {
                    unit: unit.name().to_string(),
                    variable: node.outputs.first().cloned().unwrap_or_default(),
                })?;
            for edge in layout.edges.iter_mut().filter(|edge| edge.producer == id) {
                edge.slot = Some(Arc::clone(&data));
            }
            return Ok(());
        }

        let outputs = node.outputs.clone();
        let mut batches: Vec<Option<Arc<DataContainer>>> = vec![None; node.inputs.len()];
        for edge in layout.edges.iter().filter(|edge| edge.consumer == id) {
            batches[edge.input_index] = edge.slot.clone();
        }
        let batches: Vec<Arc<DataContainer>> = batches
            .into_iter()
            .zip(&node.inputs)
            .map(|(batch, variable)| {
                batch.ok_or_else(|| ExecutionError::NotReady {
                    unit: unit.name().to_string(),
                    variable: variable.clone(),
                })
            })
            .collect::<Result<_, _>>()?;
        let refs: Vec<&DataContainer> = batches.iter().map(|batch| batch.as_ref()).collect();

        unit.check_lengths(&refs)?;
        if !skip_checks {
            unit.enforce(&refs, shapes)?;
        }

        let node_started = NodeExecutionStarted {
            unit: unit.name(),
            kind: unit.kind(),
            mode: &unit.mode().to_string(),
            batch_len: refs.first().map(|batch| batch.len()).unwrap_or(0),
        };
        let span = node_started.span("run_node");
        let _guard = span.enter();
        node_started.log();

        let start_time = Instant::now();
        let produced = unit.invoke(&refs, &outputs)?;

        NodeExecutionCompleted {
            unit: unit.name(),
            outputs: produced.len(),
            duration: start_time.elapsed(),
        }
        .log();

        for (output_index, data) in produced.into_iter().enumerate() {
            let data = Arc::new(data);
            for edge in layout
                .edges
                .iter_mut()
                .filter(|edge| edge.producer == id && edge.output_index == output_index)
            {
                edge.slot = Some(Arc::clone(&data));
            }
        }

        Ok(())
    }

    fn read(&self, fetch: &[String]) -> Result<HashMap<String, DataContainer>, ExecutionError> {
        let mut values = HashMap::with_capacity(fetch.len());

        for variable in fetch {
            let producer = self
                .producer_of(variable)
                .ok_or_else(|| ExecutionError::UnknownVariable {
                    variable: variable.clone(),
                })?;
            let data = self
                .edges()
                .iter()
                .filter(|edge| edge.producer == producer.node && edge.output_index == producer.output_index)
                .find_map(|edge| edge.data())
                .ok_or_else(|| ExecutionError::NotReady {
                    unit: self.nodes()[producer.node].name().to_string(),
                    variable: variable.clone(),
                })?;
            values.insert(variable.clone(), data.clone());
        }

        Ok(values)
    }

    /// Empty every edge and unload every source.
    fn clear(&mut self) {
        let layout = self.layout_mut();
        for edge in &mut layout.edges {
            edge.slot = None;
        }
        for slot in &mut layout.sources {
            slot.loaded = None;
        }
    }
}
