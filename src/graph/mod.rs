// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The dataflow graph: tasks resolved into an arena of nodes joined by
//! edges, plus the source registry that forms the call signature.
//!
//! A graph is built once and afterwards only grows through
//! [`Graph::add_tasks`]. Execution lives in [`crate::engine`]; saving and
//! loading in [`crate::persistence`].

mod builder;
mod node;
mod task;

pub use builder::Producer;
pub use node::{Edge, Node, NodeId, SourceSlot};
pub use task::Task;

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Runtime;
use crate::errors::BuildError;
use crate::observability::messages::{
    graph::{GraphBuilt, TasksRejected},
    StructuredLog,
};
use crate::unit::ProcessingUnit;
use builder::{assemble, Layout};

#[derive(Debug)]
pub struct Graph {
    id: Uuid,
    runtime: Arc<Runtime>,
    tasks: Vec<Task>,
    layout: Layout,
}

impl Graph {
    /// Build a graph from tasks in declaration order.
    pub fn build(runtime: Arc<Runtime>, tasks: Vec<Task>) -> Result<Self, BuildError> {
        let mut graph = Self {
            id: Uuid::new_v4(),
            runtime,
            tasks: Vec::new(),
            layout: assemble(&[])?,
        };
        graph.add_tasks(tasks)?;
        Ok(graph)
    }

    /// Add tasks to the graph. On error the graph is left unchanged.
    pub fn add_tasks(&mut self, tasks: Vec<Task>) -> Result<(), BuildError> {
        let added = tasks.len();
        let mut all = self.tasks.clone();
        all.extend(tasks);

        match assemble(&all) {
            Ok(layout) => {
                self.tasks = all;
                self.layout = layout;
                GraphBuilt {
                    graph_id: &self.id.to_string(),
                    task_count: added,
                    node_count: self.layout.nodes.len(),
                    edge_count: self.layout.edges.len(),
                    signature: &self.signature(),
                }
                .log();
                Ok(())
            }
            Err(error) => {
                TasksRejected {
                    graph_id: &self.id.to_string(),
                    error: &error,
                }
                .log();
                Err(error)
            }
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn nodes(&self) -> &[Node] {
        &self.layout.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.layout.edges
    }

    pub fn sources(&self) -> &[SourceSlot] {
        &self.layout.sources
    }

    /// Where `variable` is produced, if it exists.
    pub fn producer_of(&self, variable: &str) -> Option<Producer> {
        self.layout.variables.get(variable).copied()
    }

    /// Every variable defined by a task, sorted.
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.layout.variables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Source variables in call order: positional by index, then keyword
    /// sources alphabetically.
    pub fn signature(&self) -> Vec<String> {
        self.layout
            .sources
            .iter()
            .map(|slot| slot.variable.clone())
            .collect()
    }

    /// Number of sources addressable by position.
    pub fn positional_count(&self) -> usize {
        self.layout
            .sources
            .iter()
            .filter(|slot| slot.index.is_some())
            .count()
    }

    /// Kahn levels; nodes sharing a level do not depend on each other.
    pub fn execution_levels(&self) -> &[Vec<NodeId>] {
        &self.layout.levels
    }

    /// Flattened execution order.
    pub fn execution_order(&self) -> Vec<NodeId> {
        self.layout.levels.iter().flatten().copied().collect()
    }

    /// Node and edge metadata for external tooling.
    pub fn describe(&self) -> serde_json::Value {
        let nodes: Vec<serde_json::Value> = self
            .layout
            .nodes
            .iter()
            .map(|node| {
                let mut attrs = node.unit.get_default_node_attrs();
                attrs.insert("id".into(), node.id.into());
                attrs.insert("inputs".into(), node.inputs.clone().into());
                attrs.insert("outputs".into(), node.outputs.clone().into());
                serde_json::Value::Object(attrs)
            })
            .collect();

        let edges: Vec<serde_json::Value> = self
            .layout
            .edges
            .iter()
            .map(|edge| {
                serde_json::json!({
                    "variable": edge.variable,
                    "producer": edge.producer,
                    "output_index": edge.output_index,
                    "consumer": edge.consumer,
                    "input_index": edge.input_index,
                })
            })
            .collect();

        serde_json::json!({
            "id": self.id.to_string(),
            "signature": self.signature(),
            "nodes": nodes,
            "edges": edges,
        })
    }

    /// A new graph sharing this graph's unit instances.
    pub fn copy(&self) -> Self {
        self.with_units(|unit| Arc::clone(unit))
    }

    /// A new graph with independent unit clones; no unit shares lineage or
    /// run id with the original.
    pub fn deepcopy(&self) -> Self {
        self.with_units(|unit| unit.detached_clone().into_shared())
    }

    /// Rebuild around mapped units, keeping instances that were shared
    /// between tasks shared in the result.
    fn with_units<F>(&self, mut map: F) -> Self
    where
        F: FnMut(&Arc<ProcessingUnit>) -> Arc<ProcessingUnit>,
    {
        let mut mapped: HashMap<*const ProcessingUnit, Arc<ProcessingUnit>> = HashMap::new();
        let mut remap = |unit: &Arc<ProcessingUnit>| {
            Arc::clone(
                mapped
                    .entry(Arc::as_ptr(unit))
                    .or_insert_with(|| map(unit)),
            )
        };

        let tasks = self
            .tasks
            .iter()
            .map(|task| Task {
                outputs: task.outputs.clone(),
                unit: remap(&task.unit),
                inputs: task.inputs.clone(),
            })
            .collect();

        let mut layout = self.layout.clone();
        for node in &mut layout.nodes {
            node.unit = remap(&node.unit);
        }
        for edge in &mut layout.edges {
            edge.slot = None;
        }
        for slot in &mut layout.sources {
            slot.loaded = None;
        }

        Self {
            id: Uuid::new_v4(),
            runtime: Arc::clone(&self.runtime),
            tasks,
            layout,
        }
    }

    pub(crate) fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::local::processors::{IdentityProcessor, OffsetProcessor};
    use crate::data::Value;
    use crate::unit::ProcessingUnit;

    fn runtime() -> Arc<Runtime> {
        Runtime::new().shared()
    }

    fn offset_tasks() -> Vec<Task> {
        vec![
            Task::source("zero", ProcessingUnit::source("zero", Some(0))),
            Task::source("one", ProcessingUnit::source("one", Some(1))),
            Task::new(
                ["ten", "eleven"],
                ProcessingUnit::new("add", OffsetProcessor::new(2, Value::Int(10)).unwrap()),
                ["zero", "one"],
            ),
        ]
    }

    #[test]
    fn test_build_creates_sinks_for_unconsumed_outputs() {
        let graph = Graph::build(runtime(), offset_tasks()).unwrap();

        let sinks: Vec<&Node> = graph.nodes().iter().filter(|n| n.unit.is_sink()).collect();
        let sunk: Vec<&str> = sinks.iter().map(|n| n.inputs[0].as_str()).collect();

        assert_eq!(sunk, vec!["ten", "eleven"]);
        assert_eq!(graph.nodes().len(), 5);
        assert_eq!(graph.edges().len(), 4);
        assert_eq!(graph.signature(), vec!["zero", "one"]);
    }

    #[test]
    fn test_build_errors_table_driven() {
        struct TestCase {
            name: &'static str,
            tasks: Vec<Task>,
            check: fn(&BuildError) -> bool,
        }

        let identity = || ProcessingUnit::new("id", IdentityProcessor::new());

        let test_cases = vec![
            TestCase {
                name: "arity",
                tasks: vec![
                    Task::source("a", ProcessingUnit::source("a", Some(0))),
                    Task::source("b", ProcessingUnit::source("b", Some(1))),
                    Task::source("c", ProcessingUnit::source("c", Some(2))),
                    Task::new(
                        ["x", "y"],
                        ProcessingUnit::new("add", OffsetProcessor::new(2, Value::Int(1)).unwrap()),
                        ["a", "b", "c"],
                    ),
                ],
                check: |e| matches!(e, BuildError::Arity { expected: 2, actual: 3, .. }),
            },
            TestCase {
                name: "source index gap",
                tasks: vec![
                    Task::source("a", ProcessingUnit::source("a", Some(0))),
                    Task::source("b", ProcessingUnit::source("b", Some(2))),
                ],
                check: |e| matches!(e, BuildError::SourceIndex { index: 2, expected: 1, .. }),
            },
            TestCase {
                name: "duplicate source index",
                tasks: vec![
                    Task::source("a", ProcessingUnit::source("a", Some(0))),
                    Task::source("b", ProcessingUnit::source("b", Some(0))),
                ],
                check: |e| matches!(e, BuildError::SourceIndex { .. }),
            },
            TestCase {
                name: "duplicate variable",
                tasks: vec![
                    Task::source("a", ProcessingUnit::source("a", Some(0))),
                    Task::new(["a"], identity(), ["a"]),
                ],
                check: |e| matches!(e, BuildError::DuplicateVariable { variable, .. } if variable == "a"),
            },
            TestCase {
                name: "reserved name",
                tasks: vec![Task::source("fetch", ProcessingUnit::source("fetch", None))],
                check: |e| matches!(e, BuildError::ReservedName { .. }),
            },
            TestCase {
                name: "unknown input",
                tasks: vec![Task::new(["x"], identity(), ["missing"])],
                check: |e| matches!(e, BuildError::UnknownVariable { variable, .. } if variable == "missing"),
            },
            TestCase {
                name: "source with two outputs",
                tasks: vec![Task::new(["a", "b"], ProcessingUnit::source("a", None), Vec::<String>::new())],
                check: |e| matches!(e, BuildError::SourceOutputs { count: 2, .. }),
            },
            TestCase {
                name: "no outputs",
                tasks: vec![Task::new(Vec::<String>::new(), identity(), ["a"])],
                check: |e| matches!(e, BuildError::EmptyOutputs { .. }),
            },
            TestCase {
                name: "void consumed",
                tasks: vec![
                    Task::source("a", ProcessingUnit::source("a", None)),
                    Task::new(["v"], identity().void(), ["a"]),
                    Task::new(["w"], identity(), ["v"]),
                ],
                check: |e| matches!(e, BuildError::VoidConsumed { variable, .. } if variable == "v"),
            },
            TestCase {
                name: "cycle",
                tasks: vec![
                    Task::new(["x"], ProcessingUnit::new("first", IdentityProcessor::new()), ["y"]),
                    Task::new(["y"], ProcessingUnit::new("second", IdentityProcessor::new()), ["x"]),
                ],
                check: |e| matches!(e, BuildError::CyclicDependency { cycle } if cycle.len() == 3),
            },
        ];

        for case in test_cases {
            let error = Graph::build(runtime(), case.tasks).err();
            match error {
                Some(error) => assert!((case.check)(&error), "case '{}': unexpected {:?}", case.name, error),
                None => panic!("case '{}': expected an error", case.name),
            }
        }
    }

    #[test]
    fn test_signature_orders_positional_then_keyword() {
        let tasks = vec![
            Task::source("zeta", ProcessingUnit::source("zeta", None)),
            Task::source("second", ProcessingUnit::source("second", Some(1))),
            Task::source("alpha", ProcessingUnit::source("alpha", None)),
            Task::source("first", ProcessingUnit::source("first", Some(0))),
        ];

        let graph = Graph::build(runtime(), tasks).unwrap();

        assert_eq!(graph.signature(), vec!["first", "second", "alpha", "zeta"]);
        assert_eq!(graph.positional_count(), 2);
    }

    #[test]
    fn test_failed_add_leaves_graph_unchanged() {
        let mut graph = Graph::build(runtime(), offset_tasks()).unwrap();
        let nodes_before = graph.nodes().len();

        let result = graph.add_tasks(vec![
            Task::new(["fine"], ProcessingUnit::new("id", IdentityProcessor::new()), ["ten"]),
            Task::new(["ten"], ProcessingUnit::new("dup", IdentityProcessor::new()), ["one"]),
        ]);

        assert!(result.is_err());
        assert_eq!(graph.nodes().len(), nodes_before);
        assert!(graph.producer_of("fine").is_none());
    }

    #[test]
    fn test_add_tasks_consumes_existing_variable() {
        let mut graph = Graph::build(runtime(), offset_tasks()).unwrap();

        graph
            .add_tasks(vec![Task::new(
                ["copy"],
                ProcessingUnit::new("id", IdentityProcessor::new()),
                ["ten"],
            )])
            .unwrap();

        let sunk: Vec<&str> = graph
            .nodes()
            .iter()
            .filter(|n| n.unit.is_sink())
            .map(|n| n.inputs[0].as_str())
            .collect();
        assert_eq!(sunk, vec!["eleven", "copy"]);
    }

    #[test]
    fn test_fan_out_keeps_one_edge_per_consumer() {
        let tasks = vec![
            Task::source("x", ProcessingUnit::source("x", Some(0))),
            Task::new(["a"], ProcessingUnit::new("left", IdentityProcessor::new()), ["x"]),
            Task::new(["b"], ProcessingUnit::new("right", IdentityProcessor::new()), ["x"]),
        ];

        let graph = Graph::build(runtime(), tasks).unwrap();

        let from_x = graph.edges().iter().filter(|e| e.variable == "x").count();
        assert_eq!(from_x, 2);
        assert_eq!(graph.execution_levels()[0], vec![0]);
        assert_eq!(graph.execution_levels()[1], vec![1, 2]);
    }

    #[test]
    fn test_copy_shares_units_and_deepcopy_detaches() {
        let graph = Graph::build(runtime(), offset_tasks()).unwrap();

        let copy = graph.copy();
        let deep = graph.deepcopy();

        assert_ne!(copy.id(), graph.id());
        assert_ne!(deep.id(), graph.id());
        for ((original, shallow), detached) in graph.tasks().iter().zip(copy.tasks()).zip(deep.tasks()) {
            assert!(Arc::ptr_eq(&original.unit, &shallow.unit));
            assert_eq!(original.unit.identity(), shallow.unit.identity());
            assert!(!Arc::ptr_eq(&original.unit, &detached.unit));
            assert!(!detached.unit.identity().is_related(&original.unit.identity()));
            assert_ne!(detached.unit.identity().run, original.unit.identity().run);
        }
    }

    #[test]
    fn test_deepcopy_preserves_shared_instances() {
        let shared = ProcessingUnit::new("id", IdentityProcessor::new()).into_shared();
        let tasks = vec![
            Task::source("x", ProcessingUnit::source("x", Some(0))),
            Task::new(["a"], Arc::clone(&shared), ["x"]),
            Task::new(["b"], Arc::clone(&shared), ["a"]),
        ];
        let graph = Graph::build(runtime(), tasks).unwrap();

        let deep = graph.deepcopy();

        assert!(Arc::ptr_eq(&deep.tasks()[1].unit, &deep.tasks()[2].unit));
        assert!(Arc::ptr_eq(&deep.tasks()[1].unit, &deep.nodes()[1].unit));
    }

    #[test]
    fn test_describe_lists_nodes_and_edges() {
        let graph = Graph::build(runtime(), offset_tasks()).unwrap();

        let description = graph.describe();

        assert_eq!(description["nodes"].as_array().unwrap().len(), 5);
        assert_eq!(description["edges"].as_array().unwrap().len(), 4);
        assert_eq!(description["nodes"][2]["kind"], "offset");
        assert_eq!(description["signature"], serde_json::json!(["zero", "one"]));
    }
}
