// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Runtime;
use crate::errors::PersistenceError;
use crate::graph::{Graph, Task};
use crate::traits::BatchMode;
use crate::unit::{ArgSpec, ProcessingUnit, UnitRole};

/// Everything needed to rebuild one unit through the unit registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRecord {
    pub kind: String,
    pub name: String,
    pub lineage: Uuid,
    pub run: Uuid,
    pub mode: BatchMode,
    pub void: bool,
    pub role: UnitRole,
    pub arguments: Vec<ArgSpec>,
    #[serde(default)]
    pub state: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub outputs: Vec<String>,
    pub inputs: Vec<String>,
    /// Index into [`Snapshot::units`].
    pub unit: usize,
}

/// Serialized form of a graph: the task list, with each distinct unit
/// instance stored once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub graph_id: Uuid,
    pub units: Vec<UnitRecord>,
    pub tasks: Vec<TaskRecord>,
}

impl Snapshot {
    pub fn capture(graph: &Graph) -> Self {
        let mut index_of: HashMap<*const ProcessingUnit, usize> = HashMap::new();
        let mut units = Vec::new();
        let mut tasks = Vec::with_capacity(graph.tasks().len());

        for task in graph.tasks() {
            let unit = *index_of.entry(Arc::as_ptr(&task.unit)).or_insert_with(|| {
                units.push(record_of(&task.unit));
                units.len() - 1
            });
            tasks.push(TaskRecord {
                outputs: task.outputs.clone(),
                inputs: task.inputs.clone(),
                unit,
            });
        }

        Self {
            graph_id: graph.id(),
            units,
            tasks,
        }
    }

    /// Rebuild the task list. Every unit gets a fresh run id; records
    /// referenced by several tasks become one shared instance.
    pub fn restore(self, runtime: &Runtime) -> Result<Vec<Task>, PersistenceError> {
        let logger = runtime.loggers.get("persistence");

        let units: Vec<Arc<ProcessingUnit>> = self
            .units
            .into_iter()
            .map(|record| -> Result<Arc<ProcessingUnit>, PersistenceError> {
                let factory = runtime.units.factory(&record.kind).ok_or_else(|| {
                    PersistenceError::UnknownUnitKind {
                        unit: record.name.clone(),
                        kind: record.kind.clone(),
                    }
                })?;
                let processor = factory(&record.state).map_err(|reason| {
                    PersistenceError::InvalidUnitState {
                        unit: record.name.clone(),
                        reason,
                    }
                })?;

                logger.debug(&format!("Restored unit '{}' of kind '{}'", record.name, record.kind));
                Ok(ProcessingUnit::restore(
                    record.name,
                    record.lineage,
                    record.arguments,
                    record.mode,
                    record.void,
                    record.role,
                    processor,
                )
                .into_shared())
            })
            .collect::<Result<_, _>>()?;

        self.tasks
            .into_iter()
            .map(|record| -> Result<Task, PersistenceError> {
                let unit = units.get(record.unit).ok_or_else(|| {
                    PersistenceError::InvalidUnitState {
                        unit: record.outputs.join(", "),
                        reason: format!("task refers to missing unit record {}", record.unit),
                    }
                })?;
                Ok(Task {
                    outputs: record.outputs,
                    unit: Arc::clone(unit),
                    inputs: record.inputs,
                })
            })
            .collect()
    }
}

fn record_of(unit: &ProcessingUnit) -> UnitRecord {
    let identity = unit.identity();
    UnitRecord {
        kind: unit.kind().to_string(),
        name: unit.name().to_string(),
        lineage: identity.lineage,
        run: identity.run,
        mode: unit.mode(),
        void: unit.is_void(),
        role: unit.role(),
        arguments: unit.arguments().to_vec(),
        state: unit.processor().state(),
    }
}
