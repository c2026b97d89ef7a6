// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::config::{PersistenceOptions, Runtime, RuntimeOptions};
use crate::errors::ConfigError;
use crate::graph::{Graph, Task};
use crate::traits::BatchMode;
use crate::unit::{ArgSpec, Constraint, ProcessingUnit};

/// A pipeline file: engine settings plus the ordered task list.
///
/// # Example
/// ```yaml
/// execution:
///   skip_checks: false
/// persistence:
///   iterations: 100000
/// tasks:
///   - outputs: [zero]
///     unit: { kind: source, index: 0 }
///   - outputs: [one]
///     unit: { kind: source, index: 1 }
///   - outputs: [ten, eleven]
///     unit: { kind: offset, name: add, mode: each, options: { arity: 2, offset: 10 } }
///     inputs: [zero, one]
/// ```
#[derive(Debug, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub persistence: PersistenceOptions,
    pub tasks: Vec<TaskConfig>,
}

/// Options applied to every `process` call.
///
/// # Fields
/// * `skip_checks` - Disable contract enforcement globally
/// * `log_level` - Default tracing filter when `RUST_LOG` is unset
#[derive(Debug, Default, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub skip_checks: bool,
    pub log_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TaskConfig {
    /// Only a sink may leave this empty.
    #[serde(default)]
    pub outputs: Vec<String>,
    pub unit: UnitConfig,
    #[serde(default)]
    pub inputs: Vec<String>,
}

/// How to instantiate one unit.
///
/// # Fields
/// * `kind` - Registered unit kind (`source`, `offset`, ...)
/// * `name` - Display name, defaults to the first output variable
/// * `mode` - Overrides the processor's default batching mode
/// * `void` - Discard the unit's output
/// * `index` - Positional slot of a `source`; omit for keyword-only
/// * `options` - Handed to the kind's factory
/// * `constraints` - Argument name to allowed types, shapes and containers
#[derive(Debug, Deserialize)]
pub struct UnitConfig {
    pub kind: String,
    pub name: Option<String>,
    pub mode: Option<BatchMode>,
    #[serde(default)]
    pub void: bool,
    pub index: Option<usize>,
    #[serde(default)]
    pub options: serde_json::Value,
    #[serde(default)]
    pub constraints: BTreeMap<String, Constraint>,
}

impl PipelineConfig {
    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            skip_checks: self.execution.skip_checks,
            persistence: self.persistence.clone(),
        }
    }

    /// A default runtime carrying this file's options.
    pub fn runtime(&self) -> Runtime {
        Runtime::new().with_options(self.runtime_options())
    }

    /// Instantiate every unit through the runtime's registry and build the graph.
    pub fn build(&self, runtime: Arc<Runtime>) -> Result<Graph, ConfigError> {
        let logger = runtime.loggers.get("config");
        let mut tasks = Vec::with_capacity(self.tasks.len());

        for task in &self.tasks {
            let unit = task.unit.instantiate(&runtime, &task.outputs)?;
            logger.debug(&format!(
                "Instantiated unit '{}' of kind '{}' for {:?}",
                unit.name(),
                unit.kind(),
                task.outputs
            ));
            tasks.push(Task::new(task.outputs.clone(), unit, task.inputs.clone()));
        }

        Ok(Graph::build(runtime, tasks)?)
    }
}

impl UnitConfig {
    fn instantiate(&self, runtime: &Runtime, outputs: &[String]) -> Result<ProcessingUnit, ConfigError> {
        let name = self
            .name
            .clone()
            .or_else(|| outputs.first().cloned())
            .unwrap_or_else(|| self.kind.clone());

        let mut unit = match self.kind.as_str() {
            "source" => ProcessingUnit::source(name, self.index),
            "sink" => ProcessingUnit::sink(name),
            _ => self.create(runtime, name)?,
        };

        if let Some(mode) = self.mode {
            unit = unit.with_mode(mode);
        }
        if self.void {
            unit = unit.void();
        }
        for (argument, constraint) in &self.constraints {
            unit = unit.with_argument(ArgSpec {
                name: argument.clone(),
                constraint: constraint.clone(),
            })?;
        }

        Ok(unit)
    }

    /// Build a compute unit through the runtime's unit registry.
    fn create(&self, runtime: &Runtime, name: String) -> Result<ProcessingUnit, ConfigError> {
        let factory = runtime.units.factory(&self.kind).ok_or_else(|| ConfigError::Unit {
            unit: name.clone(),
            kind: self.kind.clone(),
            reason: format!("unknown kind, registered kinds are {:?}", runtime.units.kinds()),
        })?;
        let processor = factory(&self.options).map_err(|reason| ConfigError::Unit {
            unit: name.clone(),
            kind: self.kind.clone(),
            reason,
        })?;
        Ok(ProcessingUnit::from_boxed(name, processor))
    }
}

/// Load a pipeline from a `.yaml`, `.yml` or `.toml` file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
        "toml" => Ok(toml::from_str(&content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// Load a pipeline file and build its graph against a runtime carrying the
/// file's options.
pub fn load_pipeline<P: AsRef<Path>>(path: P) -> Result<(PipelineConfig, Graph), ConfigError> {
    let config = load_config(path)?;
    let graph = config.build(config.runtime().shared())?;
    Ok((config, graph))
}
