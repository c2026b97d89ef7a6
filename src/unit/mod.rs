// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The processing-unit contract every graph node implements.
//!
//! A [`ProcessingUnit`] wraps a [`Processor`] (the algorithm) with everything
//! the engine needs around it: a display name, a two-part identity, the
//! argument schema read once from the processor, a batching mode, a `void`
//! flag and the role the unit plays in a graph (compute, source or sink).
//!
//! Units are shared between graph copies through `Arc`, so all methods take
//! `&self`.

mod contract;
mod identity;
mod signature;

pub use identity::UnitIdentity;
pub use signature::{plain_arguments, ArgSpec, Constraint};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::backends::local::processors::{SinkProcessor, SourceProcessor};
use crate::data::{DataContainer, Value};
use crate::errors::{BuildError, ExecutionError};
use crate::traits::{BatchMode, Processor};

/// The part a unit plays in a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum UnitRole {
    /// Runs its processor on the data arriving on its incoming edges.
    Compute,
    /// Injects caller-supplied data. `index` is the positional slot in the
    /// call signature; `None` means keyword-addressed.
    Source { index: Option<usize> },
    /// Terminal placeholder keeping an otherwise unconsumed variable
    /// retrievable after a run.
    Sink,
}

impl fmt::Display for UnitRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitRole::Compute => write!(f, "compute"),
            UnitRole::Source { .. } => write!(f, "source"),
            UnitRole::Sink => write!(f, "sink"),
        }
    }
}

/// A node's processing unit: identity, schema and batching around a processor.
pub struct ProcessingUnit {
    name: String,
    identity: UnitIdentity,
    arguments: Vec<ArgSpec>,
    mode: BatchMode,
    void: bool,
    role: UnitRole,
    processor: Box<dyn Processor>,
}

impl ProcessingUnit {
    pub fn new(name: impl Into<String>, processor: impl Processor + 'static) -> Self {
        Self::from_boxed(name, Box::new(processor))
    }

    pub fn from_boxed(name: impl Into<String>, processor: Box<dyn Processor>) -> Self {
        Self {
            name: name.into(),
            identity: UnitIdentity::new(),
            arguments: processor.arguments(),
            mode: processor.mode(),
            void: false,
            role: UnitRole::Compute,
            processor,
        }
    }

    /// A source fed by the caller at positional `index`, or by keyword when
    /// `index` is `None`.
    pub fn source(name: impl Into<String>, index: Option<usize>) -> Self {
        let mut unit = Self::new(name, SourceProcessor::new(index));
        unit.role = UnitRole::Source { index };
        unit
    }

    pub fn sink(name: impl Into<String>) -> Self {
        let mut unit = Self::new(name, SinkProcessor::new());
        unit.role = UnitRole::Sink;
        unit
    }

    pub fn with_mode(mut self, mode: BatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Mark the unit's output as discarded rather than stored.
    pub fn void(mut self) -> Self {
        self.void = true;
        self
    }

    /// Replace the declared argument of the same name, typically to attach a
    /// constraint.
    pub fn with_argument(mut self, arg: ArgSpec) -> Result<Self, BuildError> {
        match self.arguments.iter_mut().find(|a| a.name == arg.name) {
            Some(slot) => {
                *slot = arg;
                Ok(self)
            }
            None => Err(BuildError::UnknownArgument {
                unit: self.name.clone(),
                argument: arg.name,
            }),
        }
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &'static str {
        self.processor.kind()
    }

    pub fn identity(&self) -> UnitIdentity {
        self.identity
    }

    pub fn arguments(&self) -> &[ArgSpec] {
        &self.arguments
    }

    pub fn argument_names(&self) -> Vec<&str> {
        self.arguments.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn mode(&self) -> BatchMode {
        self.mode
    }

    pub fn is_void(&self) -> bool {
        self.void
    }

    pub fn role(&self) -> UnitRole {
        self.role
    }

    pub fn is_source(&self) -> bool {
        matches!(self.role, UnitRole::Source { .. })
    }

    pub fn is_sink(&self) -> bool {
        self.role == UnitRole::Sink
    }

    pub fn processor(&self) -> &dyn Processor {
        self.processor.as_ref()
    }

    /// Verify a task wires exactly as many inputs as the unit declares.
    pub fn check_setup(&self, inputs: &[String]) -> Result<(), BuildError> {
        if inputs.len() == self.arguments.len() {
            return Ok(());
        }

        Err(BuildError::Arity {
            unit: self.name.clone(),
            expected: self.arguments.len(),
            actual: inputs.len(),
            arguments: self.arguments.iter().map(|a| a.name.clone()).collect(),
            inputs: inputs.to_vec(),
        })
    }

    /// Independent copy of the same logical unit: new run id, same lineage.
    pub fn fork(&self) -> Self {
        self.duplicate_with(self.identity.renewed())
    }

    /// Independent copy that shares no identity with this unit.
    pub fn detached_clone(&self) -> Self {
        self.duplicate_with(UnitIdentity::new())
    }

    fn duplicate_with(&self, identity: UnitIdentity) -> Self {
        Self {
            name: self.name.clone(),
            identity,
            arguments: self.arguments.clone(),
            mode: self.mode,
            void: self.void,
            role: self.role,
            processor: self.processor.duplicate(),
        }
    }

    /// Reassemble a unit from saved parts. The run id is always fresh.
    pub(crate) fn restore(
        name: String,
        lineage: uuid::Uuid,
        arguments: Vec<ArgSpec>,
        mode: BatchMode,
        void: bool,
        role: UnitRole,
        processor: Box<dyn Processor>,
    ) -> Self {
        Self {
            name,
            identity: UnitIdentity {
                lineage,
                run: uuid::Uuid::new_v4(),
            },
            arguments,
            mode,
            void,
            role,
            processor,
        }
    }

    /// Serializable metadata describing the unit, for external tooling.
    pub fn get_default_node_attrs(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut attrs = serde_json::Map::new();
        attrs.insert("name".into(), self.name.clone().into());
        attrs.insert("kind".into(), self.kind().into());
        attrs.insert("role".into(), self.role.to_string().into());
        attrs.insert("mode".into(), self.mode.to_string().into());
        attrs.insert("void".into(), self.void.into());
        attrs.insert("lineage".into(), self.identity.lineage.to_string().into());
        attrs.insert("run".into(), self.identity.run.to_string().into());
        attrs.insert(
            "arguments".into(),
            self.arguments
                .iter()
                .map(|a| serde_json::Value::from(a.name.clone()))
                .collect(),
        );
        if let UnitRole::Source { index } = self.role {
            attrs.insert("index".into(), serde_json::to_value(index).unwrap_or_default());
        }
        attrs
    }

    /// Run the unit once for a node: hooks around batched processing.
    ///
    /// Returns one container per entry of `outputs`, or nothing for a void
    /// unit. Batches of unequal length are rejected before any hook runs;
    /// constraints are the caller's responsibility.
    pub fn invoke(
        &self,
        batches: &[&DataContainer],
        outputs: &[String],
    ) -> Result<Vec<DataContainer>, ExecutionError> {
        self.check_lengths(batches)?;
        self.processor.before_batch().map_err(|e| self.failed(e))?;
        let produced = self.dispatch(batches, outputs);
        let teardown = self.processor.after_batch().map_err(|e| self.failed(e));
        let produced = produced?;
        teardown?;
        Ok(produced)
    }

    fn dispatch(
        &self,
        batches: &[&DataContainer],
        outputs: &[String],
    ) -> Result<Vec<DataContainer>, ExecutionError> {
        if batches.is_empty() || self.mode == BatchMode::All {
            let args: Vec<Value> = batches.iter().map(|batch| batch.to_value()).collect();
            let values = self.call(&args, outputs)?;
            if self.void {
                return Ok(Vec::new());
            }
            return values
                .into_iter()
                .zip(outputs)
                .map(|(value, variable)| self.into_batch(value, variable))
                .collect();
        }

        let len = batches[0].len();
        let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(len); outputs.len()];
        for position in 0..len {
            let args: Vec<Value> = batches
                .iter()
                .map(|batch| batch.as_whole()[position].clone())
                .collect();
            let values = self.call(&args, outputs)?;
            if self.void {
                continue;
            }
            for (column, value) in columns.iter_mut().zip(values) {
                column.push(value);
            }
        }

        if self.void {
            return Ok(Vec::new());
        }
        Ok(columns.into_iter().map(DataContainer::new).collect())
    }

    fn call(&self, args: &[Value], outputs: &[String]) -> Result<Vec<Value>, ExecutionError> {
        let values = self.processor.process(args).map_err(|e| self.failed(e))?;
        if !self.void && values.len() != outputs.len() {
            return Err(ExecutionError::OutputArity {
                unit: self.name.clone(),
                expected: outputs.len(),
                actual: values.len(),
                outputs: outputs.to_vec(),
            });
        }
        Ok(values)
    }

    fn into_batch(&self, value: Value, variable: &str) -> Result<DataContainer, ExecutionError> {
        DataContainer::from_value(value).map_err(|other| ExecutionError::OutputNotBatch {
            unit: self.name.clone(),
            variable: variable.to_string(),
            actual: other.type_tag().to_string(),
        })
    }

    fn failed(&self, source: anyhow::Error) -> ExecutionError {
        ExecutionError::ProcessFailed {
            unit: self.name.clone(),
            source,
        }
    }
}

impl fmt::Debug for ProcessingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessingUnit")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("role", &self.role)
            .field("mode", &self.mode)
            .field("void", &self.void)
            .field("identity", &self.identity)
            .field("arguments", &self.argument_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::local::processors::{ConstantProcessor, OffsetProcessor, SumProcessor};
    use crate::backends::stub::{CountingProcessor, FailingProcessor};
    use std::sync::atomic::Ordering;

    fn ints(values: &[i64]) -> DataContainer {
        values.iter().copied().collect()
    }

    fn outputs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_argument_names_come_from_schema() {
        let unit = ProcessingUnit::new("add", OffsetProcessor::new(2, Value::Int(10)).unwrap());
        assert_eq!(unit.argument_names(), vec!["a", "b"]);
        assert_eq!(unit.mode(), BatchMode::Each);

        let source = ProcessingUnit::source("x", Some(0));
        assert!(source.argument_names().is_empty());
        assert!(source.is_source());
    }

    #[test]
    fn test_check_setup_rejects_wrong_arity() {
        let unit = ProcessingUnit::new("add", OffsetProcessor::new(2, Value::Int(10)).unwrap());

        let result = unit.check_setup(&outputs(&["x", "y", "z"]));

        match result {
            Err(BuildError::Arity { unit, expected, actual, .. }) => {
                assert_eq!(unit, "add");
                assert_eq!(expected, 2);
                assert_eq!(actual, 3);
            }
            other => panic!("expected arity error, got {:?}", other),
        }
        assert!(unit.check_setup(&outputs(&["x", "y"])).is_ok());
    }

    #[test]
    fn test_each_mode_zips_outputs_in_order() {
        let unit = ProcessingUnit::new("add", OffsetProcessor::new(2, Value::Int(10)).unwrap());
        let a = ints(&[0, 1, 2]);
        let b = ints(&[5, 6, 7]);

        let produced = unit.invoke(&[&a, &b], &outputs(&["x", "y"])).unwrap();

        assert_eq!(produced[0], ints(&[10, 11, 12]));
        assert_eq!(produced[1], ints(&[15, 16, 17]));
    }

    #[test]
    fn test_all_mode_receives_whole_batch() {
        let unit = ProcessingUnit::new("total", SumProcessor::new());
        let values = ints(&[1, 2, 3]);

        let produced = unit.invoke(&[&values], &outputs(&["total"])).unwrap();

        assert_eq!(produced[0], ints(&[6]));
    }

    #[test]
    fn test_root_unit_runs_once_in_each_mode() {
        let (counter, calls) = CountingProcessor::new(Vec::new());
        let unit = ProcessingUnit::new("root", counter).with_mode(BatchMode::Each);

        let produced = unit.invoke(&[], &outputs(&["x"])).unwrap();

        assert_eq!(calls.process.load(Ordering::SeqCst), 1);
        assert_eq!(calls.before.load(Ordering::SeqCst), 1);
        assert_eq!(calls.after.load(Ordering::SeqCst), 1);
        assert_eq!(produced[0].len(), 0);
    }

    #[test]
    fn test_hooks_run_once_per_invocation_in_each_mode() {
        let (counter, calls) = CountingProcessor::new(vec!["value"]);
        let unit = ProcessingUnit::new("counted", counter).with_mode(BatchMode::Each);
        let values = ints(&[1, 2, 3, 4]);

        unit.invoke(&[&values], &outputs(&["x"])).unwrap();

        assert_eq!(calls.process.load(Ordering::SeqCst), 4);
        assert_eq!(calls.before.load(Ordering::SeqCst), 1);
        assert_eq!(calls.after.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_after_batch_runs_when_processing_fails() {
        let (failing, calls) = FailingProcessor::new();
        let unit = ProcessingUnit::new("broken", failing);

        let result = unit.invoke(&[], &outputs(&["x"]));

        assert!(matches!(result, Err(ExecutionError::ProcessFailed { .. })));
        assert_eq!(calls.after.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_output_arity_is_checked() {
        let unit = ProcessingUnit::new("pair", ConstantProcessor::new(vec![ints(&[1])]));

        let result = unit.invoke(&[], &outputs(&["x", "y"]));

        assert!(matches!(
            result,
            Err(ExecutionError::OutputArity { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_all_mode_output_must_be_batch() {
        let unit = ProcessingUnit::new("scalar", ConstantProcessor::from_values(vec![Value::Int(3)]));

        let result = unit.invoke(&[], &outputs(&["x"]));

        assert!(matches!(result, Err(ExecutionError::OutputNotBatch { .. })));
    }

    #[test]
    fn test_void_unit_discards_output() {
        let unit = ProcessingUnit::new("add", OffsetProcessor::new(1, Value::Int(1)).unwrap()).void();
        let values = ints(&[1, 2]);

        let produced = unit.invoke(&[&values], &outputs(&["x"])).unwrap();

        assert!(produced.is_empty());
    }

    #[test]
    fn test_invoke_rejects_unequal_batches() {
        let (counter, calls) = CountingProcessor::new(vec!["a", "b"]);
        let unit = ProcessingUnit::new("pair", counter).with_mode(BatchMode::Each);

        let result = unit.invoke(&[&ints(&[1, 2, 3]), &ints(&[1])], &outputs(&["x", "y"]));

        assert!(matches!(result, Err(ExecutionError::BatchLengthMismatch { .. })));
        assert_eq!(calls.before.load(Ordering::SeqCst), 0);
        assert_eq!(calls.process.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fork_and_detached_clone_identity() {
        let unit = ProcessingUnit::new("add", OffsetProcessor::new(1, Value::Int(1)).unwrap());

        let fork = unit.fork();
        let clone = unit.detached_clone();

        assert!(fork.identity().is_related(&unit.identity()));
        assert_ne!(fork.identity().run, unit.identity().run);
        assert!(!clone.identity().is_related(&unit.identity()));
        assert_ne!(clone.identity().run, unit.identity().run);
        assert_eq!(clone.name(), unit.name());
    }

    #[test]
    fn test_with_argument_rejects_unknown_name() {
        let unit = ProcessingUnit::new("add", OffsetProcessor::new(1, Value::Int(1)).unwrap());

        let result = unit.with_argument(ArgSpec::new("missing").types(["int"]));

        assert!(matches!(result, Err(BuildError::UnknownArgument { .. })));
    }

    #[test]
    fn test_default_node_attrs() {
        let unit = ProcessingUnit::source("x", None);

        let attrs = unit.get_default_node_attrs();

        assert_eq!(attrs["name"], "x");
        assert_eq!(attrs["kind"], "source");
        assert_eq!(attrs["role"], "source");
        assert_eq!(attrs["index"], serde_json::Value::Null);
        assert!(serde_json::to_string(&attrs).is_ok());
    }
}
