// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised synchronously while building a graph from tasks.
///
/// Construction errors are always fatal and never retried: the caller has to
/// correct the task list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    /// The same output variable is declared twice.
    #[error("Variable '{variable}' of unit '{unit}' is already defined in the graph")]
    DuplicateVariable { variable: String, unit: String },

    /// An output variable collides with an engine-reserved name.
    #[error("Variable '{variable}' of unit '{unit}' uses a reserved name")]
    ReservedName { variable: String, unit: String },

    /// The number of wired inputs differs from the declared arguments.
    #[error(
        "Unit '{unit}' declares {expected} argument(s) {arguments:?} but task wires {actual} input(s) {inputs:?}"
    )]
    Arity {
        unit: String,
        expected: usize,
        actual: usize,
        arguments: Vec<String>,
        inputs: Vec<String>,
    },

    /// A constraint names an argument the unit does not declare.
    #[error("Unit '{unit}' has no argument named '{argument}'")]
    UnknownArgument { unit: String, argument: String },

    /// Positional source indices are duplicated or not a dense `0..n` run.
    #[error("Source '{variable}' has positional index {index}, expected {expected}: indices must be unique and form 0..{count}")]
    SourceIndex {
        variable: String,
        index: usize,
        expected: usize,
        count: usize,
    },

    /// A task consumes a variable nothing produces.
    #[error("Unit '{unit}' consumes variable '{variable}' which is not defined in the graph")]
    UnknownVariable { variable: String, unit: String },

    /// A source must produce exactly one variable.
    #[error("Source unit '{unit}' must declare exactly one output, got {count}")]
    SourceOutputs { unit: String, count: usize },

    /// A task must produce at least one variable.
    #[error("Task for unit '{unit}' declares no output variables")]
    EmptyOutputs { unit: String },

    /// A void unit's output is discarded and cannot feed another task.
    #[error("Unit '{consumer}' consumes variable '{variable}' produced by void unit '{producer}'")]
    VoidConsumed {
        variable: String,
        producer: String,
        consumer: String,
    },

    /// The tasks form a cycle, so no execution order exists.
    #[error("Cyclic dependency detected: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },
}
