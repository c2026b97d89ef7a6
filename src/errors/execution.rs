// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

/// Which part of a unit's contract was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractRule {
    Type,
    Shape,
    Container,
}

impl fmt::Display for ContractRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractRule::Type => write!(f, "type"),
            ContractRule::Shape => write!(f, "shape"),
            ContractRule::Container => write!(f, "container"),
        }
    }
}

/// Errors that abort a single `process` call.
///
/// The graph is cleared before the error is returned, so the same graph can be
/// run again with fresh input.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Argument '{argument}' of unit '{unit}' violates its {rule} contract: expected {expected}, got {actual}")]
    ContractViolation {
        unit: String,
        argument: String,
        rule: ContractRule,
        expected: String,
        actual: String,
    },

    #[error("Unit '{unit}' received batches of different lengths: {}", format_lengths(.lengths))]
    BatchLengthMismatch {
        unit: String,
        lengths: Vec<(String, usize)>,
    },

    #[error("Unit '{unit}' returned {actual} value(s) but the task declares {expected} output(s) {outputs:?}")]
    OutputArity {
        unit: String,
        expected: usize,
        actual: usize,
        outputs: Vec<String>,
    },

    #[error("Unit '{unit}' returned a '{actual}' for output '{variable}' where a list or tuple batch was required")]
    OutputNotBatch {
        unit: String,
        variable: String,
        actual: String,
    },

    #[error("Input '{variable}' was supplied more than once")]
    InputAlreadyLoaded { variable: String },

    #[error("Input(s) {variables:?} were not supplied")]
    MissingInput { variables: Vec<String> },

    #[error("Unexpected input: {reason}")]
    UnexpectedInput { reason: String },

    #[error("Variable '{variable}' is not defined in the graph")]
    UnknownVariable { variable: String },

    #[error("Unit '{unit}' was scheduled before input '{variable}' was available")]
    NotReady { unit: String, variable: String },

    #[error("Unit '{unit}' failed: {source}")]
    ProcessFailed {
        unit: String,
        #[source]
        source: anyhow::Error,
    },
}

fn format_lengths(lengths: &[(String, usize)]) -> String {
    lengths
        .iter()
        .map(|(argument, len)| format!("{}={}", argument, len))
        .collect::<Vec<_>>()
        .join(", ")
}
