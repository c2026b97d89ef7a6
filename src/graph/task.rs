// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::unit::ProcessingUnit;

/// One build entry: the unit, the variables it reads and the variables it
/// defines.
#[derive(Debug, Clone)]
pub struct Task {
    pub outputs: Vec<String>,
    pub unit: Arc<ProcessingUnit>,
    pub inputs: Vec<String>,
}

impl Task {
    pub fn new<O, I>(outputs: O, unit: impl Into<Arc<ProcessingUnit>>, inputs: I) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            outputs: outputs.into_iter().map(Into::into).collect(),
            unit: unit.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }

    /// A task without inputs, typically wrapping a source unit.
    pub fn source(output: impl Into<String>, unit: impl Into<Arc<ProcessingUnit>>) -> Self {
        Self {
            outputs: vec![output.into()],
            unit: unit.into(),
            inputs: Vec::new(),
        }
    }
}
