// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::data::DataContainer;

/// Inputs and options for one [`crate::graph::Graph::process`] call.
///
/// Positional inputs fill the call signature in order; keyword inputs name a
/// source variable directly.
#[derive(Debug, Clone, Default)]
pub struct Call {
    pub(crate) args: Vec<DataContainer>,
    pub(crate) kwargs: Vec<(String, DataContainer)>,
    pub(crate) fetch: Option<Vec<String>>,
    pub(crate) skip_checks: bool,
}

impl Call {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, data: impl Into<DataContainer>) -> Self {
        self.args.push(data.into());
        self
    }

    pub fn kwarg(mut self, variable: impl Into<String>, data: impl Into<DataContainer>) -> Self {
        self.kwargs.push((variable.into(), data.into()));
        self
    }

    /// Variables to return. Without this every stored variable is returned.
    pub fn fetch<I>(mut self, variables: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.fetch = Some(variables.into_iter().map(Into::into).collect());
        self
    }

    /// Skip type, shape and container enforcement for this call.
    pub fn skip_checks(mut self, skip: bool) -> Self {
        self.skip_checks = skip;
        self
    }

    pub fn input_count(&self) -> usize {
        self.args.len() + self.kwargs.len()
    }
}
