// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::data::{ContainerKind, ShapePattern};

/// Optional runtime checks applied to one argument before a unit runs.
///
/// Each field is an allow-list; `None` disables that check.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Constraint {
    /// Accepted type tags of every element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    /// Accepted element shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shapes: Option<Vec<ShapePattern>>,
    /// Accepted batch containers, only checked in `ALL` mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<Vec<ContainerKind>>,
}

impl Constraint {
    pub fn is_empty(&self) -> bool {
        self.types.is_none() && self.shapes.is_none() && self.containers.is_none()
    }
}

/// One declared argument of a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Constraint::is_empty")]
    pub constraint: Constraint,
}

impl ArgSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: Constraint::default(),
        }
    }

    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraint.types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn shapes(mut self, shapes: impl IntoIterator<Item = ShapePattern>) -> Self {
        self.constraint.shapes = Some(shapes.into_iter().collect());
        self
    }

    pub fn containers(mut self, containers: impl IntoIterator<Item = ContainerKind>) -> Self {
        self.constraint.containers = Some(containers.into_iter().collect());
        self
    }
}

/// Argument names for a fixed list of unconstrained arguments.
pub fn plain_arguments(names: &[&str]) -> Vec<ArgSpec> {
    names.iter().map(|name| ArgSpec::new(*name)).collect()
}
