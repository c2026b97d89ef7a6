// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::Value;

/// The concrete kind of sequence a batch arrived in.
///
/// Only relevant to `ALL`-mode units, which receive the batch as a whole and
/// may constrain which kinds they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    #[default]
    List,
    Tuple,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::List => write!(f, "list"),
            ContainerKind::Tuple => write!(f, "tuple"),
        }
    }
}

/// A batch of items flowing along an edge during one `process` call.
///
/// Containers are immutable while a run is in progress. The engine detaches
/// the backing sequence once a call finishes so memory is bounded by a single
/// run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataContainer {
    items: Vec<Value>,
    kind: ContainerKind,
}

impl DataContainer {
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items,
            kind: ContainerKind::List,
        }
    }

    pub fn with_kind(items: Vec<Value>, kind: ContainerKind) -> Self {
        Self { items, kind }
    }

    /// Build a container from a `List` or `Tuple` value. Any other value is
    /// handed back unchanged as the error.
    pub fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::List(items) => Ok(Self::with_kind(items, ContainerKind::List)),
            Value::Tuple(items) => Ok(Self::with_kind(items, ContainerKind::Tuple)),
            other => Err(other),
        }
    }

    /// The whole batch as a single value, matching the container kind.
    pub fn to_value(&self) -> Value {
        match self.kind {
            ContainerKind::List => Value::List(self.items.clone()),
            ContainerKind::Tuple => Value::Tuple(self.items.clone()),
        }
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The backing sequence, unmodified.
    pub fn as_whole(&self) -> &[Value] {
        &self.items
    }

    /// One element at a time, in original order. Each call starts over.
    pub fn as_elements(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Consecutive slices of `size` items; the last one may be shorter.
    ///
    /// Returns `None` for a zero chunk size.
    pub fn as_chunks(&self, size: usize) -> Option<std::slice::Chunks<'_, Value>> {
        if size == 0 {
            None
        } else {
            Some(self.items.chunks(size))
        }
    }

    /// Release the backing sequence, leaving the container empty.
    pub fn detach(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.items)
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

impl From<Vec<Value>> for DataContainer {
    fn from(items: Vec<Value>) -> Self {
        Self::new(items)
    }
}

impl<T: Into<Value>> FromIterator<T> for DataContainer {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}
