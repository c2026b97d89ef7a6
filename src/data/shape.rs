// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shapes, shape patterns and the per-type shape function registry.
//!
//! A shape is a list of axis lengths. Scalars have the empty shape `[]`,
//! sequences report `[len]` and arrays report their own dimensions. Units
//! constrain shapes with patterns whose axes are either fixed or the `*`
//! wildcard.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::data::Value;

pub type Shape = Vec<usize>;

/// Extracts the shape of a value of one particular type tag.
pub type ShapeFn = Arc<dyn Fn(&Value) -> Option<Shape> + Send + Sync>;

/// One axis of a [`ShapePattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DimRepr", into = "DimRepr")]
pub enum Dim {
    Fixed(usize),
    Any,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DimRepr {
    Fixed(usize),
    Wildcard(String),
}

impl TryFrom<DimRepr> for Dim {
    type Error = String;

    fn try_from(repr: DimRepr) -> Result<Self, Self::Error> {
        match repr {
            DimRepr::Fixed(n) => Ok(Dim::Fixed(n)),
            DimRepr::Wildcard(s) if s == "*" => Ok(Dim::Any),
            DimRepr::Wildcard(s) => Err(format!("invalid shape axis '{}', expected an integer or '*'", s)),
        }
    }
}

impl From<Dim> for DimRepr {
    fn from(dim: Dim) -> Self {
        match dim {
            Dim::Fixed(n) => DimRepr::Fixed(n),
            Dim::Any => DimRepr::Wildcard("*".to_string()),
        }
    }
}

/// Expected shape with optional wildcard axes. Rank must match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapePattern(pub Vec<Dim>);

impl ShapePattern {
    pub fn new(dims: Vec<Dim>) -> Self {
        Self(dims)
    }

    /// Pattern matching exactly the given shape.
    pub fn exact(shape: &[usize]) -> Self {
        Self(shape.iter().map(|&n| Dim::Fixed(n)).collect())
    }

    pub fn matches(&self, shape: &[usize]) -> bool {
        self.0.len() == shape.len()
            && self
                .0
                .iter()
                .zip(shape)
                .all(|(dim, &n)| match dim {
                    Dim::Any => true,
                    Dim::Fixed(expected) => *expected == n,
                })
    }
}

impl fmt::Display for ShapePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axes: Vec<String> = self
            .0
            .iter()
            .map(|dim| match dim {
                Dim::Fixed(n) => n.to_string(),
                Dim::Any => "*".to_string(),
            })
            .collect();
        write!(f, "({})", axes.join(", "))
    }
}

/// Open registry mapping a type tag to its shape function.
///
/// Populated with defaults for the built-in value types; collaborators may
/// register more (or override) at startup.
#[derive(Clone)]
pub struct ShapeRegistry {
    functions: HashMap<String, ShapeFn>,
}

impl ShapeRegistry {
    /// An empty registry with no shape functions at all.
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, type_tag: impl Into<String>, function: F)
    where
        F: Fn(&Value) -> Option<Shape> + Send + Sync + 'static,
    {
        self.functions.insert(type_tag.into(), Arc::new(function));
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.functions.contains_key(type_tag)
    }

    /// Shape of `value`, or `None` if no function is registered for its type
    /// or the function declines the value.
    pub fn shape_of(&self, value: &Value) -> Option<Shape> {
        self.functions
            .get(value.type_tag())
            .and_then(|function| function(value))
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for scalar in ["null", "bool", "int", "float"] {
            registry.register(scalar, |_| Some(Vec::new()));
        }
        registry.register("str", |v| v.as_str().map(|s| vec![s.chars().count()]));
        registry.register("bytes", |v| match v {
            Value::Bytes(b) => Some(vec![b.len()]),
            _ => None,
        });
        registry.register("list", |v| v.as_items().map(|items| vec![items.len()]));
        registry.register("tuple", |v| v.as_items().map(|items| vec![items.len()]));
        registry.register("array", |v| match v {
            Value::Array(array) => Some(array.shape.clone()),
            _ => None,
        });
        registry
    }
}

impl fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.functions.keys().collect();
        tags.sort();
        f.debug_struct("ShapeRegistry").field("type_tags", &tags).finish()
    }
}
