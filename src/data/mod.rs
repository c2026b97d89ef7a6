// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Items, batches and shapes carried along graph edges.

mod container;
mod shape;
mod value;

pub use container::{ContainerKind, DataContainer};
pub use shape::{Dim, Shape, ShapeFn, ShapePattern, ShapeRegistry};
pub use value::{Array, Value};
