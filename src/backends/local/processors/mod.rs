// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod constant;
pub mod identity;
pub mod offset;
pub mod sink;
pub mod source;
pub mod stack;
pub mod sum;

pub use constant::*;
pub use identity::*;
pub use offset::*;
pub use sink::*;
pub use source::*;
pub use stack::*;
pub use sum::*;

use serde::{Deserialize, Deserializer};

use crate::data::Value;

/// Accept values either in their saved (tagged) form or as plain JSON/YAML
/// as written in a pipeline file.
pub(crate) fn lenient_values<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|json| match json.get("type") {
            Some(_) => serde_json::from_value::<Value>(json.clone()).unwrap_or_else(|_| Value::from_json(&json)),
            None => Value::from_json(&json),
        })
        .collect())
}
