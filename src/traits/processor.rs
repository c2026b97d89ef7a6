// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::Value;
use crate::unit::ArgSpec;

/// How the engine delivers batches to a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// The entire collected sequence is delivered at once, one call per run.
    #[default]
    All,
    /// One element of every argument at a time, one call per element.
    Each,
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchMode::All => write!(f, "ALL"),
            BatchMode::Each => write!(f, "EACH"),
        }
    }
}

/// The algorithm behind a processing unit.
///
/// Implementations declare a static argument schema and a default batching
/// mode; the wrapping [`crate::unit::ProcessingUnit`] takes care of identity,
/// contract enforcement and batching.
///
/// In `ALL` mode each argument arrives as a `List`/`Tuple` value holding the
/// whole batch and every returned value must be such a batch too. In `EACH`
/// mode arguments are single elements and the engine zips the returned values
/// back into batches. Units without arguments are called exactly once per run
/// and always return batches.
pub trait Processor: Send + Sync {
    /// Registry key used to rebuild this processor from its saved state.
    fn kind(&self) -> &'static str;

    /// Ordered argument schema. Read once when the unit is created.
    fn arguments(&self) -> Vec<ArgSpec>;

    fn mode(&self) -> BatchMode {
        BatchMode::All
    }

    fn process(&self, args: &[Value]) -> anyhow::Result<Vec<Value>>;

    /// Runs once per node invocation, before any call to `process`.
    fn before_batch(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs once per node invocation, after the last call to `process`, even
    /// if processing failed.
    fn after_batch(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Serializable settings, handed back to the registered factory on load.
    fn state(&self) -> serde_json::Value {
        serde_json::Value::Null
    }

    /// An independent copy with the same settings.
    fn duplicate(&self) -> Box<dyn Processor>;
}
