// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::data::Value;
use crate::traits::Processor;
use crate::unit::ArgSpec;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub index: Option<usize>,
}

/// Source processor - placeholder behind caller-supplied input.
///
/// The engine writes loaded input straight onto the source's edges, so this
/// processor is never asked to process anything.
#[derive(Debug, Clone)]
pub struct SourceProcessor {
    config: SourceConfig,
}

impl SourceProcessor {
    pub fn new(index: Option<usize>) -> Self {
        Self {
            config: SourceConfig { index },
        }
    }

    pub fn from_config(config: SourceConfig) -> Self {
        Self { config }
    }

    pub fn index(&self) -> Option<usize> {
        self.config.index
    }
}

impl Processor for SourceProcessor {
    fn kind(&self) -> &'static str {
        "source"
    }

    fn arguments(&self) -> Vec<ArgSpec> {
        Vec::new()
    }

    fn process(&self, _args: &[Value]) -> anyhow::Result<Vec<Value>> {
        bail!("source data is supplied by the caller, not produced")
    }

    fn state(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }

    fn duplicate(&self) -> Box<dyn Processor> {
        Box::new(self.clone())
    }
}
