// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::backends::local::processors::lenient_values;
use crate::data::{DataContainer, Value};
use crate::traits::Processor;
use crate::unit::ArgSpec;

/// Configuration for the Constant processor: one batch per output.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConstantConfig {
    #[serde(deserialize_with = "lenient_values")]
    pub values: Vec<Value>,
}

/// Constant processor - a root unit that emits fixed batches every run.
#[derive(Debug, Clone)]
pub struct ConstantProcessor {
    config: ConstantConfig,
}

impl ConstantProcessor {
    pub fn new(batches: Vec<DataContainer>) -> Self {
        Self::from_values(batches.iter().map(DataContainer::to_value).collect())
    }

    /// Emit `values` as-is. Each one should be a `List` or `Tuple`.
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            config: ConstantConfig { values },
        }
    }

    pub fn from_config(config: ConstantConfig) -> Self {
        Self { config }
    }
}

impl Processor for ConstantProcessor {
    fn kind(&self) -> &'static str {
        "constant"
    }

    fn arguments(&self) -> Vec<ArgSpec> {
        Vec::new()
    }

    fn process(&self, _args: &[Value]) -> anyhow::Result<Vec<Value>> {
        Ok(self.config.values.clone())
    }

    fn state(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }

    fn duplicate(&self) -> Box<dyn Processor> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_accepts_plain_and_saved_values() {
        let plain: ConstantConfig = serde_json::from_value(serde_json::json!({
            "values": [[0, 0]]
        }))
        .unwrap();
        assert_eq!(plain.values, vec![Value::List(vec![Value::Int(0), Value::Int(0)])]);

        let processor = ConstantProcessor::from_config(plain);
        let saved: ConstantConfig = serde_json::from_value(processor.state()).unwrap();
        assert_eq!(saved.values, processor.config.values);
    }
}
