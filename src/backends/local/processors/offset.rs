// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::data::{Array, Value};
use crate::traits::{BatchMode, Processor};
use crate::unit::ArgSpec;

/// Configuration for the Offset processor
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OffsetConfig {
    /// Number of arguments; each one produces one output.
    pub arity: usize,
    /// Integer or float added to every argument.
    pub offset: serde_json::Number,
}

/// Offset processor - adds a fixed offset to each of its arguments.
///
/// Element-wise by default: argument `i` becomes output `i`. Ints stay ints
/// when the offset is an integer, arrays are offset element by element.
#[derive(Debug, Clone)]
pub struct OffsetProcessor {
    config: OffsetConfig,
}

impl OffsetProcessor {
    /// Fails unless `offset` is an int or a finite float.
    pub fn new(arity: usize, offset: Value) -> anyhow::Result<Self> {
        let offset = match offset {
            Value::Int(i) => serde_json::Number::from(i),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .ok_or_else(|| anyhow!("offset must be finite, got {}", f))?,
            other => bail!("offset must be an int or a float, got '{}'", other.type_tag()),
        };
        Ok(Self {
            config: OffsetConfig { arity, offset },
        })
    }

    pub fn from_config(config: OffsetConfig) -> Self {
        Self { config }
    }

    fn shift(&self, value: &Value) -> anyhow::Result<Value> {
        let offset = &self.config.offset;
        match (value, offset.as_i64()) {
            (Value::Int(i), Some(by)) => i
                .checked_add(by)
                .map(Value::Int)
                .ok_or_else(|| anyhow!("integer overflow adding {} to {}", by, i)),
            (Value::Int(_) | Value::Float(_), _) => {
                let base = value.as_f64().unwrap_or_default();
                Ok(Value::Float(base + offset.as_f64().unwrap_or_default()))
            }
            (Value::Array(array), _) => {
                let by = offset.as_f64().unwrap_or_default();
                let data = array.data.iter().map(|x| x + by).collect();
                Ok(Value::Array(Array {
                    shape: array.shape.clone(),
                    data,
                }))
            }
            (other, _) => bail!("cannot offset a value of type '{}'", other.type_tag()),
        }
    }
}

/// Argument names `a`, `b`, ... for generated schemas.
pub(crate) fn letter_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match u8::try_from(i) {
            Ok(i) if i < 26 => char::from(b'a' + i).to_string(),
            _ => format!("arg{}", i),
        })
        .collect()
}

impl Processor for OffsetProcessor {
    fn kind(&self) -> &'static str {
        "offset"
    }

    fn arguments(&self) -> Vec<ArgSpec> {
        letter_names(self.config.arity)
            .into_iter()
            .map(ArgSpec::new)
            .collect()
    }

    fn mode(&self) -> BatchMode {
        BatchMode::Each
    }

    fn process(&self, args: &[Value]) -> anyhow::Result<Vec<Value>> {
        args.iter().map(|value| self.shift(value)).collect()
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
    fn test_offset_table_driven() {
        struct TestCase {
            name: &'static str,
            offset: Value,
            input: Value,
            expected: Value,
        }

        let test_cases = vec![
            TestCase {
                name: "int plus int",
                offset: Value::Int(10),
                input: Value::Int(1),
                expected: Value::Int(11),
            },
            TestCase {
                name: "int plus float",
                offset: Value::Float(0.5),
                input: Value::Int(1),
                expected: Value::Float(1.5),
            },
            TestCase {
                name: "float plus int",
                offset: Value::Int(2),
                input: Value::Float(0.25),
                expected: Value::Float(2.25),
            },
            TestCase {
                name: "array",
                offset: Value::Int(1),
                input: Value::Array(Array::new(vec![2], vec![1.0, 2.0]).unwrap()),
                expected: Value::Array(Array::new(vec![2], vec![2.0, 3.0]).unwrap()),
            },
        ];

        for case in test_cases {
            let processor = OffsetProcessor::new(1, case.offset).unwrap();
            let result = processor.process(&[case.input]).unwrap();
            assert_eq!(result, vec![case.expected], "case: {}", case.name);
        }
    }

    #[test]
    fn test_offset_rejects_text() {
        let processor = OffsetProcessor::new(1, Value::Int(1)).unwrap();
        assert!(processor.process(&[Value::from("x")]).is_err());
    }

    #[test]
    fn test_offset_must_be_a_finite_number() {
        for offset in [Value::Float(f64::NAN), Value::Float(f64::INFINITY), Value::from("1")] {
            assert!(OffsetProcessor::new(1, offset.clone()).is_err(), "offset: {:?}", offset);
        }
        assert!(OffsetProcessor::new(1, Value::Float(-0.5)).is_ok());
    }

    #[test]
    fn test_letter_names() {
        assert_eq!(letter_names(3), vec!["a", "b", "c"]);
        assert_eq!(letter_names(28)[26], "arg26");
    }
}
