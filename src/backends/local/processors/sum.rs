// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{anyhow, bail};

use crate::data::Value;
use crate::traits::Processor;
use crate::unit::{plain_arguments, ArgSpec};

/// Sum processor - reduces a whole numeric batch to a one-element batch.
#[derive(Debug, Clone, Default)]
pub struct SumProcessor;

impl SumProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Processor for SumProcessor {
    fn kind(&self) -> &'static str {
        "sum"
    }

    fn arguments(&self) -> Vec<ArgSpec> {
        plain_arguments(&["values"])
    }

    fn process(&self, args: &[Value]) -> anyhow::Result<Vec<Value>> {
        let items = args
            .first()
            .and_then(Value::as_items)
            .ok_or_else(|| anyhow!("sum expects a batch of numbers"))?;

        let total = if items.iter().all(|v| matches!(v, Value::Int(_))) {
            let mut total: i64 = 0;
            for item in items {
                let value = item.as_int().unwrap_or_default();
                total = total
                    .checked_add(value)
                    .ok_or_else(|| anyhow!("integer overflow while summing"))?;
            }
            Value::Int(total)
        } else {
            let mut total = 0.0;
            for item in items {
                match item.as_f64() {
                    Some(value) => total += value,
                    None => bail!("cannot sum a value of type '{}'", item.type_tag()),
                }
            }
            Value::Float(total)
        };

        Ok(vec![Value::List(vec![total])])
    }

    fn duplicate(&self) -> Box<dyn Processor> {
        Box::new(self.clone())
    }
}
