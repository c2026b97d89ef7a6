// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{anyhow, bail};

use crate::data::{Array, Value};
use crate::traits::Processor;
use crate::unit::{plain_arguments, ArgSpec};

/// Stack processor - stacks a batch of numbers or equally shaped arrays into
/// one array with a new leading axis.
#[derive(Debug, Clone, Default)]
pub struct StackProcessor;

impl StackProcessor {
    pub fn new() -> Self {
        Self
    }
}

fn flatten(value: &Value) -> Option<(Vec<usize>, Vec<f64>)> {
    match value {
        Value::Array(array) => Some((array.shape.clone(), array.data.clone())),
        other => other.as_f64().map(|x| (Vec::new(), vec![x])),
    }
}

impl Processor for StackProcessor {
    fn kind(&self) -> &'static str {
        "stack"
    }

    fn arguments(&self) -> Vec<ArgSpec> {
        plain_arguments(&["values"])
    }

    fn process(&self, args: &[Value]) -> anyhow::Result<Vec<Value>> {
        let items = args
            .first()
            .and_then(Value::as_items)
            .ok_or_else(|| anyhow!("stack expects a batch"))?;

        let mut inner: Option<Vec<usize>> = None;
        let mut data = Vec::new();
        for item in items {
            let (shape, values) = flatten(item)
                .ok_or_else(|| anyhow!("cannot stack a value of type '{}'", item.type_tag()))?;
            match &inner {
                Some(expected) if *expected != shape => {
                    bail!("cannot stack shape {:?} onto shape {:?}", shape, expected)
                }
                Some(_) => {}
                None => inner = Some(shape),
            }
            data.extend(values);
        }

        let mut shape = vec![items.len()];
        shape.extend(inner.unwrap_or_default());
        let array = Array::new(shape, data).ok_or_else(|| anyhow!("stacked data does not fill its shape"))?;

        Ok(vec![Value::List(vec![Value::Array(array)])])
    }

    fn duplicate(&self) -> Box<dyn Processor> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_scalars_and_arrays() {
        let processor = StackProcessor::new();

        let scalars = processor
            .process(&[Value::List(vec![Value::Int(1), Value::Float(2.0)])])
            .unwrap();
        assert_eq!(
            scalars,
            vec![Value::List(vec![Value::Array(Array::new(vec![2], vec![1.0, 2.0]).unwrap())])]
        );

        let row = Value::Array(Array::new(vec![3], vec![1.0, 2.0, 3.0]).unwrap());
        let rows = processor
            .process(&[Value::List(vec![row.clone(), row])])
            .unwrap();
        match &rows[0].as_items().unwrap()[0] {
            Value::Array(array) => assert_eq!(array.shape, vec![2, 3]),
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_stack_rejects_ragged_shapes() {
        let processor = StackProcessor::new();
        let a = Value::Array(Array::new(vec![2], vec![1.0, 2.0]).unwrap());
        let b = Value::Array(Array::new(vec![1], vec![1.0]).unwrap());

        assert!(processor.process(&[Value::List(vec![a, b])]).is_err());
    }
}
