// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::de::DeserializeOwned;

use super::processors::*;
use crate::traits::Processor;

/// Factory for creating local (in-process) processor instances
pub struct LocalProcessorFactory;

fn options<T: DeserializeOwned + Default>(kind: &str, state: &serde_json::Value) -> Result<T, String> {
    if state.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(state.clone())
        .map_err(|e| format!("Invalid options for '{}' processor: {}", kind, e))
}

fn required<T: DeserializeOwned>(kind: &str, state: &serde_json::Value) -> Result<T, String> {
    serde_json::from_value(state.clone())
        .map_err(|e| format!("Invalid options for '{}' processor: {}", kind, e))
}

impl LocalProcessorFactory {
    /// Create a processor instance from its kind and saved state.
    ///
    /// `state` is what [`Processor::state`] returned, or the `options` block
    /// of a pipeline file:
    /// - "source" -> SourceProcessor (`index`)
    /// - "sink" -> SinkProcessor
    /// - "constant" -> ConstantProcessor (`values`)
    /// - "identity" -> IdentityProcessor
    /// - "offset" -> OffsetProcessor (`arity`, `offset`)
    /// - "sum" -> SumProcessor
    /// - "stack" -> StackProcessor
    pub fn create_processor(
        kind: &str,
        state: &serde_json::Value,
    ) -> Result<Box<dyn Processor>, String> {
        match kind {
            "source" => Ok(Box::new(SourceProcessor::from_config(options(kind, state)?))),
            "sink" => Ok(Box::new(SinkProcessor::new())),
            "constant" => Ok(Box::new(ConstantProcessor::from_config(required(kind, state)?))),
            "identity" => Ok(Box::new(IdentityProcessor::new())),
            "offset" => Ok(Box::new(OffsetProcessor::from_config(required(kind, state)?))),
            "sum" => Ok(Box::new(SumProcessor::new())),
            "stack" => Ok(Box::new(StackProcessor::new())),
            _ => Err(format!("Unknown local processor implementation: '{}'", kind)),
        }
    }

    /// List all available local processor implementations
    pub fn list_available_implementations() -> Vec<&'static str> {
        vec!["source", "sink", "constant", "identity", "offset", "sum", "stack"]
    }

    /// Check if an implementation is available
    pub fn is_implementation_available(kind: &str) -> bool {
        Self::list_available_implementations().contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;
    use serde_json::json;

    #[test]
    fn test_create_processor_table_driven() {
        struct TestCase {
            kind: &'static str,
            state: serde_json::Value,
            args: Vec<Value>,
            expected: Vec<Value>,
        }

        let test_cases = vec![
            TestCase {
                kind: "identity",
                state: serde_json::Value::Null,
                args: vec![Value::Int(4)],
                expected: vec![Value::Int(4)],
            },
            TestCase {
                kind: "offset",
                state: json!({ "arity": 1, "offset": 10 }),
                args: vec![Value::Int(1)],
                expected: vec![Value::Int(11)],
            },
            TestCase {
                kind: "sum",
                state: serde_json::Value::Null,
                args: vec![Value::List(vec![Value::Int(1), Value::Int(2)])],
                expected: vec![Value::List(vec![Value::Int(3)])],
            },
            TestCase {
                kind: "constant",
                state: json!({ "values": [[1, 2]] }),
                args: vec![],
                expected: vec![Value::List(vec![Value::Int(1), Value::Int(2)])],
            },
        ];

        for case in test_cases {
            let processor = LocalProcessorFactory::create_processor(case.kind, &case.state)
                .unwrap_or_else(|e| panic!("failed to create '{}': {}", case.kind, e));

            assert_eq!(processor.kind(), case.kind);
            assert_eq!(processor.process(&case.args).unwrap(), case.expected, "kind: {}", case.kind);
        }
    }

    #[test]
    fn test_state_round_trips_through_factory() {
        let original = OffsetProcessor::new(2, Value::Float(0.5)).unwrap();

        let rebuilt = LocalProcessorFactory::create_processor("offset", &original.state()).unwrap();

        assert_eq!(rebuilt.arguments().len(), 2);
        assert_eq!(rebuilt.process(&[Value::Int(1), Value::Int(2)]).unwrap(), vec![Value::Float(1.5), Value::Float(2.5)]);
    }

    #[test]
    fn test_create_processor_unknown_kind() {
        let result = LocalProcessorFactory::create_processor("unknown_processor", &serde_json::Value::Null);

        let error_msg = result.err().unwrap();
        assert!(error_msg.contains("Unknown local processor implementation"));
    }

    #[test]
    fn test_create_processor_missing_options() {
        let result = LocalProcessorFactory::create_processor("offset", &serde_json::Value::Null);
        assert!(result.is_err());
    }

    #[test]
    fn test_is_implementation_available() {
        assert!(LocalProcessorFactory::is_implementation_available("offset"));
        assert!(LocalProcessorFactory::is_implementation_available("source"));
        assert!(!LocalProcessorFactory::is_implementation_available("nonexistent_processor"));
    }
}
