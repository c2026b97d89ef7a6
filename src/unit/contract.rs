// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Runtime enforcement of the per-argument type/shape/container contract.

use crate::data::{DataContainer, ShapeRegistry};
use crate::errors::{ContractRule, ExecutionError};
use crate::traits::BatchMode;
use crate::unit::{ArgSpec, ProcessingUnit};

impl ProcessingUnit {
    /// All batches feeding one invocation must have the same length.
    pub fn check_lengths(&self, batches: &[&DataContainer]) -> Result<(), ExecutionError> {
        let Some(first) = batches.first() else {
            return Ok(());
        };

        if batches.iter().all(|batch| batch.len() == first.len()) {
            return Ok(());
        }

        Err(ExecutionError::BatchLengthMismatch {
            unit: self.name().to_string(),
            lengths: self
                .arguments()
                .iter()
                .zip(batches)
                .map(|(arg, batch)| (arg.name.clone(), batch.len()))
                .collect(),
        })
    }

    /// Check every argument's batch against its declared constraint.
    pub fn enforce(
        &self,
        batches: &[&DataContainer],
        shapes: &ShapeRegistry,
    ) -> Result<(), ExecutionError> {
        for (arg, batch) in self.arguments().iter().zip(batches) {
            self.enforce_argument(arg, batch, shapes)?;
        }
        Ok(())
    }

    fn enforce_argument(
        &self,
        arg: &ArgSpec,
        batch: &DataContainer,
        shapes: &ShapeRegistry,
    ) -> Result<(), ExecutionError> {
        let constraint = &arg.constraint;

        if let (BatchMode::All, Some(containers)) = (self.mode(), &constraint.containers) {
            if !containers.contains(&batch.kind()) {
                return Err(self.violation(
                    arg,
                    ContractRule::Container,
                    format!("one of {:?}", containers.iter().map(|c| c.to_string()).collect::<Vec<_>>()),
                    batch.kind().to_string(),
                ));
            }
        }

        for (position, item) in batch.as_elements().enumerate() {
            if let Some(types) = &constraint.types {
                if !types.iter().any(|t| t == item.type_tag()) {
                    return Err(self.violation(
                        arg,
                        ContractRule::Type,
                        format!("one of {:?}", types),
                        format!("'{}' at element {}", item.type_tag(), position),
                    ));
                }
            }

            if let Some(patterns) = &constraint.shapes {
                let expected = || {
                    patterns
                        .iter()
                        .map(|p| p.to_string())
                        .collect::<Vec<_>>()
                        .join(" or ")
                };

                match shapes.shape_of(item) {
                    None => {
                        return Err(self.violation(
                            arg,
                            ContractRule::Shape,
                            expected(),
                            format!("no shape function for type '{}'", item.type_tag()),
                        ));
                    }
                    Some(shape) if !patterns.iter().any(|p| p.matches(&shape)) => {
                        return Err(self.violation(
                            arg,
                            ContractRule::Shape,
                            expected(),
                            format!("{:?} at element {}", shape, position),
                        ));
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(())
    }

    fn violation(
        &self,
        arg: &ArgSpec,
        rule: ContractRule,
        expected: String,
        actual: String,
    ) -> ExecutionError {
        ExecutionError::ContractViolation {
            unit: self.name().to_string(),
            argument: arg.name.clone(),
            rule,
            expected,
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::backends::local::processors::{IdentityProcessor, OffsetProcessor};
    use crate::data::{Array, ContainerKind, DataContainer, Dim, ShapePattern, ShapeRegistry, Value};
    use crate::errors::{ContractRule, ExecutionError};
    use crate::traits::BatchMode;
    use crate::unit::{ArgSpec, ProcessingUnit};

    fn unit_with(arg: ArgSpec, mode: BatchMode) -> ProcessingUnit {
        ProcessingUnit::new("checked", IdentityProcessor::new())
            .with_mode(mode)
            .with_argument(arg)
            .unwrap()
    }

    fn rule_of(result: Result<(), ExecutionError>) -> ContractRule {
        match result {
            Err(ExecutionError::ContractViolation { rule, .. }) => rule,
            other => panic!("expected contract violation, got {:?}", other),
        }
    }

    #[test]
    fn test_type_constraint() {
        let unit = unit_with(ArgSpec::new("value").types(["int"]), BatchMode::Each);
        let shapes = ShapeRegistry::default();

        let good = DataContainer::new(vec![Value::Int(1), Value::Int(2)]);
        let bad = DataContainer::new(vec![Value::Int(1), Value::Float(2.0)]);

        assert!(unit.enforce(&[&good], &shapes).is_ok());
        assert_eq!(rule_of(unit.enforce(&[&bad], &shapes)), ContractRule::Type);
    }

    #[test]
    fn test_shape_constraint_with_wildcard() {
        let unit = unit_with(
            ArgSpec::new("value").shapes([ShapePattern::new(vec![Dim::Fixed(2), Dim::Any])]),
            BatchMode::Each,
        );
        let shapes = ShapeRegistry::default();
        let array = |rows, cols| {
            Value::Array(Array::new(vec![rows, cols], vec![0.0; rows * cols]).unwrap())
        };

        let good = DataContainer::new(vec![array(2, 3), array(2, 5)]);
        let bad = DataContainer::new(vec![array(3, 3)]);

        assert!(unit.enforce(&[&good], &shapes).is_ok());
        assert_eq!(rule_of(unit.enforce(&[&bad], &shapes)), ContractRule::Shape);
    }

    #[test]
    fn test_shape_constraint_without_shape_function() {
        let unit = unit_with(
            ArgSpec::new("value").shapes([ShapePattern::exact(&[])]),
            BatchMode::Each,
        );
        let batch = DataContainer::new(vec![Value::Int(1)]);

        let result = unit.enforce(&[&batch], &ShapeRegistry::empty());

        assert_eq!(rule_of(result), ContractRule::Shape);
    }

    #[test]
    fn test_container_constraint_only_in_all_mode() {
        let arg = ArgSpec::new("value").containers([ContainerKind::Tuple]);
        let shapes = ShapeRegistry::default();
        let batch = DataContainer::new(vec![Value::Int(1)]);

        let all = unit_with(arg.clone(), BatchMode::All);
        let each = unit_with(arg, BatchMode::Each);

        assert_eq!(rule_of(all.enforce(&[&batch], &shapes)), ContractRule::Container);
        assert!(each.enforce(&[&batch], &shapes).is_ok());
    }

    #[test]
    fn test_violation_names_unit_and_argument() {
        let unit = unit_with(ArgSpec::new("value").types(["str"]), BatchMode::Each);
        let batch = DataContainer::new(vec![Value::Int(1)]);

        let message = unit
            .enforce(&[&batch], &ShapeRegistry::default())
            .unwrap_err()
            .to_string();

        assert!(message.contains("'checked'"));
        assert!(message.contains("'value'"));
        assert!(message.contains("'int'"));
    }

    #[test]
    fn test_length_mismatch() {
        let unit = ProcessingUnit::new("pair", OffsetProcessor::new(2, Value::Int(0)).unwrap());
        let a = DataContainer::new(vec![Value::Int(1)]);
        let b = DataContainer::new(vec![Value::Int(1), Value::Int(2)]);

        let result = unit.check_lengths(&[&a, &b]);

        assert!(matches!(result, Err(ExecutionError::BatchLengthMismatch { .. })));
        assert!(unit.check_lengths(&[&a, &a]).is_ok());
    }
}
