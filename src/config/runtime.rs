// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::consts::{DEFAULT_PBKDF2_ITERATIONS, DEFAULT_SALT};
use crate::config::UnitRegistry;
use crate::data::ShapeRegistry;
use crate::observability::LoggerRegistry;

/// Key-derivation settings for encrypted saves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceOptions {
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_salt")]
    pub salt: String,
}

fn default_iterations() -> u32 {
    DEFAULT_PBKDF2_ITERATIONS
}

fn default_salt() -> String {
    DEFAULT_SALT.to_string()
}

impl Default for PersistenceOptions {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            salt: default_salt(),
        }
    }
}

/// Engine-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeOptions {
    /// Skip contract enforcement on every call, not only when a call asks.
    #[serde(default)]
    pub skip_checks: bool,
    #[serde(default)]
    pub persistence: PersistenceOptions,
}

/// Shared context every graph is built against.
///
/// Holds the registries that would otherwise be process-wide: shape
/// functions, unit factories and component loggers.
#[derive(Debug, Default)]
pub struct Runtime {
    pub shapes: ShapeRegistry,
    pub units: UnitRegistry,
    pub loggers: LoggerRegistry,
    pub options: RuntimeOptions,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: RuntimeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_shapes(mut self, shapes: ShapeRegistry) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn with_units(mut self, units: UnitRegistry) -> Self {
        self.units = units;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_defaults() {
        let options: PersistenceOptions = serde_json::from_str("{}").unwrap();

        assert_eq!(options, PersistenceOptions::default());
        assert_eq!(options.iterations, DEFAULT_PBKDF2_ITERATIONS);
        assert_eq!(options.salt, DEFAULT_SALT);
    }

    #[test]
    fn test_runtime_builder() {
        let runtime = Runtime::new().with_options(RuntimeOptions {
            skip_checks: true,
            ..RuntimeOptions::default()
        });

        assert!(runtime.options.skip_checks);
        assert!(runtime.units.contains("offset"));
        assert!(runtime.shapes.contains("array"));
    }
}
