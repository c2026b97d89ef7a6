// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::backends::local::LocalProcessorFactory;
use crate::traits::Processor;

/// Builds a processor from its saved state or pipeline `options` block.
pub type UnitFactory =
    Arc<dyn Fn(&serde_json::Value) -> Result<Box<dyn Processor>, String> + Send + Sync>;

/// Open map of unit kind to factory.
///
/// Pipeline loading and graph deserialization both resolve units through
/// this registry, so registering a kind at startup is all a custom processor
/// needs to be declarable and restorable.
#[derive(Clone)]
pub struct UnitRegistry {
    factories: HashMap<String, UnitFactory>,
}

impl UnitRegistry {
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&serde_json::Value) -> Result<Box<dyn Processor>, String> + Send + Sync + 'static,
    {
        self.factories.insert(kind.into(), Arc::new(factory));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn factory(&self, kind: &str) -> Option<&UnitFactory> {
        self.factories.get(kind)
    }

    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl Default for UnitRegistry {
    /// Every local processor.
    fn default() -> Self {
        let mut registry = Self::empty();
        for kind in LocalProcessorFactory::list_available_implementations() {
            registry.register(kind, move |state: &serde_json::Value| {
                LocalProcessorFactory::create_processor(kind, state)
            });
        }
        registry
    }
}

impl fmt::Debug for UnitRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::local::processors::IdentityProcessor;

    #[test]
    fn test_default_registry_has_local_kinds() {
        let registry = UnitRegistry::default();

        for kind in ["source", "sink", "constant", "identity", "offset", "sum", "stack"] {
            assert!(registry.contains(kind), "missing kind: {}", kind);
        }
        assert!(!registry.contains("unknown"));
    }

    #[test]
    fn test_register_custom_kind() {
        let mut registry = UnitRegistry::empty();
        registry.register("echo", |_state: &serde_json::Value| {
            Ok(Box::new(IdentityProcessor::new()) as Box<dyn Processor>)
        });

        let factory = registry.factory("echo").unwrap();
        let processor = factory(&serde_json::Value::Null).unwrap();

        assert_eq!(processor.kind(), "identity");
        assert_eq!(registry.kinds(), vec!["echo"]);
    }
}
