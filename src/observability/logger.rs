// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Named component loggers.
//!
//! Units and tools ask the runtime for a logger by name instead of reaching
//! for a global. Each name maps to one shared [`Logger`], created on first use.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Logger for one named component. Events carry the name as `component`.
#[derive(Debug)]
pub struct Logger {
    name: String,
}

impl Logger {
    fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!(component = %self.name, "{}", message);
    }

    pub fn info(&self, message: &str) {
        tracing::info!(component = %self.name, "{}", message);
    }

    pub fn warning(&self, message: &str) {
        tracing::warn!(component = %self.name, "{}", message);
    }

    pub fn error(&self, message: &str) {
        tracing::error!(component = %self.name, "{}", message);
    }

    /// Highest severity; tracing has no level above `ERROR`.
    pub fn critical(&self, message: &str) {
        tracing::error!(component = %self.name, critical = true, "{}", message);
    }
}

/// Lazily populated map of component name to logger.
#[derive(Debug, Default)]
pub struct LoggerRegistry {
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The logger for `name`, created on first request.
    pub fn get(&self, name: &str) -> Arc<Logger> {
        let mut loggers = match self.loggers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(
            loggers
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Logger::new(name))),
        )
    }

    pub fn names(&self) -> Vec<String> {
        let loggers = match self.loggers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut names: Vec<String> = loggers.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_returns_same_logger() {
        let registry = LoggerRegistry::new();

        let first = registry.get("engine");
        let second = registry.get("engine");
        let other = registry.get("persistence");

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(registry.names(), vec!["engine", "persistence"]);
    }

    #[test]
    fn test_all_levels_emit() {
        let logger = LoggerRegistry::new().get("unit");
        logger.debug("d");
        logger.info("i");
        logger.warning("w");
        logger.error("e");
        logger.critical("c");
        assert_eq!(logger.name(), "unit");
    }
}
