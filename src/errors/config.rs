// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::errors::BuildError;

/// Errors while turning a pipeline file into a graph.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read pipeline file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML pipeline: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse TOML pipeline: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported pipeline format '{0}', expected .yaml, .yml or .toml")]
    UnsupportedFormat(String),

    #[error("Failed to create unit '{unit}' of kind '{kind}': {reason}")]
    Unit {
        unit: String,
        kind: String,
        reason: String,
    },

    #[error(transparent)]
    Build(#[from] BuildError),
}
