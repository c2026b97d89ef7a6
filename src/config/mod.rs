// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod registry;
mod runtime;

pub mod consts;

pub use loader::{
    load_config, load_pipeline, ExecutionConfig, PipelineConfig, TaskConfig, UnitConfig,
};
pub use registry::{UnitFactory, UnitRegistry};
pub use runtime::{PersistenceOptions, Runtime, RuntimeOptions};
