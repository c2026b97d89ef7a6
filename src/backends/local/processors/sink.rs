// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::data::Value;
use crate::traits::Processor;
use crate::unit::{plain_arguments, ArgSpec};

/// Sink processor - terminal placeholder; its incoming edge holds the result.
#[derive(Debug, Clone, Default)]
pub struct SinkProcessor;

impl SinkProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Processor for SinkProcessor {
    fn kind(&self) -> &'static str {
        "sink"
    }

    fn arguments(&self) -> Vec<ArgSpec> {
        plain_arguments(&["value"])
    }

    fn process(&self, _args: &[Value]) -> anyhow::Result<Vec<Value>> {
        Ok(Vec::new())
    }

    fn duplicate(&self) -> Box<dyn Processor> {
        Box::new(self.clone())
    }
}
