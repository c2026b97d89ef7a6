// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::data::Value;
use crate::traits::Processor;
use crate::unit::{plain_arguments, ArgSpec};

/// Identity processor - passes its single argument through unchanged.
#[derive(Debug, Clone, Default)]
pub struct IdentityProcessor;

impl IdentityProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Processor for IdentityProcessor {
    fn kind(&self) -> &'static str {
        "identity"
    }

    fn arguments(&self) -> Vec<ArgSpec> {
        plain_arguments(&["value"])
    }

    fn process(&self, args: &[Value]) -> anyhow::Result<Vec<Value>> {
        Ok(args.to_vec())
    }

    fn duplicate(&self) -> Box<dyn Processor> {
        Box::new(self.clone())
    }
}
