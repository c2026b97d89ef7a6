// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::bail;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::data::Value;
use crate::traits::Processor;
use crate::unit::{plain_arguments, ArgSpec};

/// Counters shared between a stub processor and the test that owns it.
#[derive(Debug, Default)]
pub struct CallCounts {
    pub process: AtomicUsize,
    pub before: AtomicUsize,
    pub after: AtomicUsize,
}

/// Returns an empty batch (or its arguments unchanged) and counts every call.
#[derive(Debug, Clone)]
pub struct CountingProcessor {
    arguments: Vec<String>,
    counts: Arc<CallCounts>,
}

impl CountingProcessor {
    pub fn new(arguments: Vec<&str>) -> (Self, Arc<CallCounts>) {
        let counts = Arc::new(CallCounts::default());
        let processor = Self {
            arguments: arguments.into_iter().map(String::from).collect(),
            counts: Arc::clone(&counts),
        };
        (processor, counts)
    }
}

impl Processor for CountingProcessor {
    fn kind(&self) -> &'static str {
        "counting"
    }

    fn arguments(&self) -> Vec<ArgSpec> {
        let names: Vec<&str> = self.arguments.iter().map(String::as_str).collect();
        plain_arguments(&names)
    }

    fn process(&self, args: &[Value]) -> anyhow::Result<Vec<Value>> {
        self.counts.process.fetch_add(1, Ordering::SeqCst);
        if args.is_empty() {
            return Ok(vec![Value::List(Vec::new())]);
        }
        Ok(args.to_vec())
    }

    fn before_batch(&self) -> anyhow::Result<()> {
        self.counts.before.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn after_batch(&self) -> anyhow::Result<()> {
        self.counts.after.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn duplicate(&self) -> Box<dyn Processor> {
        Box::new(self.clone())
    }
}

/// A processor that always fails for testing failure scenarios
#[derive(Debug, Clone)]
pub struct FailingProcessor {
    counts: Arc<CallCounts>,
}

impl FailingProcessor {
    pub fn new() -> (Self, Arc<CallCounts>) {
        let counts = Arc::new(CallCounts::default());
        (
            Self {
                counts: Arc::clone(&counts),
            },
            counts,
        )
    }
}

impl Processor for FailingProcessor {
    fn kind(&self) -> &'static str {
        "failing"
    }

    fn arguments(&self) -> Vec<ArgSpec> {
        Vec::new()
    }

    fn process(&self, _args: &[Value]) -> anyhow::Result<Vec<Value>> {
        self.counts.process.fetch_add(1, Ordering::SeqCst);
        bail!("Simulated processor failure")
    }

    fn before_batch(&self) -> anyhow::Result<()> {
        self.counts.before.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn after_batch(&self) -> anyhow::Result<()> {
        self.counts.after.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn duplicate(&self) -> Box<dyn Processor> {
        Box::new(self.clone())
    }
}
