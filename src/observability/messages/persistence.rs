// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for saving and loading graphs.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A graph was written out.
///
/// # Log Level
/// `info!` - Important operational event
pub struct GraphSaved<'a> {
    pub graph_id: &'a str,
    pub encrypted: bool,
    pub bytes: usize,
    pub checksum: &'a str,
}

impl Display for GraphSaved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let form = if self.encrypted { "encrypted" } else { "plaintext" };
        write!(
            f,
            "Saved graph {} ({}, {} bytes), checksum {}",
            self.graph_id, form, self.bytes, self.checksum
        )
    }
}

impl StructuredLog for GraphSaved<'_> {
    fn log(&self) {
        tracing::info!(
            graph_id = self.graph_id,
            encrypted = self.encrypted,
            bytes = self.bytes,
            checksum = self.checksum,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "graph_saved",
            span_name = name,
            graph_id = self.graph_id,
            encrypted = self.encrypted,
        )
    }
}

/// A graph was restored from a blob.
///
/// # Log Level
/// `info!` - Important operational event
pub struct GraphLoaded<'a> {
    pub graph_id: &'a str,
    pub encrypted: bool,
    pub task_count: usize,
}

impl Display for GraphLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded graph {} from {} tasks{}",
            self.graph_id,
            self.task_count,
            if self.encrypted { " (decrypted)" } else { "" }
        )
    }
}

impl StructuredLog for GraphLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            graph_id = self.graph_id,
            encrypted = self.encrypted,
            task_count = self.task_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "graph_loaded",
            span_name = name,
            graph_id = self.graph_id,
            task_count = self.task_count,
        )
    }
}

/// The blob's checksum did not match; nothing was decrypted.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ChecksumRejected<'a> {
    pub expected: &'a str,
    pub actual: &'a str,
}

impl Display for ChecksumRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Checksum mismatch: expected {}, computed {}",
            self.expected, self.actual
        )
    }
}

impl StructuredLog for ChecksumRejected<'_> {
    fn log(&self) {
        tracing::error!(expected = self.expected, actual = self.actual, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "checksum_rejected",
            span_name = name,
            expected = self.expected,
            actual = self.actual,
        )
    }
}
