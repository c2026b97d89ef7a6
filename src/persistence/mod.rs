// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Saving and loading graphs.
//!
//! A saved graph is a JSON [`Snapshot`] of its tasks, optionally encrypted
//! with a password. `save` returns the SHA-256 checksum of the bytes written;
//! `load` verifies it before touching the content.

mod cipher;
mod snapshot;

pub use cipher::checksum;
pub use snapshot::{Snapshot, TaskRecord, UnitRecord};

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use crate::config::Runtime;
use crate::errors::PersistenceError;
use crate::graph::Graph;
use crate::observability::messages::{
    persistence::{ChecksumRejected, GraphLoaded, GraphSaved},
    StructuredLog,
};

impl Graph {
    /// Write the graph to `target`, encrypted when `password` is given.
    /// Returns the checksum `load` can verify against.
    pub fn save<W: Write>(&self, mut target: W, password: Option<&str>) -> Result<String, PersistenceError> {
        let plaintext = serde_json::to_vec(&Snapshot::capture(self))?;
        let bytes = match password {
            Some(password) => cipher::encrypt(&plaintext, password, &self.runtime().options.persistence)?,
            None => plaintext,
        };

        target.write_all(&bytes)?;
        target.flush()?;

        let checksum = checksum(&bytes);
        GraphSaved {
            graph_id: &self.id().to_string(),
            encrypted: password.is_some(),
            bytes: bytes.len(),
            checksum: &checksum,
        }
        .log();
        Ok(checksum)
    }

    /// Rebuild a graph saved with [`Graph::save`].
    ///
    /// A supplied checksum is compared before anything is decrypted or
    /// parsed. The loaded graph and all of its units get fresh run ids.
    pub fn load<R: Read>(
        runtime: Arc<Runtime>,
        mut source: R,
        password: Option<&str>,
        checksum: Option<&str>,
    ) -> Result<Self, PersistenceError> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;

        if let Some(checksum) = checksum {
            let actual = self::checksum(&bytes);
            let expected = checksum.trim().to_ascii_lowercase();
            if actual != expected {
                ChecksumRejected {
                    expected: &expected,
                    actual: &actual,
                }
                .log();
                return Err(PersistenceError::ChecksumMismatch { expected, actual });
            }
        }

        let plaintext = match password {
            Some(password) => cipher::decrypt(&bytes, password, &runtime.options.persistence)?,
            None => bytes,
        };

        let snapshot: Snapshot = serde_json::from_slice(&plaintext)?;
        let tasks = snapshot.restore(&runtime)?;
        let task_count = tasks.len();
        let graph = Graph::build(runtime, tasks)?;

        GraphLoaded {
            graph_id: &graph.id().to_string(),
            encrypted: password.is_some(),
            task_count,
        }
        .log();
        Ok(graph)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P, password: Option<&str>) -> Result<String, PersistenceError> {
        let file = File::create(path)?;
        self.save(BufWriter::new(file), password)
    }

    pub fn load_from_path<P: AsRef<Path>>(
        runtime: Arc<Runtime>,
        path: P,
        password: Option<&str>,
        checksum: Option<&str>,
    ) -> Result<Self, PersistenceError> {
        let file = File::open(path)?;
        Self::load(runtime, BufReader::new(file), password, checksum)
    }
}
