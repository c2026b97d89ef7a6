// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Two-part identity of a processing unit.
///
/// `lineage` is shared by a unit and every fork or reload of it, so related
/// copies of one logical node can be recognized. `run` is unique to a single
/// in-memory instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitIdentity {
    pub lineage: Uuid,
    pub run: Uuid,
}

impl UnitIdentity {
    pub fn new() -> Self {
        Self {
            lineage: Uuid::new_v4(),
            run: Uuid::new_v4(),
        }
    }

    /// Same lineage, new run id.
    pub fn renewed(&self) -> Self {
        Self {
            lineage: self.lineage,
            run: Uuid::new_v4(),
        }
    }

    pub fn is_related(&self, other: &UnitIdentity) -> bool {
        self.lineage == other.lineage
    }
}

impl Default for UnitIdentity {
    fn default() -> Self {
        Self::new()
    }
}
