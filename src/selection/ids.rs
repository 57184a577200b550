//! Region identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable identifier of a persisted region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(u64);

impl RegionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "selection-{}", self.0)
    }
}

/// Source of fresh ids. Owned by the store; never shared between stores.
pub trait IdGenerator {
    /// Must never return the same id twice.
    fn next_id(&mut self) -> RegionId;
}

/// Monotonic counter starting at zero.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> RegionId {
        let id = RegionId(self.next);
        self.next += 1;
        id
    }
}
