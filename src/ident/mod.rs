//! ident
//!
//! Instance identifier generation.
//!
//! # Design
//!
//! Every created instance gets exactly one identifier, minted at creation
//! time and globally unique across the process. The generator is a seam so
//! tests can substitute deterministic identifiers; production uses UUIDs.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of globally unique instance identifiers.
pub trait IdGenerator: Send + Sync {
    /// Mint a fresh identifier. Never returns the same value twice.
    fn new_id(&self) -> String;
}

/// UUID v4 identifier generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn new_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic identifier generator for tests: `cid1`, `cid2`, ...
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Create a generator with the default `cid` prefix.
    pub fn new() -> Self {
        Self::with_prefix("cid")
    }

    /// Create a generator with an explicit prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn new_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn uuid_ids_are_unique_and_plain() {
        let ids = UuidIdGenerator;
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let id = ids.new_id();
            assert_eq!(id.len(), 32);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.new_id(), "cid1");
        assert_eq!(ids.new_id(), "cid2");
        assert_eq!(ids.new_id(), "cid3");
    }

    #[test]
    fn sequential_prefix_is_configurable() {
        let ids = SequentialIdGenerator::with_prefix("node");
        assert_eq!(ids.new_id(), "node1");
    }
}
