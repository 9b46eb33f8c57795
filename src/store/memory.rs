//! store::memory
//!
//! In-memory store implementation.
//!
//! # Design
//!
//! `MemoryStore` keeps all committed values in a map and records every
//! commit in a sequenced log. The log is what makes the engine's ordering
//! guarantees checkable: a parent's stub commit must land before its full
//! commit, and both after every child's commit, which tests assert by
//! comparing log sequence numbers.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use trellis::store::memory::MemoryStore;
//! use trellis::store::Store;
//!
//! # tokio_test::block_on(async {
//! let store = MemoryStore::new();
//! store.commit("site.test/_components/button/instances/a1", json!({"text": "hi"}))
//!     .await
//!     .unwrap();
//!
//! let value = store.read("site.test/_components/button/instances/a1").await.unwrap();
//! assert_eq!(value, Some(json!({"text": "hi"})));
//! assert_eq!(store.commit_log().len(), 1);
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::traits::{Store, StoreError};

/// One recorded commit, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    /// Position in the global commit order, starting at 0.
    pub seq: u64,
    /// The key that was written.
    pub uri: String,
    /// The value that was written.
    pub data: Value,
}

/// In-memory store.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    entries: HashMap<String, Value>,
    config: HashMap<String, Value>,
    log: Vec<CommitRecord>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a config projection value.
    pub fn set_config(&self, key: impl Into<String>, value: Value) {
        let mut inner = self.inner.lock().unwrap();
        inner.config.insert(key.into(), value);
    }

    /// Convenience: set the `site` config entry the engine builds URIs from.
    pub fn set_site(&self, prefix: &str, slug: Option<&str>) {
        let site = match slug {
            Some(slug) => json!({ "prefix": prefix, "slug": slug }),
            None => json!({ "prefix": prefix }),
        };
        self.set_config("site", site);
    }

    /// Seed a value without recording a commit.
    ///
    /// Used by tests to stand up pre-existing instances for clone-mode
    /// source lookups.
    pub fn seed(&self, uri: impl Into<String>, data: Value) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.insert(uri.into(), data);
    }

    /// All commits, in issue order.
    pub fn commit_log(&self) -> Vec<CommitRecord> {
        let inner = self.inner.lock().unwrap();
        inner.log.clone()
    }

    /// All commits for one key, in issue order.
    pub fn commits_for(&self, uri: &str) -> Vec<CommitRecord> {
        let inner = self.inner.lock().unwrap();
        inner.log.iter().filter(|r| r.uri == uri).cloned().collect()
    }

    /// Current value at a key, without going through the async trait.
    pub fn read_sync(&self, uri: &str) -> Option<Value> {
        let inner = self.inner.lock().unwrap();
        inner.entries.get(uri).cloned()
    }

    /// Number of distinct keys holding a value.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.entries.len()
    }

    /// Whether the store holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn commit(&self, uri: &str, data: Value) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let seq = inner.log.len() as u64;
        inner.log.push(CommitRecord {
            seq,
            uri: uri.to_string(),
            data: data.clone(),
        });
        inner.entries.insert(uri.to_string(), data);
        Ok(())
    }

    async fn read(&self, uri: &str) -> Result<Option<Value>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.entries.get(uri).cloned())
    }

    async fn read_config(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.config.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commit_then_read() {
        let store = MemoryStore::new();
        store.commit("a", json!({"x": 1})).await.unwrap();

        assert_eq!(store.read("a").await.unwrap(), Some(json!({"x": 1})));
        assert_eq!(store.read("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn commit_is_upsert() {
        let store = MemoryStore::new();
        store.commit("a", json!(1)).await.unwrap();
        store.commit("a", json!(2)).await.unwrap();

        assert_eq!(store.read("a").await.unwrap(), Some(json!(2)));
        assert_eq!(store.commits_for("a").len(), 2);
    }

    #[tokio::test]
    async fn log_sequences_commits_in_issue_order() {
        let store = MemoryStore::new();
        store.commit("a", json!(1)).await.unwrap();
        store.commit("b", json!(2)).await.unwrap();
        store.commit("a", json!(3)).await.unwrap();

        let log = store.commit_log();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].seq, 0);
        assert_eq!(log[1].seq, 1);
        assert_eq!(log[2].seq, 2);
        assert_eq!(log[2].uri, "a");
        assert_eq!(log[2].data, json!(3));
    }

    #[tokio::test]
    async fn seed_does_not_log() {
        let store = MemoryStore::new();
        store.seed("a", json!(1));

        assert_eq!(store.read("a").await.unwrap(), Some(json!(1)));
        assert!(store.commit_log().is_empty());
    }

    #[tokio::test]
    async fn config_projection() {
        let store = MemoryStore::new();
        store.set_site("site.test", Some("main"));

        let site = store.read_config("site").await.unwrap().unwrap();
        assert_eq!(site["prefix"], json!("site.test"));
        assert_eq!(site["slug"], json!("main"));
        assert_eq!(store.read_config("other").await.unwrap(), None);
    }

    #[test]
    fn clones_share_state() {
        let store = MemoryStore::new();
        let clone = store.clone();
        clone.seed("a", json!(1));

        assert_eq!(store.read_sync("a"), Some(json!(1)));
    }
}
