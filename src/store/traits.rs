//! store::traits
//!
//! Store trait definition for the shared key→value projection.
//!
//! # Design
//!
//! The `Store` trait is the creation engine's view of the shared store: an
//! upsert per node (`commit`), a point read used by clone-mode source
//! lookups (`read`), and a read-only config projection carrying site
//! settings (`read_config`).
//!
//! Commits are non-transactional. The engine sequences a node's stub commit
//! before its full commit by chaining, not by any store-side lock, and a
//! commit once issued is never rolled back. Durable persistence is not the
//! store's job here; the cascading persist happens elsewhere, after the
//! engine returns.
//!
//! # Thread Safety
//!
//! Implementations must be `Send + Sync` to allow use across async tasks.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Reading a value failed.
    #[error("store read failed for {uri}: {message}")]
    ReadFailed {
        /// The key that was read
        uri: String,
        /// What went wrong
        message: String,
    },

    /// Committing a value failed.
    #[error("store commit failed for {uri}: {message}")]
    CommitFailed {
        /// The key that was written
        uri: String,
        /// What went wrong
        message: String,
    },
}

/// The shared store the creation engine projects results into.
#[async_trait]
pub trait Store: Send + Sync {
    /// Upsert the value held at `uri`.
    async fn commit(&self, uri: &str, data: Value) -> Result<(), StoreError>;

    /// Read the current value held at `uri`, if any.
    ///
    /// Used for clone-mode source lookups; the engine deep-copies the
    /// result before mutating it.
    async fn read(&self, uri: &str) -> Result<Option<Value>, StoreError>;

    /// Read a value from the store's config projection, if present.
    ///
    /// The engine reads the `site` key to obtain the prefix and slug it
    /// builds URIs from.
    async fn read_config(&self, key: &str) -> Result<Option<Value>, StoreError>;
}
