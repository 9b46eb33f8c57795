//! transform
//!
//! Model transform collaborator: per-type save/render hooks applied at
//! commit time.
//!
//! # Design
//!
//! A component type may register a model: a pair of hooks the projector
//! runs before writing a node to the store. `save` normalizes the data,
//! `render` derives the renderable representation from the saved form; the
//! renderable form is what lands in the store. Types without a model commit
//! their data unchanged.
//!
//! Transform failures are fatal for that node's commit and propagate up
//! through the recursion; there is no fallback to committing the raw data.
//!
//! # Example
//!
//! ```ignore
//! let registry = TransformRegistry::new();
//! registry.register("article", Arc::new(ArticleModel));
//!
//! assert!(registry.has_transform("article"));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::DataObject;

/// Errors from model transforms.
#[derive(Debug, Clone, Error)]
pub enum TransformError {
    /// The save hook rejected or failed on the data.
    #[error("model save failed for {uri}: {message}")]
    SaveFailed {
        /// The node being committed
        uri: String,
        /// What went wrong
        message: String,
    },

    /// The render hook failed on the saved data.
    #[error("model render failed for {uri}: {message}")]
    RenderFailed {
        /// The node being committed
        uri: String,
        /// What went wrong
        message: String,
    },
}

/// A component type's model: save and render hooks.
#[async_trait]
pub trait ModelTransform: Send + Sync {
    /// Normalize data before it is stored.
    async fn save(&self, uri: &str, data: DataObject) -> Result<DataObject, TransformError>;

    /// Derive the renderable representation from saved data.
    async fn render(&self, uri: &str, data: DataObject) -> Result<DataObject, TransformError>;
}

/// Registry of model transforms, keyed by component type name.
///
/// Thread-safe via internal `Arc<RwLock<...>>` wrapping; clones share state.
#[derive(Clone, Default)]
pub struct TransformRegistry {
    inner: Arc<RwLock<HashMap<String, Arc<dyn ModelTransform>>>>,
}

impl TransformRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model for a component type, replacing any existing one.
    pub fn register(&self, name: impl Into<String>, transform: Arc<dyn ModelTransform>) {
        let mut inner = self.inner.write().unwrap();
        inner.insert(name.into(), transform);
    }

    /// The model registered for a component type, if any.
    pub fn transform_for(&self, name: &str) -> Option<Arc<dyn ModelTransform>> {
        let inner = self.inner.read().unwrap();
        inner.get(name).cloned()
    }

    /// Whether a component type has a registered model.
    pub fn has_transform(&self, name: &str) -> bool {
        let inner = self.inner.read().unwrap();
        inner.contains_key(name)
    }
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read().unwrap();
        f.debug_struct("TransformRegistry")
            .field("types", &inner.keys().collect::<Vec<_>>())
            .finish()
    }
}
