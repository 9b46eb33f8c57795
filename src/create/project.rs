//! create::project
//!
//! Two-phase-capable store projection for one node.
//!
//! # Design
//!
//! The projector is the single doorway from the creation engine to the
//! store. It applies the component type's model (save, then render) when
//! one is registered, writes the resulting value, and hands the rendered
//! form back so the caller can fold it into its return value. Without a
//! model the data is written unchanged and nothing is handed back.
//!
//! The projector never issues a network persist of its own; durably saving
//! the expanded tree is the caller's cascading operation, outside this
//! crate.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::CreateError;
use crate::core::paths;
use crate::core::types::DataObject;
use crate::store::Store;
use crate::transform::TransformRegistry;

/// Commits node data to the store, through the node's model if it has one.
pub struct StoreProjector {
    store: Arc<dyn Store>,
    transforms: TransformRegistry,
}

impl StoreProjector {
    /// Create a projector over a store and a transform registry.
    pub fn new(store: Arc<dyn Store>, transforms: TransformRegistry) -> Self {
        Self { store, transforms }
    }

    /// Commit one node's data.
    ///
    /// Returns the rendered data when a model ran, `None` otherwise.
    ///
    /// # Errors
    ///
    /// - [`CreateError::TransformFailed`] if the model's save or render
    ///   hook fails; nothing is written in that case
    /// - [`CreateError::Store`] if the store write fails
    pub async fn commit(
        &self,
        uri: &str,
        data: DataObject,
    ) -> Result<Option<DataObject>, CreateError> {
        let transform = paths::component_name_from_uri(uri)
            .and_then(|name| self.transforms.transform_for(name));

        match transform {
            Some(transform) => {
                debug!(%uri, "committing through model");
                let saved = transform
                    .save(uri, data)
                    .await
                    .map_err(|source| CreateError::TransformFailed {
                        uri: uri.to_string(),
                        source,
                    })?;
                let rendered = transform.render(uri, saved).await.map_err(|source| {
                    CreateError::TransformFailed {
                        uri: uri.to_string(),
                        source,
                    }
                })?;
                self.store
                    .commit(uri, Value::Object(rendered.clone()))
                    .await?;
                Ok(Some(rendered))
            }
            None => {
                debug!(%uri, "committing");
                self.store.commit(uri, Value::Object(data)).await?;
                Ok(None)
            }
        }
    }
}
