//! create
//!
//! The creation engine: public entry point and its collaborator wiring.
//!
//! # Modules
//!
//! - [`discover`] - Shallow discovery of embeddable component references
//! - [`project`] - Store projection for one node, through its model
//! - `expand` - Frame-based expansion of a discovered child subtree
//!
//! # Node Lifecycle
//!
//! Every node moves through the same states:
//!
//! ```text
//! Requested -> DataResolved/SchemaKickedOff -> ChildrenDiscovered
//!   -> [ChildrenExpanded] -> StubCommitted -> FullyCommitted -> Returned
//! ```
//!
//! with `Failed` reachable from any resolution or commit step. `Returned`
//! and `Failed` are terminal; there is no retry and no rollback. Because
//! commits are non-transactional, a failure mid-tree can leave committed
//! children with no referencing parent in the store. That orphaning is
//! documented behavior, not compensated for.
//!
//! # Concurrency
//!
//! Roots given to [`ComponentCreator::create`] are processed independently
//! and fully concurrently, with no cross-root ordering. Aggregation waits
//! for every task and surfaces the first rejection; sibling tasks that
//! already issued commits keep their side effects.

pub mod discover;
mod expand;
pub mod project;

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub use project::StoreProjector;

use crate::core::config::{ConfigError, SiteConfig};
use crate::core::paths;
use crate::core::types::{ComponentRequest, DataObject, InstantiationMode};
use crate::ident::IdGenerator;
use crate::remote::ComponentService;
use crate::resolve::{ComponentCache, DefaultDataResolver, ResolutionFailed, SchemaResolver};
use crate::store::{Store, StoreError};
use crate::styles::StyleSink;
use crate::transform::{TransformError, TransformRegistry};

use self::discover::find_child_components;
use self::expand::TreeExpander;

/// Errors from component creation.
#[derive(Debug, Error)]
pub enum CreateError {
    /// Template-data or schema fetch failed; aborts this root only.
    #[error(transparent)]
    Resolution(#[from] ResolutionFailed),

    /// A model's save or render hook failed; fatal for that node's commit
    /// and propagated up through the recursion.
    #[error("transform failed for {uri}: {source}")]
    TransformFailed {
        /// The node being committed
        uri: String,
        /// The underlying model failure
        #[source]
        source: TransformError,
    },

    /// A store read or commit failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A clone-mode source lookup found nothing at the referenced instance.
    #[error("clone source not found in store: {uri}")]
    CloneSourceMissing {
        /// The instance reference that had no store value
        uri: String,
    },

    /// The site configuration could not be loaded from the store.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The creation engine.
///
/// Resolves one or many root component requests into committed instance
/// trees: template data and schema per type (cached), fresh instance
/// identifiers, recursive child instantiation, and the stub-then-full
/// store projection per parent. The returned trees feed the caller's
/// subsequent cascading persist, which is outside this engine.
pub struct ComponentCreator {
    store: Arc<dyn Store>,
    ids: Arc<dyn IdGenerator>,
    cache: Arc<ComponentCache>,
    defaults: DefaultDataResolver,
    schemas: SchemaResolver,
    projector: StoreProjector,
}

impl ComponentCreator {
    /// Create an engine with a fresh cache.
    pub fn new(
        store: Arc<dyn Store>,
        remote: Arc<dyn ComponentService>,
        transforms: TransformRegistry,
        styles: Arc<dyn StyleSink>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self::with_cache(
            store,
            remote,
            transforms,
            styles,
            ids,
            Arc::new(ComponentCache::new()),
        )
    }

    /// Create an engine sharing an existing cache.
    ///
    /// Engines sharing a cache share template data and schemas; the cache's
    /// documented no-lock miss race applies across them too.
    pub fn with_cache(
        store: Arc<dyn Store>,
        remote: Arc<dyn ComponentService>,
        transforms: TransformRegistry,
        styles: Arc<dyn StyleSink>,
        ids: Arc<dyn IdGenerator>,
        cache: Arc<ComponentCache>,
    ) -> Self {
        Self {
            defaults: DefaultDataResolver::new(remote.clone(), cache.clone()),
            schemas: SchemaResolver::new(remote, cache.clone(), styles),
            projector: StoreProjector::new(store.clone(), transforms),
            store,
            ids,
            cache,
        }
    }

    /// The engine's template/schema cache.
    pub fn cache(&self) -> &Arc<ComponentCache> {
        &self.cache
    }

    /// Create instances for every request, fully concurrently.
    ///
    /// Results come back in request order. All requests run to completion;
    /// the first failure is surfaced, and side effects of requests that
    /// already committed are kept.
    ///
    /// # Errors
    ///
    /// The first [`CreateError`] any root produced.
    pub async fn create(
        &self,
        requests: Vec<ComponentRequest>,
        mode: InstantiationMode,
    ) -> Result<Vec<DataObject>, CreateError> {
        let site = SiteConfig::from_store(self.store.as_ref()).await?;

        let results = join_all(
            requests
                .into_iter()
                .map(|request| self.create_one(&site, request, mode)),
        )
        .await;

        results.into_iter().collect()
    }

    /// Create one root instance and its children.
    async fn create_one(
        &self,
        site: &SiteConfig,
        request: ComponentRequest,
        mode: InstantiationMode,
    ) -> Result<DataObject, CreateError> {
        let ComponentRequest { name, data } = request;
        debug!(component = %name, clone = mode.is_clone(), "creating component");

        // the schema fetch rides alongside the data fetch so the schema is
        // cached by the time anything needs it after saving
        let (schema, template) = tokio::join!(
            self.schemas.resolve(site, &name),
            self.defaults.resolve(site, &name),
        );
        schema?;
        let mut merged = template?;

        // shallow merge: each top-level override key wins over the template
        if let Some(overrides) = data {
            for (key, value) in overrides {
                merged.insert(key, value);
            }
        }

        let uri = paths::instance_uri(&site.prefix, name.as_str(), &self.ids.new_id());
        let children = find_child_components(&merged, mode);

        if children.is_empty() {
            merged.insert(paths::REF_KEY.to_string(), Value::String(uri.clone()));
            let rendered = self.projector.commit(&uri, merged.clone()).await?;
            // a model's rendered fields win over the raw instance data
            if let Some(rendered) = rendered {
                for (key, value) in rendered {
                    merged.insert(key, value);
                }
            }
            Ok(merged)
        } else {
            TreeExpander::new(self)
                .expand(site, children, uri, merged, mode)
                .await
        }
    }
}
