//! resolve::defaults
//!
//! Template ("default") data resolution.

use std::sync::Arc;

use tracing::debug;

use super::cache::ComponentCache;
use super::{ResolutionFailed, ResourceKind};
use crate::core::config::SiteConfig;
use crate::core::paths;
use crate::core::types::{ComponentName, DataObject};
use crate::remote::ComponentService;

/// Resolves a component type's template data from the cache or the remote
/// service.
pub struct DefaultDataResolver {
    remote: Arc<dyn ComponentService>,
    cache: Arc<ComponentCache>,
}

impl DefaultDataResolver {
    /// Create a resolver over a remote service and a shared cache.
    pub fn new(remote: Arc<dyn ComponentService>, cache: Arc<ComponentCache>) -> Self {
        Self { remote, cache }
    }

    /// Resolve the template data for a component type.
    ///
    /// Cache hits return a clone of the cached value without touching the
    /// network. Misses fetch `{prefix}/_components/{name}`, cache the
    /// result, and return it. The cache check and the insert are separate
    /// critical sections: concurrent misses on one type may each fetch,
    /// last insert wins.
    ///
    /// # Errors
    ///
    /// [`ResolutionFailed`] if the fetch fails; the failure is not cached.
    pub async fn resolve(
        &self,
        site: &SiteConfig,
        name: &ComponentName,
    ) -> Result<DataObject, ResolutionFailed> {
        if let Some(data) = self.cache.default_data(name.as_str()) {
            debug!(component = %name, "default data cache hit");
            return Ok(data);
        }

        let uri = paths::component_uri(&site.prefix, name.as_str());
        debug!(component = %name, %uri, "fetching default data");

        let data = self
            .remote
            .fetch_object(&uri)
            .await
            .map_err(|source| ResolutionFailed {
                name: name.to_string(),
                kind: ResourceKind::DefaultData,
                source,
            })?;

        self.cache.insert_default_data(name.as_str(), data.clone());
        Ok(data)
    }
}
