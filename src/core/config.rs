//! core::config
//!
//! Site configuration, read from the store's config projection.
//!
//! # Overview
//!
//! The engine builds every URI from the current site's prefix, and the
//! site-specific stylesheet path additionally needs the site slug. Both come
//! from the `site` entry of the store's config projection; this module gives
//! them a type.
//!
//! # Example
//!
//! ```
//! use trellis::core::config::SiteConfig;
//! use trellis::store::MemoryStore;
//!
//! # tokio_test::block_on(async {
//! let store = MemoryStore::new();
//! store.set_site("site.test", Some("main"));
//!
//! let site = SiteConfig::from_store(&store).await.unwrap();
//! assert_eq!(site.prefix, "site.test");
//! assert_eq!(site.slug.as_deref(), Some("main"));
//! # });
//! ```

use serde::Deserialize;
use thiserror::Error;

use crate::store::{Store, StoreError};

/// Config projection key holding the site settings.
pub const SITE_CONFIG_KEY: &str = "site";

/// Errors from site configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config projection has no usable site entry.
    #[error("site configuration missing from store")]
    MissingSite,

    /// The site entry exists but does not parse.
    #[error("invalid site configuration: {0}")]
    Invalid(String),

    /// Reading the config projection failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Site settings the engine builds URIs from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SiteConfig {
    /// URI prefix for every component resource (e.g. `site.test`).
    pub prefix: String,
    /// Site slug for site-specific stylesheet overrides, if the site has one.
    #[serde(default)]
    pub slug: Option<String>,
}

impl SiteConfig {
    /// Load the site configuration from a store's config projection.
    ///
    /// # Errors
    ///
    /// - `MissingSite` if the `site` entry is absent or has an empty prefix
    /// - `Invalid` if the entry does not deserialize
    pub async fn from_store(store: &dyn Store) -> Result<Self, ConfigError> {
        let value = store
            .read_config(SITE_CONFIG_KEY)
            .await?
            .ok_or(ConfigError::MissingSite)?;
        let site: SiteConfig =
            serde_json::from_value(value).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if site.prefix.is_empty() {
            return Err(ConfigError::MissingSite);
        }
        Ok(site)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn loads_prefix_and_slug() {
        let store = MemoryStore::new();
        store.set_site("site.test", Some("main"));

        let site = SiteConfig::from_store(&store).await.unwrap();
        assert_eq!(site.prefix, "site.test");
        assert_eq!(site.slug.as_deref(), Some("main"));
    }

    #[tokio::test]
    async fn slug_is_optional() {
        let store = MemoryStore::new();
        store.set_site("site.test", None);

        let site = SiteConfig::from_store(&store).await.unwrap();
        assert_eq!(site.slug, None);
    }

    #[tokio::test]
    async fn missing_site_entry() {
        let store = MemoryStore::new();

        let result = SiteConfig::from_store(&store).await;
        assert!(matches!(result, Err(ConfigError::MissingSite)));
    }

    #[tokio::test]
    async fn empty_prefix_is_missing() {
        let store = MemoryStore::new();
        store.set_config("site", json!({"prefix": ""}));

        let result = SiteConfig::from_store(&store).await;
        assert!(matches!(result, Err(ConfigError::MissingSite)));
    }

    #[tokio::test]
    async fn malformed_entry_is_invalid() {
        let store = MemoryStore::new();
        store.set_config("site", json!("just a string"));

        let result = SiteConfig::from_store(&store).await;
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
