//! resolve::schemas
//!
//! Schema resolution, with style warming and legacy conversion.
//!
//! # Design
//!
//! A schema cache miss is the signal that a component type is new to this
//! process, so the resolver uses it to warm the presentation layer too: the
//! schema fetch and the stylesheet fetches run concurrently, and any
//! stylesheet that turns up is injected into the [`StyleSink`]. A missing
//! or failing stylesheet is logged and dropped; only the schema fetch can
//! fail the resolution.
//!
//! Schemas still in the legacy behavior encoding are converted to canonical
//! form before caching, so the cache only ever holds canonical schemas.

use std::sync::Arc;

use tracing::debug;

use super::cache::ComponentCache;
use super::{ResolutionFailed, ResourceKind};
use crate::core::config::SiteConfig;
use crate::core::paths;
use crate::core::types::ComponentName;
use crate::remote::ComponentService;
use crate::schema::{legacy, Schema};
use crate::styles::StyleSink;

/// Resolves a component type's schema from the cache or the remote service.
pub struct SchemaResolver {
    remote: Arc<dyn ComponentService>,
    cache: Arc<ComponentCache>,
    styles: Arc<dyn StyleSink>,
}

impl SchemaResolver {
    /// Create a resolver over a remote service, a shared cache, and a style
    /// sink.
    pub fn new(
        remote: Arc<dyn ComponentService>,
        cache: Arc<ComponentCache>,
        styles: Arc<dyn StyleSink>,
    ) -> Self {
        Self {
            remote,
            cache,
            styles,
        }
    }

    /// Resolve the schema for a component type.
    ///
    /// # Errors
    ///
    /// [`ResolutionFailed`] if the schema fetch fails. Style fetch failures
    /// never surface.
    pub async fn resolve(
        &self,
        site: &SiteConfig,
        name: &ComponentName,
    ) -> Result<Schema, ResolutionFailed> {
        if let Some(schema) = self.cache.schema(name.as_str()) {
            debug!(component = %name, "schema cache hit");
            return Ok(schema);
        }

        let uri = paths::schema_uri(&site.prefix, name.as_str());
        debug!(component = %name, %uri, "fetching schema");

        // no schema cached implies styles were never warmed for this type
        let (schema, _styles) =
            tokio::join!(self.remote.fetch_schema(&uri), self.warm_styles(site, name));

        let schema = schema.map_err(|source| ResolutionFailed {
            name: name.to_string(),
            kind: ResourceKind::Schema,
            source,
        })?;

        let schema = if legacy::has_legacy_behaviors(&schema) {
            legacy::convert_schema(schema, name.as_str())
        } else {
            schema
        };

        self.cache.insert_schema(name.as_str(), schema.clone());
        Ok(schema)
    }

    /// Best-effort fetch of the base and site stylesheets.
    async fn warm_styles(&self, site: &SiteConfig, name: &ComponentName) {
        let base_path = paths::base_style_path(&site.prefix, name.as_str());
        let site_path = site
            .slug
            .as_deref()
            .map(|slug| paths::site_style_path(&site.prefix, name.as_str(), slug));

        let (base, site_css) = tokio::join!(self.remote.fetch_text(&base_path), async {
            match &site_path {
                Some(path) => Some(self.remote.fetch_text(path).await),
                None => None,
            }
        });

        match base {
            Ok(css) => self.styles.inject(&css),
            Err(error) => debug!(path = %base_path, %error, "base style fetch failed (ignored)"),
        }

        if let (Some(result), Some(path)) = (site_css, site_path) {
            match result {
                Ok(css) => self.styles.inject(&css),
                Err(error) => debug!(%path, %error, "site style fetch failed (ignored)"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::remote::mock::{FetchKind, MockComponentService};
    use crate::remote::RemoteError;
    use crate::styles::MemoryStyleSink;

    fn site(slug: Option<&str>) -> SiteConfig {
        SiteConfig {
            prefix: "site.test".into(),
            slug: slug.map(String::from),
        }
    }

    fn name(n: &str) -> ComponentName {
        ComponentName::new(n).unwrap()
    }

    fn resolver(
        remote: &MockComponentService,
        styles: &MemoryStyleSink,
    ) -> (SchemaResolver, Arc<ComponentCache>) {
        let cache = Arc::new(ComponentCache::new());
        let resolver = SchemaResolver::new(
            Arc::new(remote.clone()),
            cache.clone(),
            Arc::new(styles.clone()),
        );
        (resolver, cache)
    }

    #[tokio::test]
    async fn fetches_and_caches_on_miss() {
        let remote = MockComponentService::new().with_schema(
            "site.test/_components/button/schema",
            json!({"text": {"_has": {"input": "text"}}}),
        );
        let styles = MemoryStyleSink::new();
        let (resolver, cache) = resolver(&remote, &styles);

        let schema = resolver.resolve(&site(None), &name("button")).await.unwrap();
        assert!(schema.get("text").is_some());
        assert!(cache.has_schema("button"));
    }

    #[tokio::test]
    async fn second_resolve_is_served_from_cache() {
        let remote = MockComponentService::new().with_schema(
            "site.test/_components/button/schema",
            json!({"text": {"_has": {"input": "text"}}}),
        );
        let styles = MemoryStyleSink::new();
        let (resolver, _cache) = resolver(&remote, &styles);

        resolver.resolve(&site(None), &name("button")).await.unwrap();
        resolver.resolve(&site(None), &name("button")).await.unwrap();

        assert_eq!(
            remote.fetch_count(FetchKind::Schema, "site.test/_components/button/schema"),
            1
        );
    }

    #[tokio::test]
    async fn legacy_schemas_are_converted_before_caching() {
        let remote = MockComponentService::new().with_schema(
            "site.test/_components/button/schema",
            json!({"text": {"_has": ["text", "required"]}}),
        );
        let styles = MemoryStyleSink::new();
        let (resolver, cache) = resolver(&remote, &styles);

        let schema = resolver.resolve(&site(None), &name("button")).await.unwrap();
        assert_eq!(
            schema.get("text"),
            Some(&json!({"_has": {"input": "text", "required": true}}))
        );
        assert!(!legacy::has_legacy_behaviors(&cache.schema("button").unwrap()));
    }

    #[tokio::test]
    async fn styles_are_warmed_on_miss() {
        let remote = MockComponentService::new()
            .with_schema(
                "site.test/_components/button/schema",
                json!({"text": {"_has": {"input": "text"}}}),
            )
            .with_text("site.test/css/button.css", ".button {}")
            .with_text("site.test/css/button.main.css", ".button.main {}");
        let styles = MemoryStyleSink::new();
        let (resolver, _cache) = resolver(&remote, &styles);

        resolver
            .resolve(&site(Some("main")), &name("button"))
            .await
            .unwrap();

        assert_eq!(
            styles.injected(),
            vec![".button {}".to_string(), ".button.main {}".to_string()]
        );
    }

    #[tokio::test]
    async fn style_failures_are_swallowed() {
        let remote = MockComponentService::new().with_schema(
            "site.test/_components/button/schema",
            json!({"text": {"_has": {"input": "text"}}}),
        );
        let styles = MemoryStyleSink::new();
        let (resolver, _cache) = resolver(&remote, &styles);

        // no stylesheets configured; resolution still succeeds
        resolver
            .resolve(&site(Some("main")), &name("button"))
            .await
            .unwrap();
        assert_eq!(styles.count(), 0);
    }

    #[tokio::test]
    async fn site_style_is_skipped_without_slug() {
        let remote = MockComponentService::new()
            .with_schema(
                "site.test/_components/button/schema",
                json!({"text": {"_has": {"input": "text"}}}),
            )
            .with_text("site.test/css/button.css", ".button {}");
        let styles = MemoryStyleSink::new();
        let (resolver, _cache) = resolver(&remote, &styles);

        resolver.resolve(&site(None), &name("button")).await.unwrap();

        assert_eq!(styles.injected(), vec![".button {}".to_string()]);
        assert_eq!(
            remote.fetch_count(FetchKind::Text, "site.test/css/button.main.css"),
            0
        );
    }

    #[tokio::test]
    async fn cache_hit_skips_style_fetches() {
        let remote = MockComponentService::new()
            .with_schema(
                "site.test/_components/button/schema",
                json!({"text": {"_has": {"input": "text"}}}),
            )
            .with_text("site.test/css/button.css", ".button {}");
        let styles = MemoryStyleSink::new();
        let (resolver, _cache) = resolver(&remote, &styles);

        resolver.resolve(&site(None), &name("button")).await.unwrap();
        resolver.resolve(&site(None), &name("button")).await.unwrap();

        assert_eq!(
            remote.fetch_count(FetchKind::Text, "site.test/css/button.css"),
            1
        );
        assert_eq!(styles.count(), 1);
    }

    #[tokio::test]
    async fn schema_fetch_failure_propagates() {
        let remote = MockComponentService::new();
        let styles = MemoryStyleSink::new();
        let (resolver, cache) = resolver(&remote, &styles);

        let error = resolver
            .resolve(&site(None), &name("button"))
            .await
            .unwrap_err();
        assert_eq!(error.kind, ResourceKind::Schema);
        assert!(matches!(error.source, RemoteError::NotFound(_)));
        assert!(!cache.has_schema("button"));
    }
}
