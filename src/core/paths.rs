//! core::paths
//!
//! URI routing for component resources.
//!
//! # Overview
//!
//! Every component resource lives under a site prefix and a fixed set of
//! route segments:
//!
//! - `{prefix}/_components/{name}` — the reusable template ("default") data
//! - `{prefix}/_components/{name}/schema` — the component's schema
//! - `{prefix}/_components/{name}/instances/{id}` — a concrete instance
//! - `{prefix}/css/{name}.css` — base stylesheet
//! - `{prefix}/css/{name}.{slug}.css` — site-specific stylesheet override
//!
//! URIs are opaque strings to every collaborator; this module is the only
//! place that knows how they are assembled and taken apart.
//!
//! # Example
//!
//! ```
//! use trellis::core::paths;
//!
//! let uri = paths::instance_uri("site.test", "button", "abc123");
//! assert_eq!(uri, "site.test/_components/button/instances/abc123");
//! assert!(paths::is_instance_uri(&uri));
//! assert_eq!(paths::component_name_from_uri(&uri), Some("button"));
//! ```

/// Field key carrying a node's own (or another node's) reference.
pub const REF_KEY: &str = "_ref";

/// Route segment for component resources.
pub const COMPONENT_ROUTE: &str = "/_components/";

/// Suffix for a component type's schema resource.
pub const SCHEMA_ROUTE: &str = "/schema";

/// Route segment separating a component type from its instances.
pub const INSTANCES_ROUTE: &str = "/instances/";

/// URI of a component type's template (default) data.
pub fn component_uri(prefix: &str, name: &str) -> String {
    format!("{prefix}{COMPONENT_ROUTE}{name}")
}

/// URI of a component type's schema.
pub fn schema_uri(prefix: &str, name: &str) -> String {
    format!("{prefix}{COMPONENT_ROUTE}{name}{SCHEMA_ROUTE}")
}

/// URI of a concrete component instance.
pub fn instance_uri(prefix: &str, name: &str, id: &str) -> String {
    format!("{prefix}{COMPONENT_ROUTE}{name}{INSTANCES_ROUTE}{id}")
}

/// Path of a component's base stylesheet.
pub fn base_style_path(prefix: &str, name: &str) -> String {
    format!("{prefix}/css/{name}.css")
}

/// Path of a component's site-specific stylesheet override.
pub fn site_style_path(prefix: &str, name: &str, slug: &str) -> String {
    format!("{prefix}/css/{name}.{slug}.css")
}

/// Extract the component name from any component URI.
///
/// Returns `None` if the URI does not contain the component route.
pub fn component_name_from_uri(uri: &str) -> Option<&str> {
    let start = uri.find(COMPONENT_ROUTE)? + COMPONENT_ROUTE.len();
    let rest = &uri[start..];
    let name = rest.split('/').next().unwrap_or(rest);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Whether a URI points at a concrete instance rather than a template.
///
/// Instance URIs carry the instances route segment; template URIs do not.
/// This is the structural predicate that distinguishes the two reference
/// subkinds.
pub fn is_instance_uri(uri: &str) -> bool {
    uri.contains(INSTANCES_ROUTE)
}
