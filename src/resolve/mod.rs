//! resolve
//!
//! Resolution of component templates and schemas, with caching.
//!
//! # Modules
//!
//! - [`cache`] - Shared per-process template/schema cache
//! - [`defaults`] - Template ("default") data resolution
//! - [`schemas`] - Schema resolution, with style warming and legacy
//!   conversion
//!
//! # Failure Semantics
//!
//! A failed template-data or schema fetch is [`ResolutionFailed`]: fatal,
//! never cached, propagated to the caller. Style fetches are best-effort
//! and never surface.

pub mod cache;
pub mod defaults;
pub mod schemas;

use std::fmt;

use thiserror::Error;

pub use cache::ComponentCache;
pub use defaults::DefaultDataResolver;
pub use schemas::SchemaResolver;

use crate::remote::RemoteError;

/// Which resource a resolution was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Template (default) data.
    DefaultData,
    /// Schema.
    Schema,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::DefaultData => write!(f, "default data"),
            ResourceKind::Schema => write!(f, "schema"),
        }
    }
}

/// A template-data or schema fetch failed.
///
/// Fatal for the enclosing create call of that root; the failure is not
/// cached, so a later resolution of the same type retries the fetch.
#[derive(Debug, Error)]
#[error("failed to resolve {kind} for component '{name}': {source}")]
pub struct ResolutionFailed {
    /// The component type being resolved
    pub name: String,
    /// Which resource the fetch was for
    pub kind: ResourceKind,
    /// The underlying fetch error
    pub source: RemoteError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_failed_display() {
        let error = ResolutionFailed {
            name: "button".into(),
            kind: ResourceKind::Schema,
            source: RemoteError::NotFound("site.test/_components/button/schema".into()),
        };
        assert_eq!(
            error.to_string(),
            "failed to resolve schema for component 'button': \
             not found: site.test/_components/button/schema"
        );
    }
}
