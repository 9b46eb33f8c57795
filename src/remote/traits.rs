//! remote::traits
//!
//! Component service trait for fetching remote component resources.
//!
//! # Design
//!
//! The `ComponentService` trait is async because every fetch involves
//! network I/O. The engine builds full URIs (see `core::paths`) and hands
//! them to the service; the service knows nothing about component
//! semantics.
//!
//! No retry policy lives on this side of the boundary: a failed fetch is
//! reported once and the caller decides what is fatal. Style text fetches
//! in particular are best-effort and their failures are swallowed by the
//! schema resolver, never by the service.
//!
//! # Thread Safety
//!
//! Implementations must be `Send + Sync` to allow use across async tasks.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::DataObject;
use crate::schema::Schema;

/// Errors from remote fetches.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the service
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not have the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// The remote source of component templates, schemas, and style text.
#[async_trait]
pub trait ComponentService: Send + Sync {
    /// Fetch a component's template (default) data.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the component type does not exist
    /// - `Decode` if the body is not a JSON object
    async fn fetch_object(&self, uri: &str) -> Result<DataObject, RemoteError>;

    /// Fetch a component's schema.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the component type has no schema
    /// - `Decode` if the body is not a JSON object
    async fn fetch_schema(&self, uri: &str) -> Result<Schema, RemoteError>;

    /// Fetch a text resource (stylesheets).
    ///
    /// # Errors
    ///
    /// - `NotFound` if the resource does not exist
    async fn fetch_text(&self, path: &str) -> Result<String, RemoteError>;
}
