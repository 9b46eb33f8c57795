//! remote::mock
//!
//! Mock component service for deterministic testing.
//!
//! # Design
//!
//! The mock serves fixtures from in-memory maps keyed by URI. A fetch for a
//! URI with no fixture answers `RemoteError::NotFound`, which is exactly
//! how the resolvers see a missing component type in production. Every
//! fetch is recorded, so tests can assert cache idempotence (one fetch per
//! type) and the documented duplicate-fetch race (two fetches when two
//! resolutions of one uncached type interleave).
//!
//! Each fetch yields to the scheduler once before answering, standing in
//! for the suspension a real network fetch introduces; without it the
//! cache-miss race would be unobservable under a cooperative scheduler.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use trellis::remote::mock::MockComponentService;
//! use trellis::remote::{ComponentService, RemoteError};
//!
//! # tokio_test::block_on(async {
//! let remote = MockComponentService::new()
//!     .with_object("site.test/_components/button", json!({"text": "hi"}));
//!
//! let data = remote.fetch_object("site.test/_components/button").await.unwrap();
//! assert_eq!(data["text"], json!("hi"));
//!
//! let missing = remote.fetch_object("site.test/_components/nope").await;
//! assert!(matches!(missing, Err(RemoteError::NotFound(_))));
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::traits::{ComponentService, RemoteError};
use crate::core::types::DataObject;
use crate::schema::Schema;

/// Which fetch kind an operation was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Template (default) data fetch.
    Object,
    /// Schema fetch.
    Schema,
    /// Text (stylesheet) fetch.
    Text,
}

/// One recorded fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRecord {
    /// What was fetched.
    pub kind: FetchKind,
    /// The URI or path that was requested.
    pub target: String,
}

/// Configuration for which fetch kind should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail fetch_object with the given error.
    FetchObject(RemoteError),
    /// Fail fetch_schema with the given error.
    FetchSchema(RemoteError),
    /// Fail fetch_text with the given error.
    FetchText(RemoteError),
}

/// Mock component service for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockComponentService {
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Debug, Default)]
struct MockInner {
    objects: HashMap<String, DataObject>,
    schemas: HashMap<String, Schema>,
    texts: HashMap<String, String>,
    fetches: Vec<FetchRecord>,
    fail_on: Option<FailOn>,
}

impl MockComponentService {
    /// Create an empty mock; every fetch answers `NotFound`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add template data served at a component URI.
    ///
    /// Non-object values are ignored; template data is always an object.
    pub fn with_object(self, uri: impl Into<String>, data: Value) -> Self {
        if let Value::Object(data) = data {
            let mut inner = self.inner.lock().unwrap();
            inner.objects.insert(uri.into(), data);
            drop(inner);
        }
        self
    }

    /// Add a schema served at a schema URI.
    pub fn with_schema(self, uri: impl Into<String>, schema: Value) -> Self {
        if let Some(schema) = Schema::from_value(schema) {
            let mut inner = self.inner.lock().unwrap();
            inner.schemas.insert(uri.into(), schema);
            drop(inner);
        }
        self
    }

    /// Add a text resource served at a path.
    pub fn with_text(self, path: impl Into<String>, body: impl Into<String>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.texts.insert(path.into(), body.into());
        }
        self
    }

    /// Configure the mock to fail on a specific fetch kind.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// All recorded fetches, in issue order.
    pub fn fetches(&self) -> Vec<FetchRecord> {
        let inner = self.inner.lock().unwrap();
        inner.fetches.clone()
    }

    /// How many times one target was fetched.
    pub fn fetch_count(&self, kind: FetchKind, target: &str) -> usize {
        let inner = self.inner.lock().unwrap();
        inner
            .fetches
            .iter()
            .filter(|record| record.kind == kind && record.target == target)
            .count()
    }

    fn record(&self, kind: FetchKind, target: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fetches.push(FetchRecord {
            kind,
            target: target.to_string(),
        });
    }

    fn check_fail(&self, kind: FetchKind) -> Option<RemoteError> {
        let inner = self.inner.lock().unwrap();
        match (&inner.fail_on, kind) {
            (Some(FailOn::FetchObject(e)), FetchKind::Object) => Some(e.clone()),
            (Some(FailOn::FetchSchema(e)), FetchKind::Schema) => Some(e.clone()),
            (Some(FailOn::FetchText(e)), FetchKind::Text) => Some(e.clone()),
            _ => None,
        }
    }
}

#[async_trait]
impl ComponentService for MockComponentService {
    async fn fetch_object(&self, uri: &str) -> Result<DataObject, RemoteError> {
        tokio::task::yield_now().await;
        self.record(FetchKind::Object, uri);

        if let Some(error) = self.check_fail(FetchKind::Object) {
            return Err(error);
        }

        let inner = self.inner.lock().unwrap();
        inner
            .objects
            .get(uri)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(uri.to_string()))
    }

    async fn fetch_schema(&self, uri: &str) -> Result<Schema, RemoteError> {
        tokio::task::yield_now().await;
        self.record(FetchKind::Schema, uri);

        if let Some(error) = self.check_fail(FetchKind::Schema) {
            return Err(error);
        }

        let inner = self.inner.lock().unwrap();
        inner
            .schemas
            .get(uri)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(uri.to_string()))
    }

    async fn fetch_text(&self, path: &str) -> Result<String, RemoteError> {
        tokio::task::yield_now().await;
        self.record(FetchKind::Text, path);

        if let Some(error) = self.check_fail(FetchKind::Text) {
            return Err(error);
        }

        let inner = self.inner.lock().unwrap();
        inner
            .texts
            .get(path)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(path.to_string()))
    }
}
