//! Trellis - a recursive component-instance resolution engine
//!
//! Trellis turns named component requests into committed instance trees:
//! it resolves each component type's template data and schema (from a
//! shared per-process cache or a remote service), mints a fresh instance
//! identifier, discovers nested template references in the data, recursively
//! instantiates those children (or duplicates existing instances in clone
//! mode), rewires the parent to point at them, and projects both a
//! reference-only stub and the fully expanded data into a shared store. The
//! expanded tree comes back to the caller for its subsequent cascading
//! persist, which is outside this crate.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`core`] - Domain types, URI routing, and site configuration
//! - [`store`] - The shared store collaborator (trait + in-memory impl)
//! - [`remote`] - The remote component service (trait, HTTP impl, mock)
//! - [`schema`] - Schema type and legacy-encoding conversion
//! - [`styles`] - Presentation style injection seam
//! - [`transform`] - Per-type model (save/render) hooks and registry
//! - [`ident`] - Instance identifier generation
//! - [`resolve`] - Cached template-data and schema resolution
//! - [`create`] - The creation engine and its public entry point
//!
//! # Correctness Invariants
//!
//! 1. Every instance gets exactly one identifier, minted at creation time,
//!    unique across the process
//! 2. A node's self-reference field always equals its storage identifier
//! 3. A parent's reference-only stub lands in the store strictly before its
//!    full data; the store never holds a full parent whose child path
//!    resolves to nothing
//! 4. Cache entries, once present, are never invalidated by this crate
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use trellis::core::types::{ComponentName, ComponentRequest, InstantiationMode};
//! use trellis::create::ComponentCreator;
//! use trellis::ident::SequentialIdGenerator;
//! use trellis::remote::mock::MockComponentService;
//! use trellis::store::MemoryStore;
//! use trellis::styles::MemoryStyleSink;
//! use trellis::transform::TransformRegistry;
//!
//! # tokio_test::block_on(async {
//! let store = MemoryStore::new();
//! store.set_site("site.test", None);
//!
//! let remote = MockComponentService::new()
//!     .with_object("site.test/_components/button", json!({"text": "click me"}))
//!     .with_schema(
//!         "site.test/_components/button/schema",
//!         json!({"text": {"_has": {"input": "text"}}}),
//!     );
//!
//! let engine = ComponentCreator::new(
//!     Arc::new(store.clone()),
//!     Arc::new(remote),
//!     TransformRegistry::new(),
//!     Arc::new(MemoryStyleSink::new()),
//!     Arc::new(SequentialIdGenerator::new()),
//! );
//!
//! let request = ComponentRequest::new(ComponentName::new("button").unwrap());
//! let created = engine
//!     .create(vec![request], InstantiationMode::Template)
//!     .await
//!     .unwrap();
//!
//! let uri = "site.test/_components/button/instances/cid1";
//! assert_eq!(created[0]["_ref"], json!(uri));
//! assert_eq!(store.read_sync(uri).unwrap()["text"], json!("click me"));
//! # });
//! ```

pub mod core;
pub mod create;
pub mod ident;
pub mod remote;
pub mod resolve;
pub mod schema;
pub mod store;
pub mod styles;
pub mod transform;
