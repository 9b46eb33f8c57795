//! remote
//!
//! The remote component service collaborator: trait, HTTP implementation,
//! and mock.
//!
//! # Modules
//!
//! - [`traits`] - `ComponentService` trait and `RemoteError`
//! - [`http`] - `HttpComponentService` over reqwest
//! - [`mock`] - `MockComponentService` for deterministic testing

pub mod http;
pub mod mock;
pub mod traits;

pub use http::HttpComponentService;
pub use traits::{ComponentService, RemoteError};
