//! styles
//!
//! Presentation style injection seam.
//!
//! # Design
//!
//! When a schema is fetched for the first time, the resolver also fetches
//! the component's stylesheets and pushes any it finds into a `StyleSink`.
//! The sink is where the presentation layer plugs in; this crate only ever
//! appends to it. Injection is synchronous and infallible from the engine's
//! point of view: style *fetches* can fail (and are swallowed upstream),
//! but a fetched stylesheet is always accepted.

use std::sync::{Arc, Mutex};

/// Destination for fetched component stylesheets.
pub trait StyleSink: Send + Sync {
    /// Append one stylesheet to the presentation layer.
    fn inject(&self, css: &str);
}

/// Style sink that collects injected stylesheets in memory.
///
/// Doubles as the test double: tests assert on [`injected`](Self::injected).
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStyleSink {
    inner: Arc<Mutex<Vec<String>>>,
}

impl MemoryStyleSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stylesheet injected so far, in injection order.
    pub fn injected(&self) -> Vec<String> {
        self.inner.lock().unwrap().clone()
    }

    /// Number of stylesheets injected so far.
    pub fn count(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

impl StyleSink for MemoryStyleSink {
    fn inject(&self, css: &str) {
        self.inner.lock().unwrap().push(css.to_string());
    }
}
