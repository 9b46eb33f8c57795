//! resolve::cache
//!
//! Shared per-process cache of template data and schemas.
//!
//! # Design
//!
//! One cache instance is shared by every resolver (and may be shared across
//! engines). Entries are keyed by component type name and, once present,
//! live for the life of the process; this crate never invalidates them.
//! Staleness is outside its scope.
//!
//! Locks are never held across an await: a resolver checks, fetches, and
//! inserts in three separate critical sections. Two concurrent resolutions
//! of the same uncached type may therefore each issue a redundant fetch,
//! with the last insert winning. That race is documented, accepted
//! behavior, not a defect; adding a cross-request fetch lock here would
//! change semantics the callers rely on being simple.
//!
//! Cached values are immutable; lookups return clones for the caller to
//! mutate freely.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::core::types::DataObject;
use crate::schema::Schema;

/// Shared template-data and schema cache.
#[derive(Debug, Default)]
pub struct ComponentCache {
    defaults: RwLock<HashMap<String, DataObject>>,
    schemas: RwLock<HashMap<String, Schema>>,
}

impl ComponentCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clone of the cached template data for a component type, if any.
    pub fn default_data(&self, name: &str) -> Option<DataObject> {
        let defaults = self.defaults.read().unwrap();
        defaults.get(name).cloned()
    }

    /// Cache template data for a component type. Last write wins.
    pub fn insert_default_data(&self, name: impl Into<String>, data: DataObject) {
        let mut defaults = self.defaults.write().unwrap();
        defaults.insert(name.into(), data);
    }

    /// A clone of the cached schema for a component type, if any.
    pub fn schema(&self, name: &str) -> Option<Schema> {
        let schemas = self.schemas.read().unwrap();
        schemas.get(name).cloned()
    }

    /// Cache a schema for a component type. Last write wins.
    pub fn insert_schema(&self, name: impl Into<String>, schema: Schema) {
        let mut schemas = self.schemas.write().unwrap();
        schemas.insert(name.into(), schema);
    }

    /// Whether a component type's template data is cached.
    pub fn has_default_data(&self, name: &str) -> bool {
        self.defaults.read().unwrap().contains_key(name)
    }

    /// Whether a component type's schema is cached.
    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.read().unwrap().contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn data(value: serde_json::Value) -> DataObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn default_data_roundtrip() {
        let cache = ComponentCache::new();
        assert!(cache.default_data("button").is_none());

        cache.insert_default_data("button", data(json!({"text": "hi"})));
        assert!(cache.has_default_data("button"));
        assert_eq!(cache.default_data("button"), Some(data(json!({"text": "hi"}))));
    }

    #[test]
    fn lookups_return_independent_clones() {
        let cache = ComponentCache::new();
        cache.insert_default_data("button", data(json!({"text": "hi"})));

        let mut copy = cache.default_data("button").unwrap();
        copy.insert("text".into(), json!("changed"));

        assert_eq!(cache.default_data("button"), Some(data(json!({"text": "hi"}))));
    }

    #[test]
    fn schema_roundtrip() {
        let cache = ComponentCache::new();
        assert!(!cache.has_schema("button"));

        let schema = Schema::from_value(json!({"text": {"_has": {"input": "text"}}})).unwrap();
        cache.insert_schema("button", schema.clone());
        assert_eq!(cache.schema("button"), Some(schema));
    }

    #[test]
    fn last_insert_wins() {
        let cache = ComponentCache::new();
        cache.insert_default_data("button", data(json!({"v": 1})));
        cache.insert_default_data("button", data(json!({"v": 2})));

        assert_eq!(cache.default_data("button"), Some(data(json!({"v": 2}))));
    }
}
