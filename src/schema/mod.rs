//! schema
//!
//! Component schema type and legacy-encoding conversion.
//!
//! # Overview
//!
//! A schema is the structural/behavioral descriptor for one component type:
//! a JSON object mapping field names to field descriptors, plus top-level
//! `_`-prefixed metadata. Schemas are fetched once per type, converted from
//! the legacy behavior-list encoding if necessary ([`legacy`]), and then
//! cached for the life of the process.
//!
//! # Modules
//!
//! - [`legacy`] - Detection and conversion of the legacy behavior encoding

pub mod legacy;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::types::DataObject;

/// A component type's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(DataObject);

impl Schema {
    /// Wrap an already-shaped schema object.
    pub fn new(fields: DataObject) -> Self {
        Self(fields)
    }

    /// Build a schema from a JSON value, if it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// The schema's fields and metadata entries.
    pub fn fields(&self) -> &DataObject {
        &self.0
    }

    /// Look up one entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Consume the schema, yielding its underlying object.
    pub fn into_fields(self) -> DataObject {
        self.0
    }
}
