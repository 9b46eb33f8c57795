//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`ComponentName`] - Validated component type name
//! - [`Reference`] - Parsed component reference, tagged template/instance
//! - [`ComponentRequest`] - Caller input to the creation engine
//! - [`InstantiationMode`] - Template vs. clone instantiation policy
//! - [`DataPath`] - Location of a child inside a parent's data node
//! - [`ChildSlot`] / [`ChildMapping`] - Discovered children of one node
//!
//! # Validation
//!
//! These types enforce validity at construction time. A `Reference` can only
//! be built from a URI that actually routes to a component, and its
//! template/instance subkind is decided structurally at parse time rather
//! than re-derived ad hoc at every use site.
//!
//! # Examples
//!
//! ```
//! use trellis::core::types::{ComponentName, Reference};
//!
//! let name = ComponentName::new("button").unwrap();
//! assert_eq!(name.as_str(), "button");
//!
//! let template = Reference::parse("site.test/_components/button").unwrap();
//! assert!(template.is_template());
//!
//! let instance = Reference::parse("site.test/_components/button/instances/a1").unwrap();
//! assert!(!instance.is_template());
//!
//! // Invalid constructions fail at creation time
//! assert!(ComponentName::new("not/a/name").is_err());
//! assert!(Reference::parse("site.test/css/button.css").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::paths;

/// Arbitrary nested component data: a JSON object.
///
/// Template data cached per component type is immutable once cached; callers
/// receive clones and may mutate those freely.
pub type DataObject = serde_json::Map<String, Value>;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid component name: {0}")]
    InvalidComponentName(String),

    #[error("not a component reference: {0}")]
    InvalidReference(String),
}

/// A validated component type name.
///
/// Component names are lowercase-ish identifiers used as URI segments, so
/// they must be non-empty and contain only ASCII alphanumerics, `-`, or `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentName(String);

impl ComponentName {
    /// Create a validated component name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TypeError::InvalidComponentName(name));
        }
        Ok(Self(name))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ComponentName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ComponentName> for String {
    fn from(name: ComponentName) -> Self {
        name.0
    }
}

/// The two subkinds of component reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// Points at a reusable default, not yet instantiated.
    Template,
    /// Points at a concrete, uniquely created node.
    Instance,
}

/// A parsed component reference.
///
/// Wraps the raw reference URI together with its structurally-determined
/// subkind and the component type it routes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    uri: String,
    kind: RefKind,
    name: ComponentName,
}

impl Reference {
    /// Parse a reference URI.
    ///
    /// The subkind is decided by the presence of the instances route segment;
    /// no marker fields are consulted.
    ///
    /// # Errors
    ///
    /// `TypeError::InvalidReference` if the URI does not route to a
    /// component, or `TypeError::InvalidComponentName` if the name segment
    /// is malformed.
    pub fn parse(uri: &str) -> Result<Self, TypeError> {
        let name = paths::component_name_from_uri(uri)
            .ok_or_else(|| TypeError::InvalidReference(uri.to_string()))?;
        let name = ComponentName::new(name)?;
        let kind = if paths::is_instance_uri(uri) {
            RefKind::Instance
        } else {
            RefKind::Template
        };
        Ok(Self {
            uri: uri.to_string(),
            kind,
            name,
        })
    }

    /// The raw reference URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The reference subkind.
    pub fn kind(&self) -> RefKind {
        self.kind
    }

    /// Whether this reference points at a reusable template.
    pub fn is_template(&self) -> bool {
        self.kind == RefKind::Template
    }

    /// The component type this reference routes to.
    pub fn component_name(&self) -> &ComponentName {
        &self.name
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri)
    }
}

/// Caller input to the creation engine: a component type to instantiate,
/// with optional shallow override data merged over the template.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentRequest {
    /// Component type to instantiate.
    pub name: ComponentName,
    /// Optional override data; each top-level key wins over the template.
    #[serde(default)]
    pub data: Option<DataObject>,
}

impl ComponentRequest {
    /// Request a component with no override data.
    pub fn new(name: ComponentName) -> Self {
        Self { name, data: None }
    }

    /// Attach override data to the request.
    pub fn with_data(mut self, data: DataObject) -> Self {
        self.data = Some(data);
        self
    }
}

/// Instantiation policy, applied uniformly across recursion levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstantiationMode {
    /// Children are instantiated from their type's template data; only
    /// template references are eligible for instantiation.
    #[default]
    Template,
    /// Children are duplicated from the current store value of the
    /// referenced instance; any reference is eligible.
    Clone,
}

impl InstantiationMode {
    /// Whether clone-mode semantics apply.
    pub fn is_clone(self) -> bool {
        self == InstantiationMode::Clone
    }
}

/// Location of a discovered child inside its parent's data node.
///
/// Either a top-level key (`body`) or an index into a sequence held at a
/// top-level key (`list[2]`). Discovery is shallow, so paths never nest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataPath {
    key: String,
    index: Option<usize>,
}

impl DataPath {
    /// Path to an object value held directly at a key.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            index: None,
        }
    }

    /// Path to an element of a sequence held at a key.
    pub fn indexed(key: impl Into<String>, index: usize) -> Self {
        Self {
            key: key.into(),
            index: Some(index),
        }
    }

    /// Replace the value at this path in `target`.
    ///
    /// Paths are produced by discovery over the same data shape, so a
    /// mismatch (missing key, non-array, index out of bounds) means the
    /// caller mutated the data since discovery; the write is skipped.
    pub fn set(&self, target: &mut DataObject, value: Value) {
        match self.index {
            None => {
                target.insert(self.key.clone(), value);
            }
            Some(index) => {
                if let Some(Value::Array(items)) = target.get_mut(&self.key) {
                    if let Some(slot) = items.get_mut(index) {
                        *slot = value;
                    }
                }
            }
        }
    }

    /// Read the value at this path, if the shape matches.
    pub fn get<'a>(&self, target: &'a DataObject) -> Option<&'a Value> {
        match self.index {
            None => target.get(&self.key),
            Some(index) => target.get(&self.key)?.as_array()?.get(index),
        }
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            None => write!(f, "{}", self.key),
            Some(index) => write!(f, "{}[{}]", self.key, index),
        }
    }
}

/// One discovered child: where it sits in the parent, and what it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildSlot {
    /// Path within the parent's data node.
    pub path: DataPath,
    /// The reference found at that path.
    pub reference: Reference,
}

/// All children discovered in one node, in data key order. Never nested;
/// deeper levels are discovered after the child's own data is resolved.
pub type ChildMapping = Vec<ChildSlot>;
