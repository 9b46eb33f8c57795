//! create::discover
//!
//! Shallow discovery of embeddable component references in a data node.
//!
//! # Design
//!
//! Discovery scans only the top-level keys of one node: a sequence value is
//! inspected element by element, an object value directly, scalars not at
//! all. Deeper nesting is intentionally not walked here; grandchildren are
//! discovered by running discovery again on the child's own data once it
//! has been resolved.
//!
//! In template mode only template references qualify (instance references
//! embedded in a template are left alone). In clone mode any reference
//! qualifies: cloning an ancestor duplicates everything it points at.

use serde_json::Value;

use crate::core::paths;
use crate::core::types::{ChildMapping, ChildSlot, DataObject, DataPath, InstantiationMode, Reference};

/// Find the children of one data node eligible for instantiation.
///
/// Returns one slot per qualifying entry, keyed by its path within the
/// node (`body`, `list[2]`), in data key order.
pub fn find_child_components(data: &DataObject, mode: InstantiationMode) -> ChildMapping {
    let mut mapping = Vec::new();

    for (key, value) in data {
        match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    if let Some(reference) = discoverable_ref(item, mode) {
                        mapping.push(ChildSlot {
                            path: DataPath::indexed(key.as_str(), index),
                            reference,
                        });
                    }
                }
            }
            Value::Object(_) => {
                if let Some(reference) = discoverable_ref(value, mode) {
                    mapping.push(ChildSlot {
                        path: DataPath::key(key.as_str()),
                        reference,
                    });
                }
            }
            _ => {}
        }
    }

    mapping
}

/// The reference carried by a value, if it qualifies for instantiation.
fn discoverable_ref(value: &Value, mode: InstantiationMode) -> Option<Reference> {
    let raw = value.get(paths::REF_KEY)?.as_str()?;
    let reference = Reference::parse(raw).ok()?;
    if reference.is_template() || mode.is_clone() {
        Some(reference)
    } else {
        None
    }
}
