//! schema::legacy
//!
//! Detection and conversion of the legacy behavior encoding.
//!
//! # Background
//!
//! Older schemas describe a field's editing UI as a behavior list:
//!
//! ```json
//! { "title": { "_has": ["text", { "fn": "required" }] } }
//! ```
//!
//! or the string shorthand `"_has": "text"`. The canonical encoding names a
//! single main input and attaches everything else as properties:
//!
//! ```json
//! { "title": { "_has": { "input": "text", "required": true } } }
//! ```
//!
//! Conversion rules, per field:
//!
//! - a string shorthand becomes `{ "input": <string> }`
//! - in a list, the first entry is the main input (a string names it; an
//!   object's `fn` names it and the object's remaining keys merge in)
//! - every later entry attaches under its name: a bare string as `true`, an
//!   object as its remaining keys (or `true` when it has none)
//!
//! Both functions are pure; the resolver applies them before caching so the
//! cache only ever holds canonical schemas.

use serde_json::{Map, Value};
use tracing::debug;

use super::Schema;

const HAS_KEY: &str = "_has";
const INPUT_KEY: &str = "input";
const FN_KEY: &str = "fn";

/// Whether any field in the schema still uses the legacy behavior encoding.
pub fn has_legacy_behaviors(schema: &Schema) -> bool {
    schema.fields().values().any(|field| {
        matches!(
            field.get(HAS_KEY),
            Some(Value::String(_)) | Some(Value::Array(_))
        )
    })
}

/// Convert every legacy field of a schema to the canonical input encoding.
///
/// Fields already in canonical form, non-object fields, and `_`-prefixed
/// metadata entries pass through untouched.
pub fn convert_schema(schema: Schema, name: &str) -> Schema {
    debug!(component = %name, "converting legacy behavior schema");

    let fields = schema
        .into_fields()
        .into_iter()
        .map(|(key, field)| {
            let converted = match field {
                Value::Object(mut descriptor) => {
                    if let Some(has) = descriptor.get(HAS_KEY) {
                        if matches!(has, Value::String(_) | Value::Array(_)) {
                            let canonical = convert_behavior_list(has);
                            descriptor.insert(HAS_KEY.to_string(), canonical);
                        }
                    }
                    Value::Object(descriptor)
                }
                other => other,
            };
            (key, converted)
        })
        .collect();

    Schema::new(fields)
}

/// Convert one legacy `_has` value into the canonical input object.
fn convert_behavior_list(has: &Value) -> Value {
    let mut canonical = Map::new();

    match has {
        Value::String(input) => {
            canonical.insert(INPUT_KEY.to_string(), Value::String(input.clone()));
        }
        Value::Array(behaviors) => {
            for (position, behavior) in behaviors.iter().enumerate() {
                match behavior {
                    Value::String(name) => {
                        if position == 0 {
                            canonical.insert(INPUT_KEY.to_string(), Value::String(name.clone()));
                        } else {
                            canonical.insert(name.clone(), Value::Bool(true));
                        }
                    }
                    Value::Object(descriptor) => {
                        let fn_name = descriptor.get(FN_KEY).and_then(Value::as_str);
                        let args: Map<String, Value> = descriptor
                            .iter()
                            .filter(|(key, _)| key.as_str() != FN_KEY)
                            .map(|(key, value)| (key.clone(), value.clone()))
                            .collect();

                        if position == 0 {
                            let input = fn_name.unwrap_or("text");
                            canonical
                                .insert(INPUT_KEY.to_string(), Value::String(input.to_string()));
                            canonical.extend(args);
                        } else if let Some(fn_name) = fn_name {
                            let attached = if args.is_empty() {
                                Value::Bool(true)
                            } else {
                                Value::Object(args)
                            };
                            canonical.insert(fn_name.to_string(), attached);
                        }
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }

    Value::Object(canonical)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn schema(value: Value) -> Schema {
        Schema::from_value(value).unwrap()
    }

    #[test]
    fn detects_string_shorthand() {
        let legacy = schema(json!({"title": {"_has": "text"}}));
        assert!(has_legacy_behaviors(&legacy));
    }

    #[test]
    fn detects_behavior_lists() {
        let legacy = schema(json!({"title": {"_has": ["text", {"fn": "required"}]}}));
        assert!(has_legacy_behaviors(&legacy));
    }

    #[test]
    fn canonical_schemas_are_not_legacy() {
        let canonical = schema(json!({
            "title": {"_has": {"input": "text"}},
            "_description": "a card"
        }));
        assert!(!has_legacy_behaviors(&canonical));
    }

    #[test]
    fn converts_string_shorthand() {
        let converted = convert_schema(schema(json!({"title": {"_has": "text"}})), "card");
        assert_eq!(
            converted.get("title"),
            Some(&json!({"_has": {"input": "text"}}))
        );
    }

    #[test]
    fn converts_list_with_main_input_and_flags() {
        let converted = convert_schema(
            schema(json!({"title": {"_has": ["text", "required"]}})),
            "card",
        );
        assert_eq!(
            converted.get("title"),
            Some(&json!({"_has": {"input": "text", "required": true}}))
        );
    }

    #[test]
    fn converts_fn_objects_with_args() {
        let converted = convert_schema(
            schema(json!({
                "title": {"_has": [
                    {"fn": "text", "type": "url"},
                    {"fn": "soft-maxlength", "value": 80}
                ]}
            })),
            "card",
        );
        assert_eq!(
            converted.get("title"),
            Some(&json!({"_has": {
                "input": "text",
                "type": "url",
                "soft-maxlength": {"value": 80}
            }}))
        );
    }

    #[test]
    fn later_fn_object_without_args_attaches_as_flag() {
        let converted = convert_schema(
            schema(json!({"title": {"_has": ["text", {"fn": "required"}]}})),
            "card",
        );
        assert_eq!(
            converted.get("title"),
            Some(&json!({"_has": {"input": "text", "required": true}}))
        );
    }

    #[test]
    fn leaves_canonical_fields_and_metadata_alone() {
        let input = json!({
            "title": {"_has": {"input": "text"}},
            "caption": {"_has": "text"},
            "_version": 3
        });
        let converted = convert_schema(schema(input), "card");
        assert_eq!(
            converted.get("title"),
            Some(&json!({"_has": {"input": "text"}}))
        );
        assert_eq!(
            converted.get("caption"),
            Some(&json!({"_has": {"input": "text"}}))
        );
        assert_eq!(converted.get("_version"), Some(&json!(3)));
    }

    #[test]
    fn conversion_is_idempotent_on_result() {
        let converted = convert_schema(
            schema(json!({"title": {"_has": ["text", "required"]}})),
            "card",
        );
        assert!(!has_legacy_behaviors(&converted));
    }
}
