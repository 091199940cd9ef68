//! Declarative shape check
//!
//! Runs on raw JSON before any typed access. Every violation is collected so
//! a malformed payload reports all its problems at once.

use serde_json::{Map, Value};

use crate::{HydraEdgeError, Result};

/// Expected JSON type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    String,
    /// String or integer
    Id,
    Array,
    Object,
    StringArray,
    IdArray,
}

impl JsonType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Id => is_id(value),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::StringArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            Self::IdArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(is_id)),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Id => "a string or integer",
            Self::Array => "an array",
            Self::Object => "an object",
            Self::StringArray => "an array of strings",
            Self::IdArray => "an array of strings or integers",
        }
    }
}

fn is_id(value: &Value) -> bool {
    value.is_string() || value.is_i64() || value.is_u64()
}

/// One field of an object schema
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub ty: JsonType,
    pub required: bool,
}

const fn required(name: &'static str, ty: JsonType) -> FieldRule {
    FieldRule { name, ty, required: true }
}

const fn optional(name: &'static str, ty: JsonType) -> FieldRule {
    FieldRule { name, ty, required: false }
}

pub const PAYLOAD_FIELDS: &[FieldRule] = &[
    required("sentence", JsonType::String),
    required("nodes", JsonType::Array),
    required("edges", JsonType::Array),
    optional("version", JsonType::String),
    optional("layouts", JsonType::Object),
];

pub const NODE_FIELDS: &[FieldRule] = &[
    required("id", JsonType::Id),
    required("ntype", JsonType::String),
    optional("filler", JsonType::String),
    optional("roles", JsonType::StringArray),
    optional("eid_set", JsonType::IdArray),
    optional("eid", JsonType::Id),
];

pub const EDGE_FIELDS: &[FieldRule] = &[
    required("source", JsonType::Id),
    required("target", JsonType::Id),
    required("kind", JsonType::String),
    optional("id", JsonType::Id),
];

pub const LAYOUT_FIELDS: &[FieldRule] = &[optional("hulls", JsonType::Array)];

pub const HULL_FIELDS: &[FieldRule] = &[
    required("members", JsonType::IdArray),
    optional("eid", JsonType::Id),
];

/// Check `payload` against the sentence-graph shape
///
/// Returns the list of shape errors (empty if the shape is valid). Fails
/// with `Payload` if the input is not a JSON object at all.
pub fn check_shape(payload: &Value) -> Result<Vec<String>> {
    let root = payload.as_object().ok_or_else(|| {
        HydraEdgeError::Payload(format!("expected a JSON object, got {}", type_name(payload)))
    })?;

    let mut errors = Vec::new();
    check_fields(root, PAYLOAD_FIELDS, "payload", &mut errors);

    check_items(root.get("nodes"), NODE_FIELDS, "nodes", &mut errors);
    check_items(root.get("edges"), EDGE_FIELDS, "edges", &mut errors);

    if let Some(Value::Object(layouts)) = root.get("layouts") {
        check_fields(layouts, LAYOUT_FIELDS, "layouts", &mut errors);
        check_items(layouts.get("hulls"), HULL_FIELDS, "layouts.hulls", &mut errors);
    }

    Ok(errors)
}

/// Check every element of an array field against an object schema
fn check_items(array: Option<&Value>, rules: &[FieldRule], path: &str, errors: &mut Vec<String>) {
    let Some(Value::Array(items)) = array else {
        return;
    };

    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{}[{}]", path, i);
        match item.as_object() {
            Some(obj) => check_fields(obj, rules, &item_path, errors),
            None => errors.push(format!(
                "Schema: {} must be an object (got {})",
                item_path,
                type_name(item)
            )),
        }
    }
}

fn check_fields(obj: &Map<String, Value>, rules: &[FieldRule], path: &str, errors: &mut Vec<String>) {
    for rule in rules {
        match obj.get(rule.name) {
            None if rule.required => {
                errors.push(format!("Schema: {} missing required key '{}'", path, rule.name));
            }
            Some(value) if !rule.ty.matches(value) => {
                errors.push(format!(
                    "Schema: {}.{} must be {} (got {})",
                    path,
                    rule.name,
                    rule.ty.describe(),
                    type_name(value)
                ));
            }
            _ => {}
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
