//! Check tool call arguments against the tool's JSON Schema before dispatch.

use thiserror::Error;

/// First schema violation found in a set of arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentViolation {
    #[error("expected object arguments, got {0}")]
    NotAnObject(&'static str),
    #[error("missing required field '{0}'")]
    MissingField(String),
    #[error("field '{field}' expected type '{expected}', got {actual}")]
    WrongType {
        field: String,
        expected: String,
        actual: &'static str,
    },
}

/// Validate tool arguments against a flat object schema.
///
/// Only top-level `type`, `required`, and per-property `type` are checked;
/// the tools in this crate take scalar arguments.
pub fn validate_arguments(
    args: &serde_json::Value,
    schema: &serde_json::Value,
) -> Result<(), ArgumentViolation> {
    let wants_object = schema.get("type").and_then(|v| v.as_str()) == Some("object");
    let Some(obj) = args.as_object() else {
        return if wants_object {
            Err(ArgumentViolation::NotAnObject(json_type_name(args)))
        } else {
            Ok(())
        };
    };

    let required = schema
        .get("required")
        .and_then(|v| v.as_array())
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str());
    for name in required {
        if !obj.contains_key(name) {
            return Err(ArgumentViolation::MissingField(name.to_string()));
        }
    }

    let Some(properties) = schema.get("properties").and_then(|v| v.as_object()) else {
        return Ok(());
    };
    for (key, value) in obj {
        let expected = properties
            .get(key)
            .and_then(|p| p.get("type"))
            .and_then(|t| t.as_str());
        if let Some(expected) = expected {
            if !value_matches_type(value, expected) {
                return Err(ArgumentViolation::WrongType {
                    field: key.clone(),
                    expected: expected.to_string(),
                    actual: json_type_name(value),
                });
            }
        }
    }

    Ok(())
}

fn value_matches_type(value: &serde_json::Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        _ => true,
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
