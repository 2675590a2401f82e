//! Typed access to tool call arguments.

use crate::error::HitlError;

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Arguments as a JSON value, decoding the string form some providers
    /// send. An empty string decodes to `{}`.
    pub fn normalized(&self) -> Result<serde_json::Value, HitlError> {
        match &self.value {
            serde_json::Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Ok(serde_json::json!({}))
                } else {
                    serde_json::from_str::<serde_json::Value>(trimmed).map_err(|e| {
                        HitlError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
                    })
                }
            }
            other => Ok(other.clone()),
        }
    }

    /// Deserialize the entire arguments into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, HitlError> {
        serde_json::from_value(self.normalized()?).map_err(|e| {
            HitlError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}
