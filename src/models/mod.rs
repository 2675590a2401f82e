//! Model selection: `provider:model` strings.

pub mod provider_key;

pub use provider_key::ProviderKey;

use std::fmt;
use std::str::FromStr;

use crate::error::HitlError;

/// Model used when none is given on the command line.
pub const DEFAULT_MODEL: &str = "groq:llama-3.3-70b-versatile";

/// A parsed `provider:model` selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelSpec {
    pub provider: ProviderKey,
    pub model_id: String,
}

impl ModelSpec {
    pub fn new(provider: ProviderKey, model_id: impl Into<String>) -> Self {
        Self {
            provider,
            model_id: model_id.into(),
        }
    }
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self::new(ProviderKey::Groq, "llama-3.3-70b-versatile")
    }
}

impl FromStr for ModelSpec {
    type Err = HitlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, model_id) = s.split_once(':').ok_or_else(|| {
            HitlError::Configuration(format!(
                "Invalid model format: '{s}'. Use provider:model (e.g. {DEFAULT_MODEL})"
            ))
        })?;
        let provider = ProviderKey::parse(provider.trim()).ok_or_else(|| {
            HitlError::Configuration(format!("Unknown provider: '{provider}'"))
        })?;
        let model_id = model_id.trim();
        if model_id.is_empty() {
            return Err(HitlError::Configuration(format!(
                "Missing model id in '{s}'"
            )));
        }
        Ok(Self::new(provider, model_id))
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.model_id)
    }
}
