//! Typed provider identifiers and alias handling.

/// Canonical provider keys used across model parsing, config, and provider wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKey {
    Groq,
    OpenAi,
    OpenAiCompatible,
}

impl ProviderKey {
    /// Canonical provider key string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenAi => "openai",
            Self::OpenAiCompatible => "openai-compatible",
        }
    }

    /// Parse user-facing provider aliases into a typed provider key.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "groq" => Some(Self::Groq),
            "openai" => Some(Self::OpenAi),
            "openai-compatible" | "openai_compatible" | "compat" => Some(Self::OpenAiCompatible),
            _ => None,
        }
    }

    /// Environment variable holding the API key.
    pub const fn api_key_env(self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::OpenAiCompatible => "OPENAI_COMPAT_API_KEY",
        }
    }

    /// Environment variable overriding the base URL.
    pub const fn base_url_env(self) -> &'static str {
        match self {
            Self::Groq => "GROQ_BASE_URL",
            Self::OpenAi => "OPENAI_BASE_URL",
            Self::OpenAiCompatible => "OPENAI_COMPAT_BASE_URL",
        }
    }

    /// Built-in endpoint, if the provider has a well-known one.
    pub const fn default_base_url(self) -> Option<&'static str> {
        match self {
            Self::Groq => Some("https://api.groq.com/openai/v1"),
            Self::OpenAi => Some("https://api.openai.com/v1"),
            Self::OpenAiCompatible => None,
        }
    }

    pub const ALL: [ProviderKey; 3] = [Self::Groq, Self::OpenAi, Self::OpenAiCompatible];
}

impl std::fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
