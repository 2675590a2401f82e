//! Configuration (layered: code > env > `.env` file).

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::models::ProviderKey;

/// Default bound on model→tool round trips within one turn.
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

const MAX_ITERATIONS_ENV: &str = "HITL_MAX_ITERATIONS";
const APPROVAL_TTL_ENV: &str = "HITL_APPROVAL_TTL_SECS";

/// Layered configuration for the agent.
///
/// Credentials and endpoints are keyed by provider. Values set in code
/// override what [`HitlConfig::from_env`] loaded.
#[derive(Debug, Clone)]
pub struct HitlConfig {
    api_keys: Arc<RwLock<HashMap<ProviderKey, String>>>,
    base_urls: Arc<RwLock<HashMap<ProviderKey, String>>>,
    max_iterations: usize,
    approval_ttl: Option<Duration>,
}

impl Default for HitlConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HitlConfig {
    /// Create empty config.
    pub fn new() -> Self {
        Self {
            api_keys: Arc::new(RwLock::new(HashMap::new())),
            base_urls: Arc::new(RwLock::new(HashMap::new())),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            approval_ttl: None,
        }
    }

    /// Load from the process environment after reading `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // .env is optional
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        for provider in ProviderKey::ALL {
            if let Some(key) = lookup(provider.api_key_env()).filter(|v| !v.trim().is_empty()) {
                config.set_api_key(provider, key);
            }
            if let Some(url) = lookup(provider.base_url_env()).filter(|v| !v.trim().is_empty()) {
                config.set_base_url(provider, url);
            }
        }

        if let Some(raw) = lookup(MAX_ITERATIONS_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.max_iterations = n,
                _ => tracing::warn!(value = %raw, "ignoring invalid {MAX_ITERATIONS_ENV}"),
            }
        }

        if let Some(raw) = lookup(APPROVAL_TTL_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.approval_ttl = Some(Duration::from_secs(secs)),
                _ => tracing::warn!(value = %raw, "ignoring invalid {APPROVAL_TTL_ENV}"),
            }
        }

        config
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_approval_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.approval_ttl = ttl;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// How long a pending approval stays valid; `None` means forever.
    pub fn approval_ttl(&self) -> Option<Duration> {
        self.approval_ttl
    }

    pub fn set_api_key(&self, provider: ProviderKey, key: String) {
        write(&self.api_keys).insert(provider, key);
    }

    pub fn get_api_key(&self, provider: ProviderKey) -> Option<String> {
        read(&self.api_keys).get(&provider).cloned()
    }

    pub fn set_base_url(&self, provider: ProviderKey, url: String) {
        write(&self.base_urls).insert(provider, url);
    }

    /// Configured base URL, falling back to the provider's well-known one.
    pub fn get_base_url(&self, provider: ProviderKey) -> Option<String> {
        read(&self.base_urls)
            .get(&provider)
            .cloned()
            .or_else(|| provider.default_base_url().map(str::to_string))
    }

    pub fn has_credentials(&self, provider: ProviderKey) -> bool {
        self.get_api_key(provider).is_some()
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_keys_and_limits() {
        let config = HitlConfig::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk-test"),
            ("HITL_MAX_ITERATIONS", "5"),
            ("HITL_APPROVAL_TTL_SECS", "90"),
        ]));
        assert_eq!(config.get_api_key(ProviderKey::Groq).as_deref(), Some("gsk-test"));
        assert!(!config.has_credentials(ProviderKey::OpenAi));
        assert_eq!(config.max_iterations(), 5);
        assert_eq!(config.approval_ttl(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn invalid_numbers_keep_defaults() {
        let config = HitlConfig::from_lookup(lookup_from(&[
            ("HITL_MAX_ITERATIONS", "zero"),
            ("HITL_APPROVAL_TTL_SECS", "0"),
        ]));
        assert_eq!(config.max_iterations(), DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.approval_ttl(), None);
    }

    #[test]
    fn base_url_falls_back_to_provider_default() {
        let config = HitlConfig::new();
        assert_eq!(
            config.get_base_url(ProviderKey::Groq).as_deref(),
            Some("https://api.groq.com/openai/v1")
        );
        assert_eq!(config.get_base_url(ProviderKey::OpenAiCompatible), None);

        config.set_base_url(ProviderKey::Groq, "http://localhost:9000".into());
        assert_eq!(
            config.get_base_url(ProviderKey::Groq).as_deref(),
            Some("http://localhost:9000")
        );
    }
}
