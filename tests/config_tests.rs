//! Tests for configuration loading.

use std::collections::HashMap;
use std::time::Duration;

use hitl_agent::config::{HitlConfig, DEFAULT_MAX_ITERATIONS};
use hitl_agent::models::ProviderKey;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_environment_uses_defaults() {
    let config = HitlConfig::from_lookup(lookup(&[]));
    assert_eq!(config.max_iterations(), DEFAULT_MAX_ITERATIONS);
    assert_eq!(config.approval_ttl(), None);
    assert!(!config.has_credentials(ProviderKey::Groq));
    assert_eq!(
        config.get_base_url(ProviderKey::Groq).as_deref(),
        Some("https://api.groq.com/openai/v1")
    );
    assert_eq!(config.get_base_url(ProviderKey::OpenAiCompatible), None);
}

#[test]
fn keys_and_urls_are_read_per_provider() {
    let config = HitlConfig::from_lookup(lookup(&[
        ("GROQ_API_KEY", "gsk-test"),
        ("OPENAI_API_KEY", "sk-test"),
        ("OPENAI_COMPAT_BASE_URL", "http://localhost:8080/v1"),
    ]));
    assert_eq!(config.get_api_key(ProviderKey::Groq).as_deref(), Some("gsk-test"));
    assert_eq!(config.get_api_key(ProviderKey::OpenAi).as_deref(), Some("sk-test"));
    assert_eq!(
        config.get_base_url(ProviderKey::OpenAiCompatible).as_deref(),
        Some("http://localhost:8080/v1")
    );
}

#[test]
fn blank_values_are_ignored() {
    let config = HitlConfig::from_lookup(lookup(&[("GROQ_API_KEY", "   ")]));
    assert!(!config.has_credentials(ProviderKey::Groq));
}

#[test]
fn loop_limits_are_read_from_env() {
    let config = HitlConfig::from_lookup(lookup(&[
        ("HITL_MAX_ITERATIONS", "5"),
        ("HITL_APPROVAL_TTL_SECS", "300"),
    ]));
    assert_eq!(config.max_iterations(), 5);
    assert_eq!(config.approval_ttl(), Some(Duration::from_secs(300)));
}

#[test]
fn invalid_limits_fall_back_to_defaults() {
    let config = HitlConfig::from_lookup(lookup(&[
        ("HITL_MAX_ITERATIONS", "zero"),
        ("HITL_APPROVAL_TTL_SECS", "0"),
    ]));
    assert_eq!(config.max_iterations(), DEFAULT_MAX_ITERATIONS);
    assert_eq!(config.approval_ttl(), None);
}

#[test]
fn values_set_in_code_override_loaded_ones() {
    let config = HitlConfig::from_lookup(lookup(&[("GROQ_API_KEY", "from-env")]))
        .with_max_iterations(3)
        .with_approval_ttl(Some(Duration::from_secs(10)));
    config.set_api_key(ProviderKey::Groq, "from-code".into());
    config.set_base_url(ProviderKey::Groq, "http://proxy/v1".into());

    assert_eq!(config.get_api_key(ProviderKey::Groq).as_deref(), Some("from-code"));
    assert_eq!(config.get_base_url(ProviderKey::Groq).as_deref(), Some("http://proxy/v1"));
    assert_eq!(config.max_iterations(), 3);
    assert_eq!(config.approval_ttl(), Some(Duration::from_secs(10)));
}

#[test]
fn clones_share_credentials() {
    let config = HitlConfig::new();
    let clone = config.clone();
    config.set_api_key(ProviderKey::OpenAi, "shared".into());
    assert!(clone.has_credentials(ProviderKey::OpenAi));
}

#[test]
fn max_iterations_is_at_least_one() {
    assert_eq!(HitlConfig::new().with_max_iterations(0).max_iterations(), 1);
}
