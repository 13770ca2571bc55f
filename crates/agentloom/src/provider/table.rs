//! Static provider table: model prefixes and key-bearing environment
//! variables per supported provider. Fixed at compile time, loaded once,
//! never user-editable at runtime.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Sentinel provider used when a record names no provider and the model
/// string gives no hint. No prefix, no key lookup.
pub const CUSTOM_PROVIDER: &str = "custom";

/// One provider's invocation-layer constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderProfile {
    /// Prefix prepended to bare model strings, e.g. `openai/gpt-4o`.
    pub model_prefix: Option<&'static str>,
    /// Environment variable expected to carry the provider's API key.
    pub api_key_env: Option<&'static str>,
}

static PROVIDERS: Lazy<HashMap<&'static str, ProviderProfile>> = Lazy::new(|| {
    let mk = |model_prefix, api_key_env| ProviderProfile {
        model_prefix,
        api_key_env,
    };
    let mut m = HashMap::new();
    m.insert("openai", mk(Some("openai"), Some("OPENAI_API_KEY")));
    m.insert("anthropic", mk(Some("anthropic"), Some("ANTHROPIC_API_KEY")));
    m.insert(
        "google_ai_studio",
        mk(Some("gemini"), Some("GEMINI_API_KEY")),
    );
    m.insert("azure", mk(Some("azure"), Some("AZURE_API_KEY")));
    m.insert("watsonx", mk(Some("watsonx"), Some("WATSONX_APIKEY")));
    m.insert("groq", mk(Some("groq"), Some("GROQ_API_KEY")));
    m.insert("ollama", mk(Some("ollama"), None));
    m.insert("deepinfra", mk(Some("deepinfra"), Some("DEEPINFRA_API_KEY")));
    m.insert(
        "openrouter",
        mk(Some("openrouter"), Some("OPENROUTER_API_KEY")),
    );
    m.insert(CUSTOM_PROVIDER, mk(None, None));
    m
});

/// Look up a provider's profile; `None` marks an unknown id.
pub fn provider_profile(id: &str) -> Option<ProviderProfile> {
    PROVIDERS.get(id).copied()
}

/// Infer a provider id from well-known substrings of a raw model string.
pub fn infer_provider(model: &str) -> Option<&'static str> {
    let lower = model.to_ascii_lowercase();
    if lower.contains("gpt") {
        Some("openai")
    } else if lower.contains("gemini") {
        Some("google_ai_studio")
    } else if lower.contains("claude") {
        Some("anthropic")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_providers_have_profiles() {
        let openai = provider_profile("openai").expect("openai present");
        assert_eq!(openai.model_prefix, Some("openai"));
        assert_eq!(openai.api_key_env, Some("OPENAI_API_KEY"));

        let custom = provider_profile(CUSTOM_PROVIDER).expect("custom present");
        assert_eq!(custom.model_prefix, None);
        assert_eq!(custom.api_key_env, None);

        assert!(provider_profile("ollama").expect("ollama").api_key_env.is_none());
        assert!(provider_profile("not_a_provider").is_none());
    }

    #[test]
    fn inference_matches_well_known_substrings() {
        assert_eq!(infer_provider("gpt-4o"), Some("openai"));
        assert_eq!(infer_provider("GPT-4"), Some("openai"));
        assert_eq!(infer_provider("gemini-2.0-flash"), Some("google_ai_studio"));
        assert_eq!(infer_provider("claude-sonnet-4"), Some("anthropic"));
        assert_eq!(infer_provider("llama3-70b"), None);
    }
}
