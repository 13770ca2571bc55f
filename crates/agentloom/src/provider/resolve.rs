//! Map a record's provider/model selection onto the invocation layer.
//!
//! Only an unknown provider id is fatal here. Missing secrets, missing
//! provider extras, and invalid sampling values are warned and left unset so
//! that callers relying on implicit provider defaults still get a spec.

use std::collections::BTreeMap;

use env_flags::env_flags;
use serde_json::Value;

use super::table::{CUSTOM_PROVIDER, infer_provider, provider_profile};
use crate::config::{AgentConfig, ModelSettings};
use crate::error::BuildError;

/// Everything the model-invocation client needs for one agent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelInvocationSpec {
    /// Fully qualified model string, provider prefix included.
    pub model: String,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub generation: GenerationParams,
    /// Provider-specific extras forwarded verbatim (API version, project
    /// id, deployment space id).
    pub extra: BTreeMap<&'static str, String>,
}

/// Normalized sampling parameters from a record's `modelSettings`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationParams {
    pub temperature: Option<f64>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f64>,
    pub top_k: Option<u32>,
    pub stop_sequences: Option<Vec<String>>,
}

fn default_model_selection() -> (String, String) {
    env_flags! {
        /// Provider assumed when a record names neither provider nor model.
        AGENTLOOM_DEFAULT_PROVIDER: &str = "google_ai_studio";
        /// Model string paired with the default provider.
        AGENTLOOM_DEFAULT_MODEL: &str = "gemini/gemini-2.0-flash";
    }
    (
        (*AGENTLOOM_DEFAULT_PROVIDER).to_string(),
        (*AGENTLOOM_DEFAULT_MODEL).to_string(),
    )
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Resolve the provider selection and raw model string of `config` into a
/// fully qualified invocation spec.
pub fn resolve(config: &AgentConfig, log_ctx: &str) -> Result<ModelInvocationSpec, BuildError> {
    let agent = config.display_name(0);

    let (provider, raw_model) = match (
        config.selected_provider_id.clone(),
        config.model_string.clone(),
    ) {
        (Some(p), m) => (p, m),
        (None, Some(m)) => {
            let p = match infer_provider(&m) {
                Some(p) => p,
                None => {
                    tracing::warn!(
                        "could not infer provider for model '{}' {}; defaulting to '{}'",
                        m,
                        log_ctx,
                        CUSTOM_PROVIDER
                    );
                    CUSTOM_PROVIDER
                }
            };
            (p.to_string(), Some(m))
        }
        (None, None) => {
            let (dp, dm) = default_model_selection();
            tracing::warn!(
                "agent '{}' {} names neither provider nor model; defaulting to '{}' / '{}'",
                agent,
                log_ctx,
                dp,
                dm
            );
            (dp, Some(dm))
        }
    };

    let mut model = match raw_model {
        Some(m) => m,
        None => {
            let (_, dm) = default_model_selection();
            tracing::warn!(
                "agent '{}' {} names provider '{}' without a model string; defaulting to '{}'",
                agent,
                log_ctx,
                provider,
                dm
            );
            dm
        }
    };

    let profile = provider_profile(&provider).ok_or_else(|| BuildError::InvalidProvider {
        provider: provider.clone(),
        agent: agent.clone(),
    })?;

    // Deployment-style watsonx models need a space id on top of the project
    // id; detect before prefixing mutates the string.
    let is_deployment = model.starts_with("deployment/");

    if let Some(prefix) = profile.model_prefix {
        let tagged = format!("{prefix}/");
        if !model.starts_with(&tagged) {
            model = format!("{prefix}/{model}");
        }
    }

    let mut api_base = config.api_base.clone();
    let mut extra: BTreeMap<&'static str, String> = BTreeMap::new();
    match provider.as_str() {
        "azure" => {
            if api_base.is_none() {
                match env_nonempty("AZURE_API_BASE") {
                    Some(v) => api_base = Some(v),
                    None => tracing::warn!(
                        "azure provider selected for '{}' but no api base override and AZURE_API_BASE is unset",
                        agent
                    ),
                }
            }
            match env_nonempty("AZURE_API_VERSION") {
                Some(v) => {
                    extra.insert("api_version", v);
                }
                None => tracing::warn!(
                    "azure provider selected for '{}' but AZURE_API_VERSION is unset",
                    agent
                ),
            }
        }
        "watsonx" => {
            if api_base.is_none() {
                match env_nonempty("WATSONX_URL") {
                    Some(v) => api_base = Some(v),
                    None => tracing::warn!(
                        "watsonx provider selected for '{}' but no api base override and WATSONX_URL is unset",
                        agent
                    ),
                }
            }
            match env_nonempty("WATSONX_PROJECT_ID") {
                Some(v) => {
                    extra.insert("project_id", v);
                }
                None => tracing::warn!(
                    "watsonx provider selected for '{}' but WATSONX_PROJECT_ID is unset",
                    agent
                ),
            }
            if is_deployment {
                match env_nonempty("WATSONX_DEPLOYMENT_SPACE_ID") {
                    Some(v) => {
                        extra.insert("space_id", v);
                    }
                    None => tracing::warn!(
                        "deployment model '{}' for '{}' but WATSONX_DEPLOYMENT_SPACE_ID is unset",
                        model,
                        agent
                    ),
                }
            }
        }
        _ => {}
    }

    let api_key = if let Some(key) = config.api_key.clone() {
        tracing::info!(
            "using api key override from config for provider '{}' {}",
            provider,
            log_ctx
        );
        Some(key)
    } else if let Some(env_name) = profile.api_key_env {
        let key = env_nonempty(env_name);
        if key.is_none() {
            tracing::warn!(
                "api key env var '{}' for provider '{}' is unset; invocation may fail if a key is required",
                env_name,
                provider
            );
        }
        key
    } else {
        None
    };

    let generation = config
        .model_settings
        .as_ref()
        .map(|s| generation_params(s, &agent))
        .unwrap_or_default();

    tracing::info!(
        "resolved model '{}' for agent '{}' {} (provider '{}', api_base {})",
        model,
        agent,
        log_ctx,
        provider,
        api_base.as_deref().unwrap_or("<default>")
    );

    Ok(ModelInvocationSpec {
        model,
        api_base,
        api_key,
        generation,
        extra,
    })
}

fn to_f64(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

fn to_u32(v: &Value) -> Option<u32> {
    v.as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

fn to_string_list(v: &Value) -> Option<Vec<String>> {
    let arr = v.as_array()?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(item.as_str()?.to_string());
    }
    Some(out)
}

fn generation_params(settings: &ModelSettings, agent: &str) -> GenerationParams {
    let mut g = GenerationParams::default();
    let warn_drop = |field: &str, value: &Value| {
        tracing::warn!(
            "invalid {} value {} in modelSettings for '{}'; dropping",
            field,
            value,
            agent
        );
    };
    if let Some(v) = &settings.temperature {
        match to_f64(v) {
            Some(t) => g.temperature = Some(t),
            None => warn_drop("temperature", v),
        }
    }
    if let Some(v) = &settings.max_output_tokens {
        match to_u32(v) {
            Some(n) => g.max_output_tokens = Some(n),
            None => warn_drop("maxOutputTokens", v),
        }
    }
    if let Some(v) = &settings.top_p {
        match to_f64(v) {
            Some(p) => g.top_p = Some(p),
            None => warn_drop("topP", v),
        }
    }
    if let Some(v) = &settings.top_k {
        match to_u32(v) {
            Some(k) => g.top_k = Some(k),
            None => warn_drop("topK", v),
        }
    }
    if let Some(v) = &settings.stop_sequences {
        match to_string_list(v) {
            Some(stops) => g.stop_sequences = Some(stops),
            None => warn_drop("stopSequences", v),
        }
    }
    g
}
