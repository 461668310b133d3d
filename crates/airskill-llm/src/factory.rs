use std::sync::Arc;

use airskill_config::LlmConfig;
use airskill_core::{AirskillError, Result};

use crate::generator::Generator;
use crate::provider::LlmProvider;

/// Build the configured provider.
///
/// * unknown provider, or a provider whose feature is off → `Dependency`
/// * no API key for an HTTP provider → `Config`
///
/// [`crate::MockProvider`] is never built from config; tests hand one to a
/// [`Generator`] directly.
pub fn provider_from_config(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    let provider = config.provider.as_str();

    let Some(key_var) = config.api_key_env() else {
        return Err(AirskillError::Dependency(format!(
            "no client for provider '{provider}' (supported: gemini, anthropic, openai)"
        )));
    };
    let Some(api_key) = config.credential() else {
        return Err(AirskillError::Config(format!(
            "no API key for provider '{provider}': set {key_var} (or llm.api_key in airskill.toml, or the project .env)"
        )));
    };

    build_http_provider(provider, api_key.to_string(), config.base_url.clone())
}

/// Build a [`Generator`] carrying the configured model and limits.
pub fn from_config(config: &LlmConfig) -> Result<Generator> {
    let provider = provider_from_config(config)?;
    Ok(Generator::new(provider, config.model.clone())
        .with_limits(config.max_tokens, config.temperature))
}

#[allow(unused_variables)]
fn build_http_provider(
    provider: &str,
    api_key: String,
    base_url: Option<String>,
) -> Result<Arc<dyn LlmProvider>> {
    match provider {
        #[cfg(feature = "gemini")]
        "gemini" => {
            let mut p = crate::gemini::GeminiProvider::new(api_key);
            if let Some(url) = base_url {
                p = p.with_base_url(url);
            }
            Ok(Arc::new(p))
        }
        #[cfg(feature = "anthropic")]
        "anthropic" => {
            let mut p = crate::anthropic::AnthropicProvider::new(api_key);
            if let Some(url) = base_url {
                p = p.with_base_url(url);
            }
            Ok(Arc::new(p))
        }
        #[cfg(feature = "openai")]
        "openai" => {
            let mut p = crate::openai::OpenAiProvider::new(api_key);
            if let Some(url) = base_url {
                p = p.with_base_url(url, "openai".into());
            }
            Ok(Arc::new(p))
        }
        other => Err(AirskillError::Dependency(format!(
            "provider '{other}' is not compiled into this build (enable the `{other}` feature of airskill-llm)"
        ))),
    }
}
