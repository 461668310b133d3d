use std::sync::Arc;
use tracing::{debug, info};

use airskill_core::{AirskillError, Result};

use crate::provider::{LlmProvider, LlmRequest};

/// A provider bound to the model settings of one run.
///
/// This is what the build, ingest and discover stages hold: they only ever
/// need "prompt in, non-empty text out".
#[derive(Clone)]
pub struct Generator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl Generator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: 4096,
            temperature: 0.4,
        }
    }

    pub fn with_limits(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` and return the answer.
    ///
    /// An empty or whitespace-only answer is a [`AirskillError::Generation`].
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        self.request(None, prompt).await
    }

    /// Like [`Generator::generate`], with `system` sent as the provider's
    /// system instruction.
    pub async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.request(Some(system), prompt).await
    }

    async fn request(&self, system: Option<&str>, prompt: &str) -> Result<String> {
        let request = LlmRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            system: system.map(str::to_string),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!(
            provider = self.provider.name(),
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "requesting generation"
        );
        let response = self.provider.complete(&request).await?;

        if response.text.trim().is_empty() {
            return Err(AirskillError::Generation(format!(
                "{} returned an empty response",
                self.provider.name()
            )));
        }

        info!(
            provider = self.provider.name(),
            tokens = response.usage.total_tokens(),
            "generation complete"
        );
        Ok(response.text)
    }
}
