use airskill_core::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single-prompt request to a generation provider.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Provider-specific model name, e.g. "gemini-2.0-flash".
    pub model: String,
    /// The whole prompt: context followed by task instructions.
    pub prompt: String,
    /// Optional system instruction for providers that take one separately.
    pub system: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A complete response from a provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub usage: Usage,
}

/// Token usage statistics, when the provider reports them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Trait implemented by each provider (Gemini, Anthropic, OpenAI, mock).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider id, e.g. "gemini".
    fn name(&self) -> &str;

    /// Send the request and wait for the full answer.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse>;
}
