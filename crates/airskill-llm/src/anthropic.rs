use airskill_core::{AirskillError, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::provider::*;

/// Anthropic Claude Messages API provider.
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.anthropic.com/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    pub(crate) fn build_request_body(request: &LlmRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": &request.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": [{
                "role": "user",
                "content": &request.prompt,
            }],
        });

        if let Some(ref system) = request.system {
            body["system"] = serde_json::json!(system);
        }

        body
    }

    pub(crate) fn parse_response(data: &serde_json::Value) -> LlmResponse {
        let text = data["content"]
            .as_array()
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(|b| {
                        if b["type"] == "text" {
                            b["text"].as_str().map(|s| s.to_string())
                        } else {
                            None
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let usage_data = &data["usage"];
        LlmResponse {
            text,
            usage: Usage {
                input_tokens: usage_data["input_tokens"].as_u64().unwrap_or(0) as u32,
                output_tokens: usage_data["output_tokens"].as_u64().unwrap_or(0) as u32,
            },
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let body = Self::build_request_body(request);
        debug!(model = %request.model, "sending Anthropic API request");

        let resp = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AirskillError::LlmProvider(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AirskillError::LlmProvider(format!("HTTP {status}: {text}")));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AirskillError::LlmProvider(e.to_string()))?;

        Ok(Self::parse_response(&data))
    }
}
