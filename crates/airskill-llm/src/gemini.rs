use airskill_core::{AirskillError, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::provider::*;

/// Google Gemini `generateContent` provider.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
        }
    }

    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    pub(crate) fn build_request_body(request: &LlmRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": &request.prompt }],
            }],
            "generationConfig": {
                "maxOutputTokens": request.max_tokens,
                "temperature": request.temperature,
            },
        });

        if let Some(ref system) = request.system {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system }],
            });
        }

        body
    }

    pub(crate) fn parse_response(data: &serde_json::Value) -> LlmResponse {
        // Text of the first candidate; all text parts are joined.
        let text = data["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let usage_data = &data["usageMetadata"];
        LlmResponse {
            text,
            usage: Usage {
                input_tokens: usage_data["promptTokenCount"].as_u64().unwrap_or(0) as u32,
                output_tokens: usage_data["candidatesTokenCount"].as_u64().unwrap_or(0) as u32,
            },
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let body = Self::build_request_body(request);
        debug!(model = %request.model, "sending Gemini API request");

        let resp = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, request.model
            ))
            .header("x-goog-api-key", &self.api_key)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LlmRequest {
        LlmRequest {
            model: "gemini-2.0-flash".into(),
            prompt: "Summarize".into(),
            system: None,
            max_tokens: 256,
            temperature: 0.2,
        }
    }

    #[test]
    fn body_carries_prompt_and_limits() {
        let body = GeminiProvider::build_request_body(&request());
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Summarize");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn body_includes_system_instruction() {
        let mut req = request();
        req.system = Some("Be terse.".into());
        let body = GeminiProvider::build_request_body(&req);
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be terse.");
    }

    #[test]
    fn parse_joins_text_parts() {
        let data = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello " }, { "text": "world" }] }
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 3 }
        });
        let resp = GeminiProvider::parse_response(&data);
        assert_eq!(resp.text, "Hello world");
        assert_eq!(resp.usage.total_tokens(), 15);
    }

    #[test]
    fn parse_without_candidates_is_empty() {
        let resp = GeminiProvider::parse_response(&serde_json::json!({ "candidates": [] }));
        assert!(resp.text.is_empty());
    }
}
