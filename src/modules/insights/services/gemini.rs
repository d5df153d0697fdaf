use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use serde_json::{json, Value};

use super::genai_client::{ContentPart, GenAiClient};
use crate::config::GenAiConfig;
use crate::core::{AppError, Result};

/// Gemini client over the `generateContent` REST endpoint.
///
/// API Documentation: https://ai.google.dev/api/generate-content
pub struct GeminiClient {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &GenAiConfig) -> Self {
        // Transient 5xx/connect failures are retried with backoff.
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(2);
        let client = ClientBuilder::new(reqwest::Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        }
    }

    async fn generate(&self, body: Value) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::gateway(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| AppError::gateway(format!("Failed to read Gemini response: {}", e)))?;

        if !status.is_success() {
            return Err(AppError::gateway(format!(
                "Gemini API error - HTTP {} ({})",
                status.as_u16(),
                response_body
            )));
        }

        let parsed: Value = serde_json::from_str(&response_body)
            .map_err(|e| AppError::gateway(format!("Failed to parse Gemini response: {}", e)))?;

        let text = parsed["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| AppError::gateway("Gemini response contained no candidate text"))?;

        Ok(text.trim().to_string())
    }

    fn render_parts(parts: &[ContentPart]) -> Vec<Value> {
        parts
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => json!({ "text": text }),
                ContentPart::InlineData { mime_type, data } => json!({
                    "inline_data": { "mime_type": mime_type, "data": data }
                }),
            })
            .collect()
    }
}

#[async_trait]
impl GenAiClient for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        self.generate(body).await
    }

    async fn generate_json(
        &self,
        parts: &[ContentPart],
        schema: Value,
    ) -> Result<String> {
        let body = json!({
            "contents": [{ "parts": Self::render_parts(parts) }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        });
        self.generate(body).await
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GeminiClient::new(&GenAiConfig {
            api_key: "test_key".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
        });

        assert_eq!(client.name(), "gemini");
        assert_eq!(client.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_inline_data_part_rendering() {
        let parts = vec![
            ContentPart::InlineData {
                mime_type: "image/png".to_string(),
                data: "aGVsbG8=".to_string(),
            },
            ContentPart::Text("Describe this".to_string()),
        ];

        let rendered = GeminiClient::render_parts(&parts);
        assert_eq!(rendered[0]["inline_data"]["mime_type"], "image/png");
        assert_eq!(rendered[1]["text"], "Describe this");
    }
}
