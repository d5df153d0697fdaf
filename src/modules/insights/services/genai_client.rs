use async_trait::async_trait;

use crate::core::Result;

/// One part of a prompt: either text or an inline binary attachment.
#[derive(Debug, Clone)]
pub enum ContentPart {
    Text(String),
    InlineData { mime_type: String, data: String },
}

/// Seam for the generative-AI provider.
///
/// `generate_json` constrains the model with a response schema and
/// returns the raw JSON text; callers deserialize into their own type.
#[async_trait]
pub trait GenAiClient: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String>;

    async fn generate_json(
        &self,
        parts: &[ContentPart],
        schema: serde_json::Value,
    ) -> Result<String>;

    fn name(&self) -> &str;
}
