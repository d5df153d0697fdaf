pub mod gemini;
pub mod genai_client;
pub mod insight_service;

pub use gemini::GeminiClient;
pub use genai_client::{ContentPart, GenAiClient};
pub use insight_service::InsightService;
