use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::LlmError;

/// The content generation capability: a prompt in, generated text out.
///
/// Implemented by [`LlmClient`] in production and by stubs in tests.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

pub struct LlmClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

/// Completion payload of an Ollama-style generate endpoint.
#[derive(Debug, Deserialize)]
struct Completion {
    response: String,
}

impl LlmClient {
    pub fn new() -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY").unwrap_or_else(|_| "dummy_key".to_string()); // In production, make this required
        let api_url = std::env::var("LLM_API_URL")
            .unwrap_or_else(|_| "http://localhost:11434/api/generate".to_string()); // Using Ollama as default
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "llama2".to_string());

        Ok(LlmClient {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl ContentGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let mut request_builder = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "stream": false,
                "options": {
                    "temperature": 0.8
                }
            }));

        // Add authorization header if API key is provided and not dummy
        if self.api_key != "dummy_key" {
            request_builder =
                request_builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = request_builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: Completion = response.json().await?;
        let text = completion.response.trim().to_string();
        if text.is_empty() {
            return Err(LlmError::Empty);
        }

        Ok(text)
    }
}
