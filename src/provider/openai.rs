use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::{api_key, decode_model_output, service_error, GenerationClient};
use crate::errors::GenerationError;
use crate::prompt;
use crate::wire::{AppResponse, GenerationRequest};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Chat completions with JSON-object output forced on.
pub struct OpenAIProvider {
    model: String,
    api_base: String,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(model: String, timeout: Duration, api_base: Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            model,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            client: Client::builder().timeout(timeout).build()?,
        })
    }
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[async_trait]
impl GenerationClient for OpenAIProvider {
    async fn generate(&self, req: &GenerationRequest) -> Result<AppResponse, GenerationError> {
        let key = api_key("OPENAI_API_KEY")?;
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt::system_instruction(req.platform, req.is_premium) },
                { "role": "user", "content": req.instruction }
            ],
            "temperature": 0.8,
            "response_format": { "type": "json_object" }
        });

        debug!(%url, model = %self.model, "openai: POST chat/completions");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        debug!(%status, body = %text, "openai: raw response");

        if !status.is_success() {
            return Err(service_error(status, text));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::Malformed(format!("openai envelope: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(GenerationError::EmptyContent)?;

        decode_model_output(&content)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
