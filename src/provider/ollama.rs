use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{decode_model_output, service_error, GenerationClient};
use crate::errors::GenerationError;
use crate::prompt;
use crate::wire::{AppResponse, GenerationRequest};

pub struct Ollama {
    model: String,
    url: String,
    client: Client,
}

impl Ollama {
    pub fn new(model: String, url: String, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            model,
            url,
            client: Client::builder().timeout(timeout).build()?,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg>,
    stream: bool,
    format: &'static str,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct Msg {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: String,
}

fn to_messages(req: &GenerationRequest) -> Vec<Msg> {
    vec![
        Msg {
            role: "system",
            content: prompt::system_instruction(req.platform, req.is_premium),
        },
        Msg { role: "user", content: req.instruction.clone() },
    ]
}

#[async_trait]
impl GenerationClient for Ollama {
    async fn generate(&self, req: &GenerationRequest) -> Result<AppResponse, GenerationError> {
        let url = format!("{}/api/chat", self.url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.model,
            messages: to_messages(req),
            stream: false,
            format: "json",
            options: OllamaOptions { temperature: 0.7 },
        };

        debug!(%url, model = %self.model, "ollama: POST /api/chat");

        let resp = self.client.post(&url).json(&body).send().await?;

        let status = resp.status();
        let text = resp.text().await?;
        debug!(%status, body = %text, "ollama: raw response");

        if !status.is_success() {
            return Err(service_error(status, text));
        }

        // Some builds return the model text directly instead of the chat envelope.
        let content = match serde_json::from_str::<ChatResponse>(&text) {
            Ok(c) => c.message.content,
            Err(_) => text,
        };

        decode_model_output(&content)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::PlatformType;

    #[test]
    fn test_messages_carry_system_and_instruction() {
        let req = GenerationRequest {
            instruction: "Write 3 facebook bios for \"bakery\".".into(),
            platform: PlatformType::Facebook,
            is_premium: true,
        };
        let msgs = to_messages(&req);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, "system");
        assert!(msgs[0].content.contains("Facebook"));
        assert_eq!(msgs[1].content, req.instruction);
    }
}
