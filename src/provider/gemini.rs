use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{api_key, decode_model_output, service_error, GenerationClient};
use crate::errors::GenerationError;
use crate::prompt;
use crate::wire::{AppResponse, GenerationRequest};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct Gemini {
    model: String,
    api_base: String,
    client: Client,
}

impl Gemini {
    pub fn new(model: String, timeout: Duration, api_base: Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            model,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            client: Client::builder().timeout(timeout).build()?,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

fn first_text(resp: GenerateResponse) -> Option<String> {
    resp.candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .map(|p| p.text)
        .find(|t| !t.trim().is_empty())
}

#[async_trait]
impl GenerationClient for Gemini {
    async fn generate(&self, req: &GenerationRequest) -> Result<AppResponse, GenerationError> {
        let key = api_key("GEMINI_API_KEY")?;
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        );
        let system = prompt::system_instruction(req.platform, req.is_premium);
        let body = GenerateRequest {
            system_instruction: Content { role: None, parts: vec![Part { text: &system }] },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: &req.instruction }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: 0.8,
            },
        };

        debug!(%url, model = %self.model, "gemini: POST generateContent");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        debug!(%status, body = %text, "gemini: raw response");

        if !status.is_success() {
            return Err(service_error(status, text));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::Malformed(format!("gemini envelope: {e}")))?;
        let content = first_text(parsed).ok_or(GenerationError::EmptyContent)?;

        decode_model_output(&content)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
