use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

use crate::cli::ProviderKind;
use crate::config::Config;
use crate::errors::GenerationError;
use crate::wire::{AppResponse, GenerationRequest};

pub mod gemini;
pub mod ollama;
pub mod openai;

/// Boundary to the external generation service. One call per invocation,
/// no retry; entitlement is forwarded, never enforced here.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, req: &GenerationRequest) -> Result<AppResponse, GenerationError>;

    fn name(&self) -> &'static str;
}

pub type DynClient = Box<dyn GenerationClient + Send + Sync>;

pub fn make_client(cfg: &Config) -> anyhow::Result<DynClient> {
    let timeout = Duration::from_secs(cfg.timeout_secs);
    let model = cfg.model().to_string();
    match cfg.provider {
        ProviderKind::Gemini => Ok(Box::new(gemini::Gemini::new(
            model,
            timeout,
            cfg.api_base.clone(),
        )?)),
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIProvider::new(
            model,
            timeout,
            cfg.api_base.clone(),
        )?)),
        ProviderKind::Ollama => Ok(Box::new(ollama::Ollama::new(
            model,
            cfg.ollama_url.clone(),
            timeout,
        )?)),
    }
}

/// Turn the model's text output into a response. Tries a strict parse
/// first, then the first balanced `{...}` object in the text.
pub fn decode_model_output(content: &str) -> Result<AppResponse, GenerationError> {
    let text = strip_json_fences(content);
    if text.is_empty() {
        return Err(GenerationError::EmptyContent);
    }
    match AppResponse::from_json_str(text) {
        Ok(resp) => Ok(resp),
        Err(GenerationError::Malformed(strict_err)) => match extract_first_json_object(text) {
            Some(obj) if obj.len() < text.len() => AppResponse::from_json_str(obj),
            _ => Err(GenerationError::Malformed(strict_err)),
        },
        Err(e) => Err(e),
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(|s| s.trim())
                .unwrap_or(stripped)
        }
        None => text,
    }
}

/// Extracts the first substring that parses as a JSON object. Every `{`
/// is a candidate start; braces inside string literals are skipped.
fn extract_first_json_object(s: &str) -> Option<&str> {
    s.match_indices('{')
        .filter_map(|(start, _)| balanced_object_at(s, start))
        .find(|obj| serde_json::from_str::<Value>(obj).is_ok())
}

/// The balanced `{...}` span opening at `start`, if it closes.
fn balanced_object_at(s: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in s.bytes().enumerate().skip(start) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Map a non-2xx reply onto `Service`. Gemini and OpenAI wrap the reason in
/// `{"error": {"message": ...}}`, Ollama in `{"error": "..."}`; anything
/// else is passed through as the raw body.
fn service_error(status: StatusCode, body: String) -> GenerationError {
    let reason = serde_json::from_str::<Value>(&body).ok().and_then(|v| {
        match v.get("error")? {
            Value::String(msg) => Some(msg.clone()),
            err => err.get("message")?.as_str().map(str::to_string),
        }
    });
    GenerationError::Service {
        status: status.as_u16(),
        message: reason.unwrap_or(body),
    }
}

/// Read a credential from the environment.
fn api_key(var: &'static str) -> Result<String, GenerationError> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(GenerationError::MissingCredentials(var))
}
