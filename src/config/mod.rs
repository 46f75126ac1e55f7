use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::{Args, ProviderKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDefaults {
    pub name: String,
    pub email: String,
    pub country: String,
    pub gender: String,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            name: "Alex Creator".into(),
            email: "alex@instacoach.ai".into(),
            country: "India".into(),
            gender: "Male".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schema_version: String,
    pub provider: ProviderKind,
    /// Falls back to the provider's default model when unset.
    pub model: Option<String>,
    pub timeout_secs: u64,
    pub api_base: Option<String>,
    pub ollama_url: String,
    pub save_request: bool,
    pub save_response: bool,
    pub artifacts_dir: String,
    pub default_tone: String,
    pub default_language: String,
    pub profile: ProfileDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: "2025-10-01".into(),
            provider: ProviderKind::Gemini,
            model: None,
            timeout_secs: 120,
            api_base: None,
            ollama_url: "http://localhost:11434".into(),
            save_request: false,
            save_response: false,
            artifacts_dir: ".instacoach".into(),
            default_tone: "friendly".into(),
            default_language: "English".into(),
            profile: ProfileDefaults::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Defaults, then the optional file, then explicit CLI flags.
    pub fn load(args: &Args) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(p) => Self::from_file(Path::new(p))?,
            None => Self::default(),
        };
        cfg.apply_args(args);
        Ok(cfg)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(p) = args.provider {
            if p != self.provider {
                // a model name from the file belongs to the old provider
                self.model = None;
            }
            self.provider = p;
        }
        if let Some(m) = &args.model {
            self.model = Some(m.clone());
        }
        if let Some(t) = args.timeout_secs {
            self.timeout_secs = t;
        }
        if let Some(t) = &args.tone {
            self.default_tone = t.clone();
        }
        if let Some(l) = &args.language {
            self.default_language = l.clone();
        }
        self.save_request |= args.save_request;
        self.save_response |= args.save_response;
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let f = write_config(
            r#"
provider = "ollama"
timeout_secs = 30

[profile]
name = "Priya"
"#,
        );
        let cfg = Config::from_file(f.path()).unwrap();
        assert_eq!(cfg.provider, ProviderKind::Ollama);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.profile.name, "Priya");
        assert_eq!(cfg.profile.country, "India");
        assert_eq!(cfg.default_language, "English");
        assert_eq!(cfg.model(), "llama3.1");
    }

    #[test]
    fn test_cli_flags_override_file() {
        let f = write_config("provider = \"openai\"\nmodel = \"gpt-4o\"\ndefault_tone = \"luxury\"\n");
        let path = f.path().to_string_lossy().to_string();
        let args = Args::try_parse_from([
            "insta_coach",
            "--config", &path,
            "--timeout-secs", "5",
            "--tone", "urgent",
            "--save-response",
        ])
        .unwrap();
        let cfg = Config::load(&args).unwrap();
        assert_eq!(cfg.provider, ProviderKind::OpenAI);
        assert_eq!(cfg.model(), "gpt-4o");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.default_tone, "urgent");
        assert!(cfg.save_response);
        assert!(!cfg.save_request);
    }

    #[test]
    fn test_switching_provider_drops_file_model() {
        let f = write_config("provider = \"openai\"\nmodel = \"gpt-4o\"\n");
        let path = f.path().to_string_lossy().to_string();
        let args = Args::try_parse_from(["insta_coach", "--config", &path, "--provider", "gemini"]).unwrap();
        let cfg = Config::load(&args).unwrap();
        assert_eq!(cfg.model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let args = Args::try_parse_from(["insta_coach", "--config", "/nonexistent/coach.toml"]).unwrap();
        assert!(Config::load(&args).is_err());
    }
}
