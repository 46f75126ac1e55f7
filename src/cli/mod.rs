use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::profile::PlanType;
use crate::wire::{ContentType, PlatformType};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "google")]
    Gemini,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Ollama,
}

impl ProviderKind {
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.5-flash",
            ProviderKind::OpenAI => "gpt-4.1-mini",
            ProviderKind::Ollama => "llama3.1",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "insta_coach", version, about = "Social media content studio backed by a generative model")]
pub struct Args {
    /// TOML config file; CLI flags override its values
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, value_enum, default_value_t = PlatformType::Instagram)]
    pub platform: PlatformType,

    #[arg(long, value_enum, default_value_t = ContentType::Caption)]
    pub tool: ContentType,

    /// Generate once for this topic and exit instead of opening the studio
    #[arg(long)]
    pub topic: Option<String>,

    #[arg(long)]
    pub tone: Option<String>,

    #[arg(long)]
    pub language: Option<String>,

    #[arg(long)]
    pub context: Option<String>,

    #[arg(long, value_enum, default_value_t = PlanType::Free)]
    pub plan: PlanType,

    #[arg(long, default_value_t = false)]
    pub save_request: bool,

    #[arg(long, default_value_t = false)]
    pub save_response: bool,

    /// Show a spinner while waiting (`--progress false` to hide it)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub progress: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_flags_parse() {
        let args = Args::try_parse_from([
            "insta_coach",
            "--provider", "openai",
            "--platform", "twitter",
            "--tool", "30_day_plan",
            "--topic", "sustainable living",
            "--plan", "yearly",
        ])
        .unwrap();
        assert_eq!(args.provider, Some(ProviderKind::OpenAI));
        assert_eq!(args.platform, PlatformType::Twitter);
        assert_eq!(args.tool, ContentType::ContentPlan);
        assert_eq!(args.topic.as_deref(), Some("sustainable living"));
        assert!(args.plan.is_premium());
    }

    #[test]
    fn test_defaults_open_the_studio() {
        let args = Args::try_parse_from(["insta_coach"]).unwrap();
        assert!(args.topic.is_none());
        assert_eq!(args.platform, PlatformType::Instagram);
        assert_eq!(args.tool, ContentType::Caption);
        assert_eq!(args.plan, PlanType::Free);
    }

    #[test]
    fn test_ui_only_tools_are_not_flags() {
        assert!(Args::try_parse_from(["insta_coach", "--tool", "dashboard"]).is_err());
    }
}
