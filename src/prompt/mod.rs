use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::wire::{ContentType, PlatformType};

pub const TONES: [&str; 5] = ["friendly", "professional", "witty", "luxury", "urgent"];
pub const LANGUAGES: [&str; 5] = ["English", "Spanish", "French", "Hindi", "German"];

/// Free-form fields the user fills in before generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentForm {
    pub topic: String,
    pub tone: String,
    pub language: String,
    pub extra_context: String,
}

impl Default for ContentForm {
    fn default() -> Self {
        Self {
            topic: String::new(),
            tone: "friendly".into(),
            language: "English".into(),
            extra_context: String::new(),
        }
    }
}

impl ContentForm {
    pub fn has_topic(&self) -> bool {
        !self.topic.trim().is_empty()
    }
}

/// Map a tool, platform and form onto the single instruction sent to the
/// service. Fields are embedded verbatim.
pub fn build_instruction(
    tool: ContentType,
    platform: PlatformType,
    form: &ContentForm,
) -> Result<String, ValidationError> {
    if !form.has_topic() {
        return Err(ValidationError::EmptyTopic);
    }
    let ContentForm { topic, tone, language, extra_context: ctx } = form;

    let text = match tool {
        ContentType::Caption => format!(
            "Generate 3 {platform} captions/posts for \"{topic}\". Tone: {tone}. Language: {language}. Context: {ctx}."
        ),
        ContentType::Bio => format!(
            "Write 3 {platform} bios for \"{topic}\". Tone: {tone}. Language: {language}. Context: {ctx}."
        ),
        ContentType::Hashtags => format!(
            "Give me a hashtag strategy for \"{topic}\" on {platform} (Intent: Reach & Engagement). Tone: {tone}. Language: {language}. Context: {ctx}."
        ),
        ContentType::ReelScript => format!(
            "Create a 30-second short video script for \"{topic}\" on {platform}. Tone: {tone}. Language: {language}. Hook-first approach. Context: {ctx}."
        ),
        ContentType::ContentPlan => format!(
            "Create a 7-day mini content plan for the niche \"{topic}\" optimized for {platform}. Tone: {tone}. Language: {language}. Context: {ctx}."
        ),
        ContentType::Dashboard | ContentType::Export => {
            return Err(ValidationError::NotGenerative(tool))
        }
    };
    Ok(text)
}

/// Placeholder shown next to the topic field.
pub fn topic_hint(tool: ContentType, platform: PlatformType) -> String {
    if tool == ContentType::Bio {
        return "e.g., Fitness Coach for Moms...".to_string();
    }
    let shape = if platform == PlatformType::Twitter {
        "a thread about"
    } else {
        "a post about"
    };
    format!("e.g., Tips for {shape} sustainable living...")
}

fn response_schema() -> &'static str {
r#"Every response object MAY also carry:
  "meta": { "language": string, "timestamp": string },
  "platform": "instagram"|"youtube"|"facebook"|"twitter"|"whatsapp",
  "locked": boolean,
  "unlock_instructions": string

Shapes, selected by "type":
{ "type": "caption", "variants": [ { "id": number, "text": string, "length": "short"|"medium"|"long", "tone": string } ], "suggested_hashtags": [string], "usage_hint": string }
{ "type": "bio", "category": "personal"|"business"|"creator"|"brand", "variants": [ { "id": number, "text": string, "length": "short"|"medium"|"long", "tone": string } ] }
{ "type": "hashtags", "core_tags": [string], "longtail_tags": [string], "intent": "reach"|"niche"|"engagement" }
{ "type": "reel_script", "duration_sec": number, "hook": string, "shots": [ { "t": string, "action": string, "caption_on_screen": string } ] }
{ "type": "30_day_plan", "niche": string, "days": [ { "day": number, "idea": string, "format": "reel"|"carousel"|"post"|"story", "caption_hint": string } ], "unlockable_assets": [ { "name": string, "locked": boolean } ] }"#
}

fn gating_rules(is_premium: bool) -> &'static str {
    if is_premium {
        "The user is on a paid plan. Set every \"locked\" flag to false and omit \"unlock_instructions\"."
    } else {
        "The user is on the free plan. Mark premium-only extras (for example unlockable_assets beyond the first week) with \"locked\": true, and set \"unlock_instructions\" to one short sentence telling the user how to upgrade. Never put the withheld content itself into a locked element."
    }
}

/// System instruction sent alongside every request.
pub fn system_instruction(platform: PlatformType, is_premium: bool) -> String {
    format!(
r#"You are InstaCoach, a social media content strategist for {name}.

Return EXACTLY ONE JSON object (no markdown, no prose, no code fences). Pick the "type" that matches the request:
- captions/posts -> "caption"
- bios -> "bio"
- hashtag strategy -> "hashtags"
- short video script -> "reel_script"
- content plan -> "30_day_plan"

{schema}

Rules:
- Write in the requested language and tone; respect {name} conventions (length limits, hashtag habits).
- Set "platform" to "{id}".
- {gating}"#,
        name = platform.display_name(),
        id = platform.as_str(),
        schema = response_schema(),
        gating = gating_rules(is_premium),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(topic: &str) -> ContentForm {
        ContentForm {
            topic: topic.into(),
            tone: "witty".into(),
            language: "Spanish".into(),
            extra_context: "launch week".into(),
        }
    }

    #[test]
    fn test_every_tool_embeds_all_fields() {
        for tool in ContentType::TOOLS {
            let text = build_instruction(tool, PlatformType::Youtube, &form("home baking")).unwrap();
            assert!(text.contains("\"home baking\""), "{tool}: {text}");
            assert!(text.contains("youtube"), "{tool}: {text}");
            assert!(text.contains("Tone: witty"), "{tool}: {text}");
            assert!(text.contains("Language: Spanish"), "{tool}: {text}");
            assert!(text.contains("Context: launch week"), "{tool}: {text}");
        }
    }

    #[test]
    fn test_hashtag_instruction_uses_reach_framing() {
        let f = ContentForm {
            topic: "sustainable living".into(),
            ..ContentForm::default()
        };
        let text = build_instruction(ContentType::Hashtags, PlatformType::Twitter, &f).unwrap();
        assert!(text.contains("sustainable living"));
        assert!(text.contains("twitter"));
        assert!(text.to_lowercase().contains("reach"));
        assert!(text.contains("Language: English"));
    }

    #[test]
    fn test_empty_topic_is_rejected() {
        for topic in ["", "   "] {
            assert_eq!(
                build_instruction(ContentType::Caption, PlatformType::Instagram, &form(topic)),
                Err(ValidationError::EmptyTopic)
            );
        }
    }

    #[test]
    fn test_ui_only_types_build_nothing() {
        for tool in [ContentType::Dashboard, ContentType::Export] {
            assert_eq!(
                build_instruction(tool, PlatformType::Instagram, &form("anything")),
                Err(ValidationError::NotGenerative(tool))
            );
        }
    }

    #[test]
    fn test_builder_is_deterministic() {
        let a = build_instruction(ContentType::ReelScript, PlatformType::Facebook, &form("yoga"));
        let b = build_instruction(ContentType::ReelScript, PlatformType::Facebook, &form("yoga"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_system_instruction_follows_entitlement() {
        let free = system_instruction(PlatformType::Instagram, false);
        let pro = system_instruction(PlatformType::Instagram, true);
        assert!(free.contains("free plan"));
        assert!(pro.contains("paid plan"));
        assert!(free.contains("\"30_day_plan\""));
    }

    #[test]
    fn test_topic_hint_depends_on_tool_and_platform() {
        assert!(topic_hint(ContentType::Bio, PlatformType::Twitter).contains("Fitness Coach"));
        assert!(topic_hint(ContentType::Caption, PlatformType::Twitter).contains("a thread about"));
        assert!(topic_hint(ContentType::Caption, PlatformType::Instagram).contains("a post about"));
    }
}
