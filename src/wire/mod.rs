use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::errors::GenerationError;

/// ========================================
/// Request/Response contract with the generation service
/// ========================================

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[value(skip)]
    #[serde(rename = "dashboard")]
    Dashboard,
    #[value(name = "caption", alias = "post")]
    #[serde(rename = "caption")]
    Caption,
    #[value(name = "bio")]
    #[serde(rename = "bio")]
    Bio,
    #[value(name = "hashtags", alias = "tags")]
    #[serde(rename = "hashtags")]
    Hashtags,
    #[value(name = "reel_script", alias = "script")]
    #[serde(rename = "reel_script")]
    ReelScript,
    #[value(name = "30_day_plan", alias = "plan")]
    #[serde(rename = "30_day_plan")]
    ContentPlan,
    #[value(skip)]
    #[serde(rename = "export")]
    Export,
}

impl ContentType {
    /// The tools that produce generation requests, in the order the studio lists them.
    pub const TOOLS: [ContentType; 5] = [
        ContentType::Caption,
        ContentType::Bio,
        ContentType::Hashtags,
        ContentType::ReelScript,
        ContentType::ContentPlan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Dashboard => "dashboard",
            ContentType::Caption => "caption",
            ContentType::Bio => "bio",
            ContentType::Hashtags => "hashtags",
            ContentType::ReelScript => "reel_script",
            ContentType::ContentPlan => "30_day_plan",
            ContentType::Export => "export",
        }
    }

    pub fn is_generative(&self) -> bool {
        !matches!(self, ContentType::Dashboard | ContentType::Export)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Dashboard => "Dashboard",
            ContentType::Caption => "Post Generator",
            ContentType::Bio => "Bio Creator",
            ContentType::Hashtags => "Hashtag Stack",
            ContentType::ReelScript => "Video Script",
            ContentType::ContentPlan => "Content Plan",
            ContentType::Export => "Export",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ContentType::Dashboard => "Plan & profile",
            ContentType::Caption => "Viral captions",
            ContentType::Bio => "Profile intros",
            ContentType::Hashtags => "Reach more people",
            ContentType::ReelScript => "Shorts & Reels",
            ContentType::ContentPlan => "Weekly strategy",
            ContentType::Export => "Download results",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformType {
    #[default]
    #[value(alias = "ig")]
    Instagram,
    #[value(alias = "yt")]
    Youtube,
    #[value(alias = "fb")]
    Facebook,
    #[value(alias = "x")]
    Twitter,
    #[value(alias = "wa")]
    Whatsapp,
}

impl PlatformType {
    pub const ALL: [PlatformType; 5] = [
        PlatformType::Instagram,
        PlatformType::Youtube,
        PlatformType::Facebook,
        PlatformType::Twitter,
        PlatformType::Whatsapp,
    ];

    /// Wire id, embedded verbatim into instructions.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformType::Instagram => "instagram",
            PlatformType::Youtube => "youtube",
            PlatformType::Facebook => "facebook",
            PlatformType::Twitter => "twitter",
            PlatformType::Whatsapp => "whatsapp",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlatformType::Instagram => "Instagram",
            PlatformType::Youtube => "YouTube",
            PlatformType::Facebook => "Facebook",
            PlatformType::Twitter => "X (Twitter)",
            PlatformType::Whatsapp => "WhatsApp",
        }
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What goes over the boundary for a single submit. Never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub instruction: String,
    pub platform: PlatformType,
    pub is_premium: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub language: String,
    pub timestamp: String,
}

/// Fields every response shape may carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseBase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_instructions: Option<String>,
}

impl ResponseBase {
    pub fn is_locked(&self) -> bool {
        self.locked.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextLength {
    Short,
    Medium,
    Long,
}

/// A caption or bio candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextVariant {
    pub id: u32,
    pub text: String,
    pub length: TextLength,
    pub tone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionResponse {
    #[serde(flatten)]
    pub base: ResponseBase,
    pub variants: Vec<TextVariant>,
    #[serde(default)]
    pub suggested_hashtags: Vec<String>,
    #[serde(default)]
    pub usage_hint: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BioCategory {
    Personal,
    Business,
    Creator,
    Brand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BioResponse {
    #[serde(flatten)]
    pub base: ResponseBase,
    pub category: BioCategory,
    pub variants: Vec<TextVariant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashtagIntent {
    Reach,
    Niche,
    Engagement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashtagResponse {
    #[serde(flatten)]
    pub base: ResponseBase,
    pub core_tags: Vec<String>,
    pub longtail_tags: Vec<String>,
    pub intent: HashtagIntent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelShot {
    /// Timestamp label such as "0-3s".
    pub t: String,
    pub action: String,
    pub caption_on_screen: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelScriptResponse {
    #[serde(flatten)]
    pub base: ResponseBase,
    pub duration_sec: u32,
    pub hook: String,
    pub shots: Vec<ReelShot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostFormat {
    Reel,
    Carousel,
    Post,
    Story,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDay {
    pub day: u32,
    pub idea: String,
    pub format: PostFormat,
    pub caption_hint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockableAsset {
    pub name: String,
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPlanResponse {
    #[serde(flatten)]
    pub base: ResponseBase,
    pub niche: String,
    pub days: Vec<PlanDay>,
    #[serde(default)]
    pub unlockable_assets: Vec<UnlockableAsset>,
}

/// Tagged by `type`; the tag decides which payload fields exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AppResponse {
    #[serde(rename = "caption")]
    Caption(CaptionResponse),
    #[serde(rename = "bio")]
    Bio(BioResponse),
    #[serde(rename = "hashtags")]
    Hashtags(HashtagResponse),
    #[serde(rename = "reel_script")]
    ReelScript(ReelScriptResponse),
    #[serde(rename = "30_day_plan")]
    ContentPlan(ContentPlanResponse),
}

const KNOWN_TAGS: [&str; 5] = ["caption", "bio", "hashtags", "reel_script", "30_day_plan"];

impl AppResponse {
    pub fn content_type(&self) -> ContentType {
        match self {
            AppResponse::Caption(_) => ContentType::Caption,
            AppResponse::Bio(_) => ContentType::Bio,
            AppResponse::Hashtags(_) => ContentType::Hashtags,
            AppResponse::ReelScript(_) => ContentType::ReelScript,
            AppResponse::ContentPlan(_) => ContentType::ContentPlan,
        }
    }

    pub fn base(&self) -> &ResponseBase {
        match self {
            AppResponse::Caption(r) => &r.base,
            AppResponse::Bio(r) => &r.base,
            AppResponse::Hashtags(r) => &r.base,
            AppResponse::ReelScript(r) => &r.base,
            AppResponse::ContentPlan(r) => &r.base,
        }
    }

    /// Decode a raw payload. The tag is checked before the shape so that an
    /// unrecognised `type` is reported as such instead of as a generic
    /// deserialization failure.
    pub fn from_value(value: Value) -> Result<Self, GenerationError> {
        let tag = match value.get("type") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(GenerationError::Malformed(format!(
                    "`type` must be a string, got {other}"
                )))
            }
            None => return Err(GenerationError::Malformed("missing `type` tag".into())),
        };
        if !KNOWN_TAGS.contains(&tag.as_str()) {
            return Err(GenerationError::UnknownResponseType(tag));
        }
        serde_json::from_value(value)
            .map_err(|e| GenerationError::Malformed(format!("{tag} payload: {e}")))
    }

    pub fn from_json_str(s: &str) -> Result<Self, GenerationError> {
        let value: Value = serde_json::from_str(s)
            .map_err(|e| GenerationError::Malformed(format!("invalid JSON: {e}")))?;
        Self::from_value(value)
    }
}
