//! Projects a decoded response into a presentation-neutral view.
//!
//! Each branch reads only the fields of its own shape. Locked elements are
//! replaced by a placeholder carrying the unlock instructions; the
//! underlying content is never surfaced for them.

use serde_json::Value;

use crate::errors::GenerationError;
use crate::wire::{
    AppResponse, BioCategory, BioResponse, CaptionResponse, ContentPlanResponse, ContentType,
    HashtagIntent, HashtagResponse, PlatformType, PostFormat, ReelScriptResponse, ResponseBase,
    TextLength, TextVariant,
};

pub const DEFAULT_UNLOCK_INSTRUCTIONS: &str = "Upgrade to Pro to unlock.";

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Text { label: Option<String>, body: String },
    Tags(Vec<String>),
    Locked { label: String, unlock_instructions: String },
}

impl Item {
    fn text(body: impl Into<String>) -> Self {
        Item::Text { label: None, body: body.into() }
    }

    fn labelled(label: impl Into<String>, body: impl Into<String>) -> Self {
        Item::Text { label: Some(label.into()), body: body.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: String,
    pub items: Vec<Item>,
}

impl Section {
    fn new(heading: impl Into<String>, items: Vec<Item>) -> Self {
        Self { heading: heading.into(), items }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView {
    pub kind: ContentType,
    pub title: String,
    pub subtitle: Option<String>,
    pub platform: Option<PlatformType>,
    pub language: Option<String>,
    /// Set when the service gated the response as a whole. This only marks
    /// partial gating: the service already left premium content out, so
    /// the sections are still rendered.
    pub gate: Option<String>,
    pub sections: Vec<Section>,
}

impl RenderedView {
    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    pub fn locked_items(&self) -> impl Iterator<Item = &Item> {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter())
            .filter(|i| matches!(i, Item::Locked { .. }))
    }
}

pub fn render(resp: &AppResponse) -> RenderedView {
    let (title, subtitle, sections) = match resp {
        AppResponse::Caption(r) => render_caption(r),
        AppResponse::Bio(r) => render_bio(r),
        AppResponse::Hashtags(r) => render_hashtags(r),
        AppResponse::ReelScript(r) => render_reel_script(r),
        AppResponse::ContentPlan(r) => render_content_plan(r),
    };
    let base = resp.base();
    RenderedView {
        kind: resp.content_type(),
        title,
        subtitle,
        platform: base.platform,
        language: base.meta.as_ref().map(|m| m.language.clone()),
        gate: base.is_locked().then(|| unlock_instructions(base)),
        sections,
    }
}

/// Render a payload that has not been decoded yet. An unknown `type` is an
/// error, never an empty view.
pub fn render_value(value: &Value) -> Result<RenderedView, GenerationError> {
    AppResponse::from_value(value.clone()).map(|r| render(&r))
}

fn unlock_instructions(base: &ResponseBase) -> String {
    base.unlock_instructions
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_UNLOCK_INSTRUCTIONS.to_string())
}

fn length_label(l: TextLength) -> &'static str {
    match l {
        TextLength::Short => "short",
        TextLength::Medium => "medium",
        TextLength::Long => "long",
    }
}

fn variant_items(variants: &[TextVariant]) -> Vec<Item> {
    variants
        .iter()
        .map(|v| {
            Item::labelled(
                format!("#{} · {} · {}", v.id, length_label(v.length), v.tone),
                v.text.clone(),
            )
        })
        .collect()
}

type Parts = (String, Option<String>, Vec<Section>);

fn render_caption(r: &CaptionResponse) -> Parts {
    let mut sections = vec![Section::new("Captions", variant_items(&r.variants))];
    if !r.suggested_hashtags.is_empty() {
        sections.push(Section::new(
            "Suggested hashtags",
            vec![Item::Tags(r.suggested_hashtags.clone())],
        ));
    }
    if !r.usage_hint.trim().is_empty() {
        sections.push(Section::new("Usage hint", vec![Item::text(r.usage_hint.clone())]));
    }
    ("Post Generator".into(), None, sections)
}

fn render_bio(r: &BioResponse) -> Parts {
    let category = match r.category {
        BioCategory::Personal => "personal",
        BioCategory::Business => "business",
        BioCategory::Creator => "creator",
        BioCategory::Brand => "brand",
    };
    (
        "Bio Creator".into(),
        Some(format!("category: {category}")),
        vec![Section::new("Bios", variant_items(&r.variants))],
    )
}

fn render_hashtags(r: &HashtagResponse) -> Parts {
    let intent = match r.intent {
        HashtagIntent::Reach => "reach",
        HashtagIntent::Niche => "niche",
        HashtagIntent::Engagement => "engagement",
    };
    (
        "Hashtag Stack".into(),
        Some(format!("intent: {intent}")),
        vec![
            Section::new("Core tags", vec![Item::Tags(r.core_tags.clone())]),
            Section::new("Long-tail tags", vec![Item::Tags(r.longtail_tags.clone())]),
        ],
    )
}

fn render_reel_script(r: &ReelScriptResponse) -> Parts {
    let shots = r
        .shots
        .iter()
        .map(|s| {
            let body = if s.caption_on_screen.trim().is_empty() {
                s.action.clone()
            } else {
                format!("{}\n[on screen] {}", s.action, s.caption_on_screen)
            };
            Item::labelled(s.t.clone(), body)
        })
        .collect();
    (
        "Video Script".into(),
        Some(format!("{}s", r.duration_sec)),
        vec![
            Section::new("Hook", vec![Item::text(r.hook.clone())]),
            Section::new("Shots", shots),
        ],
    )
}

fn format_label(f: PostFormat) -> &'static str {
    match f {
        PostFormat::Reel => "reel",
        PostFormat::Carousel => "carousel",
        PostFormat::Post => "post",
        PostFormat::Story => "story",
    }
}

fn render_content_plan(r: &ContentPlanResponse) -> Parts {
    let days = r
        .days
        .iter()
        .map(|d| {
            Item::labelled(
                format!("Day {} · {}", d.day, format_label(d.format)),
                format!("{}\n{}", d.idea, d.caption_hint),
            )
        })
        .collect();

    let mut sections = vec![Section::new("Days", days)];
    if !r.unlockable_assets.is_empty() {
        let instructions = unlock_instructions(&r.base);
        let assets = r
            .unlockable_assets
            .iter()
            .map(|a| {
                if a.locked {
                    Item::Locked {
                        label: a.name.clone(),
                        unlock_instructions: instructions.clone(),
                    }
                } else {
                    Item::text(a.name.clone())
                }
            })
            .collect();
        sections.push(Section::new("Assets", assets));
    }
    (
        "Content Plan".into(),
        Some(format!("niche: {}", r.niche)),
        sections,
    )
}
