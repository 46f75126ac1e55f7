use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub country: String,
    pub gender: String,
    #[serde(rename = "avatarUrl")]
    pub avatar_url: String,
}

impl UserProfile {
    /// Replace one field by name. Returns false for an unknown field.
    pub fn set_field(&mut self, field: &str, value: &str) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "country" => &mut self.country,
            "gender" => &mut self.gender,
            "avatar" | "avatar_url" | "avatarUrl" => &mut self.avatar_url,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }
}

pub fn avatar_url_for(seed: &str) -> String {
    let seed: String = seed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    format!("https://api.dicebear.com/9.x/avataaars/svg?seed={seed}&backgroundColor=c0aede")
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    #[default]
    Free,
    Monthly,
    Quarterly,
    Yearly,
}

impl PlanType {
    pub const ALL: [PlanType; 4] = [
        PlanType::Free,
        PlanType::Monthly,
        PlanType::Quarterly,
        PlanType::Yearly,
    ];

    /// The entitlement flag forwarded to the generation service.
    pub fn is_premium(&self) -> bool {
        *self != PlanType::Free
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Free => "free",
            PlanType::Monthly => "monthly",
            PlanType::Quarterly => "quarterly",
            PlanType::Yearly => "yearly",
        }
    }

    pub fn badge(&self) -> &'static str {
        if self.is_premium() {
            "Pro Plan"
        } else {
            "Free Plan"
        }
    }

    pub fn billing(&self) -> &'static str {
        match self {
            PlanType::Free => "core tools, premium assets locked",
            PlanType::Monthly => "Pro, billed monthly",
            PlanType::Quarterly => "Pro, billed every 3 months",
            PlanType::Yearly => "Pro, billed yearly",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
