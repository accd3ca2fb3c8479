use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One row per auth subject; `id` is the subject itself.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub display_name: String,
    pub bio: String,
    pub display_picture_url: Option<String>,
    pub resume_url: Option<String>,
    pub education: Json<Vec<EducationEntry>>,
    pub skills: Vec<String>,
    pub goals: String,
    pub social_links: Json<BTreeMap<String, String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
}

impl UserProfile {
    /// A profile unlocks the main application once it has at least one skill and a goal.
    pub fn is_complete(&self) -> bool {
        !self.skills.is_empty() && !self.goals.trim().is_empty()
    }

    /// First listed institution, or an empty string.
    pub fn primary_education(&self) -> &str {
        self.education
            .first()
            .map(|e| e.institution.as_str())
            .unwrap_or("")
    }
}

/// Upsert payload for the profile form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub display_picture_url: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub goals: String,
    #[serde(default)]
    pub social_links: BTreeMap<String, String>,
}

impl ProfileInput {
    /// Trims list entries and drops blanks so stored skills never contain empty strings.
    pub fn normalized(mut self) -> Self {
        self.skills = normalize_list(self.skills);
        self.education.retain(|e| !e.institution.trim().is_empty());
        self.social_links.retain(|_, v| !v.trim().is_empty());
        self
    }
}

/// Read-only badge rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAchievement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub achievement_type: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub unlocked_at: DateTime<Utc>,
}

pub fn normalize_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
