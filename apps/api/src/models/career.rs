use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::null_default;

pub const MIN_CONFIDENCE: i32 = 60;
pub const MAX_CONFIDENCE: i32 = 95;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerRecommendation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub career_title: String,
    pub summary: String,
    pub market_demand: String,
    pub confidence_score: i32,
    pub required_skills: Vec<String>,
    pub salary_range: String,
    pub growth_outlook: String,
    /// 1-based position within the batch.
    pub rank: i32,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; `rank` is assigned from batch position by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecommendation {
    pub career_title: String,
    pub summary: String,
    pub market_demand: String,
    pub confidence_score: i32,
    pub required_skills: Vec<String>,
    pub salary_range: String,
    pub growth_outlook: String,
    pub rank: i32,
}

pub fn clamp_confidence(score: f64) -> i32 {
    if score.is_nan() {
        return MIN_CONFIDENCE;
    }
    (score.round() as i32).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl DifficultyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "Beginner",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Advanced => "Advanced",
            DifficultyLevel::Expert => "Expert",
        }
    }

    /// Case-insensitive match on model output; anything unrecognised is a beginner step.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "intermediate" => DifficultyLevel::Intermediate,
            "advanced" => DifficultyLevel::Advanced,
            "expert" => DifficultyLevel::Expert,
            _ => DifficultyLevel::Beginner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLink {
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub url: String,
    #[serde(default, rename = "type", deserialize_with = "null_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoadmapItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub career_id: Uuid,
    pub title: String,
    pub description: String,
    pub difficulty_level: String,
    pub estimated_duration: String,
    /// 0-based display order, unique per (user, career).
    pub order_index: i32,
    pub resource_links: Json<Vec<ResourceLink>>,
    pub certification_paths: Vec<String>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRoadmapItem {
    pub title: String,
    pub description: String,
    pub difficulty_level: DifficultyLevel,
    pub estimated_duration: String,
    pub order_index: i32,
    pub resource_links: Vec<ResourceLink>,
    pub certification_paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Importance {
    Critical,
    High,
    Medium,
    Low,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Critical => "Critical",
            Importance::High => "High",
            Importance::Medium => "Medium",
            Importance::Low => "Low",
        }
    }

    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "critical" => Importance::Critical,
            "high" => Importance::High,
            "low" => Importance::Low,
            _ => Importance::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSuggestion {
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub provider: String,
    #[serde(default, deserialize_with = "null_default")]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillGap {
    pub id: Uuid,
    pub user_id: Uuid,
    pub career_id: Uuid,
    pub missing_skill: String,
    pub importance: String,
    pub course_suggestions: Json<Vec<CourseSuggestion>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSkillGap {
    pub missing_skill: String,
    pub importance: Importance,
    pub course_suggestions: Vec<CourseSuggestion>,
}
