use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PortfolioItem {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub item_type: String,
    pub title: String,
    pub description: String,
    pub file_url: Option<String>,
    pub skills_used: Vec<String>,
    pub ai_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortfolioKind {
    Project,
    Certification,
}

impl PortfolioKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortfolioKind::Project => "project",
            PortfolioKind::Certification => "certification",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPortfolioItem {
    #[serde(rename = "type")]
    pub kind: PortfolioKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub skills_used: Vec<String>,
}
