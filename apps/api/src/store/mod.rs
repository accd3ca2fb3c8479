//! Backend facade: the only way orchestrators read or write persisted rows.
//!
//! Batch replacements are atomic: a failure part-way leaves the previous batch intact.
//! `PgStore` is the production implementation; `MemoryStore` backs the unit tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::career::{
    CareerRecommendation, NewRecommendation, NewRoadmapItem, NewSkillGap, RoadmapItem, SkillGap,
};
use crate::models::chat::{ChatMessage, ChatRole};
use crate::models::portfolio::{NewPortfolioItem, PortfolioItem};
use crate::models::profile::{ProfileInput, UserAchievement, UserProfile};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The write references a user who has no profile row yet.
    #[error("No profile exists for this user")]
    MissingProfile,
}

#[async_trait]
pub trait CareerStore: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError>;

    async fn upsert_profile(
        &self,
        user_id: Uuid,
        input: &ProfileInput,
    ) -> Result<UserProfile, StoreError>;

    async fn list_achievements(&self, user_id: Uuid) -> Result<Vec<UserAchievement>, StoreError>;

    /// Ordered by rank ascending.
    async fn list_recommendations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CareerRecommendation>, StoreError>;

    async fn get_recommendation(
        &self,
        user_id: Uuid,
        career_id: Uuid,
    ) -> Result<Option<CareerRecommendation>, StoreError>;

    /// Deletes every recommendation for the user and inserts `batch` in one atomic unit.
    /// Returns the stored rows ordered by rank.
    async fn replace_recommendations(
        &self,
        user_id: Uuid,
        batch: Vec<NewRecommendation>,
    ) -> Result<Vec<CareerRecommendation>, StoreError>;

    /// Ordered by `order_index` ascending.
    async fn list_roadmap(
        &self,
        user_id: Uuid,
        career_id: Uuid,
    ) -> Result<Vec<RoadmapItem>, StoreError>;

    async fn list_skill_gaps(
        &self,
        user_id: Uuid,
        career_id: Uuid,
    ) -> Result<Vec<SkillGap>, StoreError>;

    /// Replaces the roadmap items and skill gaps scoped to (user, career) in one atomic unit.
    async fn replace_career_plan(
        &self,
        user_id: Uuid,
        career_id: Uuid,
        items: Vec<NewRoadmapItem>,
        gaps: Vec<NewSkillGap>,
    ) -> Result<(), StoreError>;

    /// Flips `completed`, stamping `completed_at` with `now` or clearing it.
    /// `None` if the item does not exist or belongs to someone else.
    async fn toggle_roadmap_item(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<RoadmapItem>, StoreError>;

    /// Ordered by `created_at` ascending.
    async fn list_chat(&self, user_id: Uuid) -> Result<Vec<ChatMessage>, StoreError>;

    async fn append_chat(
        &self,
        user_id: Uuid,
        role: ChatRole,
        message: &str,
    ) -> Result<ChatMessage, StoreError>;

    /// Newest first.
    async fn list_portfolio(&self, user_id: Uuid) -> Result<Vec<PortfolioItem>, StoreError>;

    async fn insert_portfolio(
        &self,
        user_id: Uuid,
        item: &NewPortfolioItem,
    ) -> Result<PortfolioItem, StoreError>;

    /// Returns whether a row owned by the user was removed.
    async fn delete_portfolio(&self, user_id: Uuid, item_id: Uuid) -> Result<bool, StoreError>;
}
