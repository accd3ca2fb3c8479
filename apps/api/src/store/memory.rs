//! In-process `CareerStore` mirroring the PostgreSQL semantics, including the
//! profile foreign key and the cascade from recommendations to career plans.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use super::{CareerStore, StoreError};
use crate::models::career::{
    CareerRecommendation, NewRecommendation, NewRoadmapItem, NewSkillGap, RoadmapItem, SkillGap,
};
use crate::models::chat::{ChatMessage, ChatRole};
use crate::models::portfolio::{NewPortfolioItem, PortfolioItem};
use crate::models::profile::{ProfileInput, UserAchievement, UserProfile};

#[derive(Default)]
struct Tables {
    profiles: Vec<UserProfile>,
    achievements: Vec<UserAchievement>,
    recommendations: Vec<CareerRecommendation>,
    roadmaps: Vec<RoadmapItem>,
    skill_gaps: Vec<SkillGap>,
    portfolio: Vec<PortfolioItem>,
    chat: Vec<ChatMessage>,
}

impl Tables {
    fn require_profile(&self, user_id: Uuid) -> Result<(), StoreError> {
        if self.profiles.iter().any(|p| p.id == user_id) {
            Ok(())
        } else {
            Err(StoreError::MissingProfile)
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn seed_achievement(&self, achievement: UserAchievement) {
        self.tables().achievements.push(achievement);
    }

    pub fn skill_gap_count(&self) -> usize {
        self.tables().skill_gaps.len()
    }

    pub fn roadmap_count(&self) -> usize {
        self.tables().roadmaps.len()
    }
}

#[async_trait]
impl CareerStore for MemoryStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.tables().profiles.iter().find(|p| p.id == user_id).cloned())
    }

    async fn upsert_profile(
        &self,
        user_id: Uuid,
        input: &ProfileInput,
    ) -> Result<UserProfile, StoreError> {
        let mut tables = self.tables();
        let now = Utc::now();
        let created_at = tables
            .profiles
            .iter()
            .find(|p| p.id == user_id)
            .map(|p| p.created_at)
            .unwrap_or(now);
        tables.profiles.retain(|p| p.id != user_id);

        let profile = UserProfile {
            id: user_id,
            display_name: input.display_name.clone(),
            bio: input.bio.clone(),
            display_picture_url: input.display_picture_url.clone(),
            resume_url: input.resume_url.clone(),
            education: Json(input.education.clone()),
            skills: input.skills.clone(),
            goals: input.goals.clone(),
            social_links: Json(input.social_links.clone()),
            created_at,
            updated_at: now,
        };
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn list_achievements(&self, user_id: Uuid) -> Result<Vec<UserAchievement>, StoreError> {
        let mut rows: Vec<_> = self
            .tables()
            .achievements
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.unlocked_at.cmp(&a.unlocked_at));
        Ok(rows)
    }

    async fn list_recommendations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CareerRecommendation>, StoreError> {
        let mut rows: Vec<_> = self
            .tables()
            .recommendations
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.rank);
        Ok(rows)
    }

    async fn get_recommendation(
        &self,
        user_id: Uuid,
        career_id: Uuid,
    ) -> Result<Option<CareerRecommendation>, StoreError> {
        Ok(self
            .tables()
            .recommendations
            .iter()
            .find(|r| r.id == career_id && r.user_id == user_id)
            .cloned())
    }

    async fn replace_recommendations(
        &self,
        user_id: Uuid,
        batch: Vec<NewRecommendation>,
    ) -> Result<Vec<CareerRecommendation>, StoreError> {
        let mut tables = self.tables();
        tables.require_profile(user_id)?;

        let removed: Vec<Uuid> = tables
            .recommendations
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.id)
            .collect();
        tables.recommendations.retain(|r| r.user_id != user_id);
        tables.roadmaps.retain(|i| !removed.contains(&i.career_id));
        tables.skill_gaps.retain(|g| !removed.contains(&g.career_id));

        let now = Utc::now();
        let mut stored: Vec<CareerRecommendation> = batch
            .into_iter()
            .map(|rec| CareerRecommendation {
                id: Uuid::new_v4(),
                user_id,
                career_title: rec.career_title,
                summary: rec.summary,
                market_demand: rec.market_demand,
                confidence_score: rec.confidence_score,
                required_skills: rec.required_skills,
                salary_range: rec.salary_range,
                growth_outlook: rec.growth_outlook,
                rank: rec.rank,
                created_at: now,
            })
            .collect();
        tables.recommendations.extend(stored.iter().cloned());
        stored.sort_by_key(|r| r.rank);
        Ok(stored)
    }

    async fn list_roadmap(
        &self,
        user_id: Uuid,
        career_id: Uuid,
    ) -> Result<Vec<RoadmapItem>, StoreError> {
        let mut rows: Vec<_> = self
            .tables()
            .roadmaps
            .iter()
            .filter(|i| i.user_id == user_id && i.career_id == career_id)
            .cloned()
            .collect();
        rows.sort_by_key(|i| i.order_index);
        Ok(rows)
    }

    async fn list_skill_gaps(
        &self,
        user_id: Uuid,
        career_id: Uuid,
    ) -> Result<Vec<SkillGap>, StoreError> {
        Ok(self
            .tables()
            .skill_gaps
            .iter()
            .filter(|g| g.user_id == user_id && g.career_id == career_id)
            .cloned()
            .collect())
    }

    async fn replace_career_plan(
        &self,
        user_id: Uuid,
        career_id: Uuid,
        items: Vec<NewRoadmapItem>,
        gaps: Vec<NewSkillGap>,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables();
        tables.require_profile(user_id)?;

        tables
            .roadmaps
            .retain(|i| !(i.user_id == user_id && i.career_id == career_id));
        tables
            .skill_gaps
            .retain(|g| !(g.user_id == user_id && g.career_id == career_id));

        let now = Utc::now();
        tables.roadmaps.extend(items.into_iter().map(|item| RoadmapItem {
            id: Uuid::new_v4(),
            user_id,
            career_id,
            title: item.title,
            description: item.description,
            difficulty_level: item.difficulty_level.as_str().to_string(),
            estimated_duration: item.estimated_duration,
            order_index: item.order_index,
            resource_links: Json(item.resource_links),
            certification_paths: item.certification_paths,
            completed: false,
            completed_at: None,
            created_at: now,
        }));
        tables.skill_gaps.extend(gaps.into_iter().map(|gap| SkillGap {
            id: Uuid::new_v4(),
            user_id,
            career_id,
            missing_skill: gap.missing_skill,
            importance: gap.importance.as_str().to_string(),
            course_suggestions: Json(gap.course_suggestions),
            created_at: now,
        }));
        Ok(())
    }

    async fn toggle_roadmap_item(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<RoadmapItem>, StoreError> {
        let mut tables = self.tables();
        let Some(item) = tables
            .roadmaps
            .iter_mut()
            .find(|i| i.id == item_id && i.user_id == user_id)
        else {
            return Ok(None);
        };
        item.completed = !item.completed;
        item.completed_at = item.completed.then_some(now);
        Ok(Some(item.clone()))
    }

    async fn list_chat(&self, user_id: Uuid) -> Result<Vec<ChatMessage>, StoreError> {
        let mut rows: Vec<_> = self
            .tables()
            .chat
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.created_at);
        Ok(rows)
    }

    async fn append_chat(
        &self,
        user_id: Uuid,
        role: ChatRole,
        message: &str,
    ) -> Result<ChatMessage, StoreError> {
        let mut tables = self.tables();
        tables.require_profile(user_id)?;
        let row = ChatMessage {
            id: Uuid::new_v4(),
            user_id,
            message: message.to_string(),
            role: role.as_str().to_string(),
            created_at: Utc::now(),
        };
        tables.chat.push(row.clone());
        Ok(row)
    }

    async fn list_portfolio(&self, user_id: Uuid) -> Result<Vec<PortfolioItem>, StoreError> {
        let mut rows: Vec<_> = self
            .tables()
            .portfolio
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        // newest first; reverse insertion order breaks timestamp ties
        rows.reverse();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_portfolio(
        &self,
        user_id: Uuid,
        item: &NewPortfolioItem,
    ) -> Result<PortfolioItem, StoreError> {
        let mut tables = self.tables();
        tables.require_profile(user_id)?;
        let now = Utc::now();
        let row = PortfolioItem {
            id: Uuid::new_v4(),
            user_id,
            item_type: item.kind.as_str().to_string(),
            title: item.title.clone(),
            description: item.description.clone(),
            file_url: item.file_url.clone(),
            skills_used: item.skills_used.clone(),
            ai_feedback: None,
            created_at: now,
            updated_at: now,
        };
        tables.portfolio.push(row.clone());
        Ok(row)
    }

    async fn delete_portfolio(&self, user_id: Uuid, item_id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables();
        let before = tables.portfolio.len();
        tables
            .portfolio
            .retain(|p| !(p.id == item_id && p.user_id == user_id));
        Ok(tables.portfolio.len() < before)
    }
}
