use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use super::{CareerStore, StoreError};
use crate::models::career::{
    CareerRecommendation, NewRecommendation, NewRoadmapItem, NewSkillGap, RoadmapItem, SkillGap,
};
use crate::models::chat::{ChatMessage, ChatRole};
use crate::models::portfolio::{NewPortfolioItem, PortfolioItem};
use crate::models::profile::{ProfileInput, UserAchievement, UserProfile};

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Writes against a user with no profile row trip the foreign key; report that distinctly.
fn map_write_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => StoreError::MissingProfile,
        _ => StoreError::Database(e),
    }
}

/// Locks the user's profile row for the rest of the transaction so that
/// overlapping batch replacements for the same user run one after the other.
async fn lock_owner(tx: &mut Transaction<'_, Postgres>, user_id: Uuid) -> Result<(), StoreError> {
    let locked: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM user_profiles WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await?;
    locked.map(|_| ()).ok_or(StoreError::MissingProfile)
}

#[async_trait]
impl CareerStore for PgStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        Ok(
            sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn upsert_profile(
        &self,
        user_id: Uuid,
        input: &ProfileInput,
    ) -> Result<UserProfile, StoreError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles
                (id, display_name, bio, display_picture_url, resume_url,
                 education, skills, goals, social_links)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                bio = EXCLUDED.bio,
                display_picture_url = EXCLUDED.display_picture_url,
                resume_url = EXCLUDED.resume_url,
                education = EXCLUDED.education,
                skills = EXCLUDED.skills,
                goals = EXCLUDED.goals,
                social_links = EXCLUDED.social_links,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&input.display_name)
        .bind(&input.bio)
        .bind(&input.display_picture_url)
        .bind(&input.resume_url)
        .bind(Json(&input.education))
        .bind(&input.skills)
        .bind(&input.goals)
        .bind(Json(&input.social_links))
        .fetch_one(&self.pool)
        .await?;

        info!("Saved profile for user {user_id}");
        Ok(profile)
    }

    async fn list_achievements(&self, user_id: Uuid) -> Result<Vec<UserAchievement>, StoreError> {
        Ok(sqlx::query_as::<_, UserAchievement>(
            "SELECT * FROM user_achievements WHERE user_id = $1 ORDER BY unlocked_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_recommendations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CareerRecommendation>, StoreError> {
        Ok(sqlx::query_as::<_, CareerRecommendation>(
            "SELECT * FROM career_recommendations WHERE user_id = $1 ORDER BY rank ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_recommendation(
        &self,
        user_id: Uuid,
        career_id: Uuid,
    ) -> Result<Option<CareerRecommendation>, StoreError> {
        Ok(sqlx::query_as::<_, CareerRecommendation>(
            "SELECT * FROM career_recommendations WHERE id = $1 AND user_id = $2",
        )
        .bind(career_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn replace_recommendations(
        &self,
        user_id: Uuid,
        batch: Vec<NewRecommendation>,
    ) -> Result<Vec<CareerRecommendation>, StoreError> {
        let mut tx = self.pool.begin().await?;
        lock_owner(&mut tx, user_id).await?;

        let removed = sqlx::query("DELETE FROM career_recommendations WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let mut stored = Vec::with_capacity(batch.len());
        for rec in &batch {
            let row = sqlx::query_as::<_, CareerRecommendation>(
                r#"
                INSERT INTO career_recommendations
                    (user_id, career_title, summary, market_demand, confidence_score,
                     required_skills, salary_range, growth_outlook, rank)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
                "#,
            )
            .bind(user_id)
            .bind(&rec.career_title)
            .bind(&rec.summary)
            .bind(&rec.market_demand)
            .bind(rec.confidence_score)
            .bind(&rec.required_skills)
            .bind(&rec.salary_range)
            .bind(&rec.growth_outlook)
            .bind(rec.rank)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(row);
        }

        tx.commit().await?;
        debug!(
            "Replaced {removed} recommendations with {} for user {user_id}",
            stored.len()
        );

        stored.sort_by_key(|r| r.rank);
        Ok(stored)
    }

    async fn list_roadmap(
        &self,
        user_id: Uuid,
        career_id: Uuid,
    ) -> Result<Vec<RoadmapItem>, StoreError> {
        Ok(sqlx::query_as::<_, RoadmapItem>(
            r#"
            SELECT * FROM career_roadmaps
            WHERE user_id = $1 AND career_id = $2
            ORDER BY order_index ASC
            "#,
        )
        .bind(user_id)
        .bind(career_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_skill_gaps(
        &self,
        user_id: Uuid,
        career_id: Uuid,
    ) -> Result<Vec<SkillGap>, StoreError> {
        Ok(sqlx::query_as::<_, SkillGap>(
            r#"
            SELECT * FROM skill_gaps
            WHERE user_id = $1 AND career_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(career_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn replace_career_plan(
        &self,
        user_id: Uuid,
        career_id: Uuid,
        items: Vec<NewRoadmapItem>,
        gaps: Vec<NewSkillGap>,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        lock_owner(&mut tx, user_id).await?;

        // the career may have been replaced while the plan was being generated
        let career: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM career_recommendations WHERE id = $1 AND user_id = $2",
        )
        .bind(career_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        if career.is_none() {
            debug!("Career {career_id} no longer exists; dropping generated plan");
            return Ok(());
        }

        sqlx::query("DELETE FROM career_roadmaps WHERE user_id = $1 AND career_id = $2")
            .bind(user_id)
            .bind(career_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM skill_gaps WHERE user_id = $1 AND career_id = $2")
            .bind(user_id)
            .bind(career_id)
            .execute(&mut *tx)
            .await?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO career_roadmaps
                    (user_id, career_id, title, description, difficulty_level,
                     estimated_duration, order_index, resource_links, certification_paths)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(user_id)
            .bind(career_id)
            .bind(&item.title)
            .bind(&item.description)
            .bind(item.difficulty_level.as_str())
            .bind(&item.estimated_duration)
            .bind(item.order_index)
            .bind(Json(&item.resource_links))
            .bind(&item.certification_paths)
            .execute(&mut *tx)
            .await
            .map_err(map_write_error)?;
        }

        for gap in &gaps {
            sqlx::query(
                r#"
                INSERT INTO skill_gaps
                    (user_id, career_id, missing_skill, importance, course_suggestions)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(user_id)
            .bind(career_id)
            .bind(&gap.missing_skill)
            .bind(gap.importance.as_str())
            .bind(Json(&gap.course_suggestions))
            .execute(&mut *tx)
            .await
            .map_err(map_write_error)?;
        }

        tx.commit().await?;
        info!(
            "Stored career plan for user {user_id}, career {career_id}: {} items, {} gaps",
            items.len(),
            gaps.len()
        );
        Ok(())
    }

    async fn toggle_roadmap_item(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<RoadmapItem>, StoreError> {
        Ok(sqlx::query_as::<_, RoadmapItem>(
            r#"
            UPDATE career_roadmaps
            SET completed = NOT completed,
                completed_at = CASE WHEN completed THEN NULL ELSE $3 END
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_chat(&self, user_id: Uuid) -> Result<Vec<ChatMessage>, StoreError> {
        Ok(sqlx::query_as::<_, ChatMessage>(
            "SELECT * FROM chat_history WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn append_chat(
        &self,
        user_id: Uuid,
        role: ChatRole,
        message: &str,
    ) -> Result<ChatMessage, StoreError> {
        sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_history (user_id, message, role, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(message)
        .bind(role.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn list_portfolio(&self, user_id: Uuid) -> Result<Vec<PortfolioItem>, StoreError> {
        Ok(sqlx::query_as::<_, PortfolioItem>(
            "SELECT * FROM portfolio_items WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_portfolio(
        &self,
        user_id: Uuid,
        item: &NewPortfolioItem,
    ) -> Result<PortfolioItem, StoreError> {
        sqlx::query_as::<_, PortfolioItem>(
            r#"
            INSERT INTO portfolio_items (user_id, type, title, description, file_url, skills_used)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(item.kind.as_str())
        .bind(&item.title)
        .bind(&item.description)
        .bind(&item.file_url)
        .bind(&item.skills_used)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn delete_portfolio(&self, user_id: Uuid, item_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM portfolio_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
