//! Career plans: an ordered roadmap plus the skill gaps for one recommended career.
//!
//! Regeneration issues two separate generation calls, roadmap first, then skill gaps.
//! The stored plan is only replaced when both calls produced an answer.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::advisor::{analyze_skill_gaps, generate_roadmap, GenerationOutcome, RoadmapDraft, SkillGapDraft};
use crate::llm_client::GeminiClient;
use crate::models::career::{
    DifficultyLevel, Importance, NewRoadmapItem, NewSkillGap, RoadmapItem, SkillGap,
};
use crate::store::{CareerStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent; 0 for an empty roadmap.
    pub percent: u8,
}

impl Progress {
    pub fn of(items: &[RoadmapItem]) -> Self {
        let total = items.len();
        let completed = items.iter().filter(|i| i.completed).count();
        let percent = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            completed,
            total,
            percent,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CareerPlan {
    pub career_id: Uuid,
    pub career_title: String,
    pub roadmap: Vec<RoadmapItem>,
    pub skill_gaps: Vec<SkillGap>,
    pub progress: Progress,
    pub generation_unavailable: bool,
}

pub fn roadmap_items(drafts: Vec<RoadmapDraft>) -> Vec<NewRoadmapItem> {
    drafts
        .into_iter()
        .filter(|d| !d.title.trim().is_empty())
        .enumerate()
        .map(|(idx, d)| NewRoadmapItem {
            title: d.title.trim().to_string(),
            description: d.description,
            difficulty_level: DifficultyLevel::normalize(&d.difficulty_level),
            estimated_duration: d.estimated_duration,
            order_index: idx as i32,
            resource_links: d.resource_links,
            certification_paths: d.certification_paths,
        })
        .collect()
}

pub fn skill_gaps(drafts: Vec<SkillGapDraft>) -> Vec<NewSkillGap> {
    drafts
        .into_iter()
        .filter(|d| !d.missing_skill.trim().is_empty())
        .map(|d| NewSkillGap {
            missing_skill: d.missing_skill.trim().to_string(),
            importance: Importance::normalize(&d.importance),
            course_suggestions: d.course_suggestions,
        })
        .collect()
}

/// Reads the stored plan. `None` when the career does not belong to the user.
pub async fn load_career_plan(
    store: &dyn CareerStore,
    user_id: Uuid,
    career_id: Uuid,
) -> Result<Option<CareerPlan>, StoreError> {
    let Some(career) = store.get_recommendation(user_id, career_id).await? else {
        return Ok(None);
    };
    let roadmap = store.list_roadmap(user_id, career_id).await?;
    let skill_gaps = store.list_skill_gaps(user_id, career_id).await?;
    Ok(Some(CareerPlan {
        career_id,
        career_title: career.career_title,
        progress: Progress::of(&roadmap),
        roadmap,
        skill_gaps,
        generation_unavailable: false,
    }))
}

/// Regenerates the roadmap and skill gaps for one career.
pub async fn regenerate_career_plan(
    store: &dyn CareerStore,
    llm: &GeminiClient,
    user_id: Uuid,
    career_id: Uuid,
) -> Result<Option<CareerPlan>, StoreError> {
    let Some(career) = store.get_recommendation(user_id, career_id).await? else {
        return Ok(None);
    };
    let current_skills = store
        .get_profile(user_id)
        .await?
        .map(|p| p.skills)
        .unwrap_or_default();

    let roadmap = generate_roadmap(
        llm,
        &career.career_title,
        &current_skills,
        &career.required_skills,
    )
    .await;
    let gaps = analyze_skill_gaps(
        llm,
        &career.career_title,
        &current_skills,
        &career.required_skills,
    )
    .await;

    let unavailable = match (roadmap, gaps) {
        (GenerationOutcome::Generated(steps), GenerationOutcome::Generated(gaps)) => {
            let steps = roadmap_items(steps);
            let gaps = skill_gaps(gaps);
            info!(
                "Storing {} roadmap steps and {} skill gaps for career {career_id}",
                steps.len(),
                gaps.len()
            );
            store
                .replace_career_plan(user_id, career_id, steps, gaps)
                .await?;
            false
        }
        _ => {
            warn!("Keeping existing plan for career {career_id}: generation unavailable");
            true
        }
    };

    let plan = load_career_plan(store, user_id, career_id).await?;
    Ok(plan.map(|plan| CareerPlan {
        generation_unavailable: unavailable,
        ..plan
    }))
}

/// Flips one roadmap item's completion. `None` when the item does not belong to the user.
pub async fn toggle_item(
    store: &dyn CareerStore,
    user_id: Uuid,
    item_id: Uuid,
) -> Result<Option<RoadmapItem>, StoreError> {
    let item = store.toggle_roadmap_item(user_id, item_id, Utc::now()).await?;
    if let Some(item) = &item {
        info!(
            "Roadmap item {item_id} marked {}",
            if item.completed { "complete" } else { "incomplete" }
        );
    }
    Ok(item)
}
