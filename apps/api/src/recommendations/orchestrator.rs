//! Career recommendation regeneration.
//!
//! Flow: load profile → one generation call → clamp and rank the batch →
//!       atomically replace the stored batch → return the stored rows.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::advisor::{generate_recommendations, GenerationOutcome, RecommendationDraft};
use crate::llm_client::GeminiClient;
use crate::models::career::{clamp_confidence, CareerRecommendation, NewRecommendation};
use crate::store::{CareerStore, StoreError};

/// Generation batches are cut down to this many careers.
pub const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Serialize)]
pub struct RecommendationsResult {
    /// The rows as stored, so their ids are the ones later roadmap requests must use.
    pub recommendations: Vec<CareerRecommendation>,
    pub generation_unavailable: bool,
}

/// Position in the batch becomes `rank` (1-based).
pub fn rank_drafts(drafts: Vec<RecommendationDraft>) -> Vec<NewRecommendation> {
    drafts
        .into_iter()
        .filter(|d| !d.career_title.trim().is_empty())
        .take(MAX_RECOMMENDATIONS)
        .enumerate()
        .map(|(idx, d)| NewRecommendation {
            career_title: d.career_title.trim().to_string(),
            summary: d.summary,
            market_demand: d.market_demand,
            confidence_score: clamp_confidence(d.confidence_score),
            required_skills: d.required_skills,
            salary_range: d.salary_range,
            growth_outlook: d.growth_outlook,
            rank: idx as i32 + 1,
        })
        .collect()
}

/// Regenerates recommendations for `user_id`.
///
/// Without a profile there is nothing to base suggestions on: nothing is generated or
/// written and the result is empty. When the model is unavailable the previous batch
/// stays in place and is returned with `generation_unavailable` set.
pub async fn regenerate_recommendations(
    store: &dyn CareerStore,
    llm: &GeminiClient,
    user_id: Uuid,
) -> Result<RecommendationsResult, StoreError> {
    let Some(profile) = store.get_profile(user_id).await? else {
        info!("No profile for user {user_id}; skipping recommendation generation");
        return Ok(RecommendationsResult {
            recommendations: Vec::new(),
            generation_unavailable: false,
        });
    };

    match generate_recommendations(llm, &profile).await {
        GenerationOutcome::Generated(drafts) => {
            let batch = rank_drafts(drafts);
            let recommendations = store.replace_recommendations(user_id, batch).await?;
            info!(
                "Stored {} recommendations for user {user_id}",
                recommendations.len()
            );
            Ok(RecommendationsResult {
                recommendations,
                generation_unavailable: false,
            })
        }
        GenerationOutcome::Unavailable(reason) => {
            warn!("Keeping existing recommendations for user {user_id}: {reason}");
            Ok(RecommendationsResult {
                recommendations: store.list_recommendations(user_id).await?,
                generation_unavailable: true,
            })
        }
    }
}
