use axum::{extract::State, Json};

use crate::auth::Subject;
use crate::errors::AppError;
use crate::models::career::CareerRecommendation;
use crate::recommendations::orchestrator::{regenerate_recommendations, RecommendationsResult};
use crate::state::AppState;

/// GET /api/v1/recommendations
pub async fn handle_list_recommendations(
    State(state): State<AppState>,
    Subject(user_id): Subject,
) -> Result<Json<Vec<CareerRecommendation>>, AppError> {
    Ok(Json(state.store.list_recommendations(user_id).await?))
}

/// POST /api/v1/recommendations/generate
///
/// Replaces the user's recommendations with a freshly generated batch.
pub async fn handle_generate_recommendations(
    State(state): State<AppState>,
    Subject(user_id): Subject,
) -> Result<Json<RecommendationsResult>, AppError> {
    let result = regenerate_recommendations(state.store.as_ref(), &state.llm, user_id).await?;
    Ok(Json(result))
}
