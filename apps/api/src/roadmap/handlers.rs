use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use uuid::Uuid;

use crate::auth::Subject;
use crate::errors::AppError;
use crate::models::career::RoadmapItem;
use crate::roadmap::planner::{load_career_plan, regenerate_career_plan, toggle_item, CareerPlan};
use crate::state::AppState;

fn career_not_found(career_id: Uuid) -> AppError {
    AppError::NotFound(format!("Career {career_id} not found"))
}

/// GET /api/v1/careers/:career_id/roadmap
pub async fn handle_get_roadmap(
    State(state): State<AppState>,
    Subject(user_id): Subject,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<CareerPlan>, AppError> {
    let Path(career_id) = path?;
    load_career_plan(state.store.as_ref(), user_id, career_id)
        .await?
        .map(Json)
        .ok_or_else(|| career_not_found(career_id))
}

/// POST /api/v1/careers/:career_id/roadmap/generate
pub async fn handle_generate_roadmap(
    State(state): State<AppState>,
    Subject(user_id): Subject,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<CareerPlan>, AppError> {
    let Path(career_id) = path?;
    regenerate_career_plan(state.store.as_ref(), &state.llm, user_id, career_id)
        .await?
        .map(Json)
        .ok_or_else(|| career_not_found(career_id))
}

/// POST /api/v1/roadmap/items/:item_id/toggle
pub async fn handle_toggle_item(
    State(state): State<AppState>,
    Subject(user_id): Subject,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<RoadmapItem>, AppError> {
    let Path(item_id) = path?;
    toggle_item(state.store.as_ref(), user_id, item_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Roadmap item {item_id} not found")))
}
