use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::{MaybeSubject, Subject};
use crate::errors::AppError;
use crate::models::profile::{ProfileInput, UserAchievement, UserProfile};
use crate::profile::gate::{resolve_session_state, SessionState};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    pub complete: bool,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        let complete = profile.is_complete();
        Self { profile, complete }
    }
}

/// GET /api/v1/session
pub async fn handle_session(
    State(state): State<AppState>,
    MaybeSubject(subject): MaybeSubject,
) -> Json<Value> {
    let session_state: SessionState = resolve_session_state(state.store.as_ref(), subject).await;
    Json(json!({ "state": session_state }))
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Subject(user_id): Subject,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .store
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(profile.into()))
}

/// PUT /api/v1/profile
///
/// Storage failures are reported: the client only leaves the setup form on success.
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Subject(user_id): Subject,
    payload: Result<Json<ProfileInput>, JsonRejection>,
) -> Result<Json<ProfileResponse>, AppError> {
    let Json(input) = payload?;
    let input = input.normalized();
    let profile = state.store.upsert_profile(user_id, &input).await?;
    info!(
        "Profile saved for user {user_id} (complete: {})",
        profile.is_complete()
    );
    Ok(Json(profile.into()))
}

/// GET /api/v1/achievements
pub async fn handle_list_achievements(
    State(state): State<AppState>,
    Subject(user_id): Subject,
) -> Result<Json<Vec<UserAchievement>>, AppError> {
    Ok(Json(state.store.list_achievements(user_id).await?))
}
