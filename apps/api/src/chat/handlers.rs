use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::auth::Subject;
use crate::chat::conversation::send_message;
use crate::errors::AppError;
use crate::models::chat::ChatMessage;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// GET /api/v1/chat
pub async fn handle_list_chat(
    State(state): State<AppState>,
    Subject(user_id): Subject,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    Ok(Json(state.store.list_chat(user_id).await?))
}

/// POST /api/v1/chat
///
/// Returns the full transcript after the turn, including the mentor's reply.
pub async fn handle_send_message(
    State(state): State<AppState>,
    Subject(user_id): Subject,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let Json(request) = payload?;
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let transcript = send_message(state.store.as_ref(), &state.llm, user_id, message).await?;
    Ok(Json(transcript))
}
