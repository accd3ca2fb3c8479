use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::Subject;
use crate::errors::AppError;
use crate::models::portfolio::{NewPortfolioItem, PortfolioItem};
use crate::portfolio::items::{add_item, list_portfolio, remove_item, PortfolioView};
use crate::state::AppState;

/// GET /api/v1/portfolio
pub async fn handle_list_portfolio(
    State(state): State<AppState>,
    Subject(user_id): Subject,
) -> Result<Json<PortfolioView>, AppError> {
    Ok(Json(list_portfolio(state.store.as_ref(), user_id).await?))
}

/// POST /api/v1/portfolio
///
/// An unknown `type` is a validation error like a blank title.
pub async fn handle_add_item(
    State(state): State<AppState>,
    Subject(user_id): Subject,
    payload: Result<Json<NewPortfolioItem>, JsonRejection>,
) -> Result<(StatusCode, Json<PortfolioItem>), AppError> {
    let Json(item) = payload?;
    let stored = add_item(state.store.as_ref(), user_id, item).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// DELETE /api/v1/portfolio/:id
pub async fn handle_delete_item(
    State(state): State<AppState>,
    Subject(user_id): Subject,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(item_id) = path?;
    remove_item(state.store.as_ref(), user_id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
