use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::portfolio::{NewPortfolioItem, PortfolioItem, PortfolioKind};
use crate::models::profile::normalize_list;
use crate::store::CareerStore;

/// Portfolio grouped for display; each group keeps the newest-first order.
#[derive(Debug, Default, Serialize)]
pub struct PortfolioView {
    pub projects: Vec<PortfolioItem>,
    pub certifications: Vec<PortfolioItem>,
}

impl PortfolioView {
    pub fn from_items(items: Vec<PortfolioItem>) -> Self {
        let (projects, certifications) = items
            .into_iter()
            .partition(|i| i.item_type == PortfolioKind::Project.as_str());
        Self {
            projects,
            certifications,
        }
    }
}

/// Trims the payload and rejects items without a title.
pub fn validate_item(mut item: NewPortfolioItem) -> Result<NewPortfolioItem, AppError> {
    item.title = item.title.trim().to_string();
    if item.title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    item.description = item.description.trim().to_string();
    item.file_url = item
        .file_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());
    item.skills_used = normalize_list(item.skills_used);
    Ok(item)
}

pub async fn list_portfolio(
    store: &dyn CareerStore,
    user_id: Uuid,
) -> Result<PortfolioView, AppError> {
    Ok(PortfolioView::from_items(store.list_portfolio(user_id).await?))
}

pub async fn add_item(
    store: &dyn CareerStore,
    user_id: Uuid,
    item: NewPortfolioItem,
) -> Result<PortfolioItem, AppError> {
    let item = validate_item(item)?;
    let stored = store.insert_portfolio(user_id, &item).await?;
    info!(
        "Added {} '{}' to portfolio of user {user_id}",
        stored.item_type, stored.title
    );
    Ok(stored)
}

pub async fn remove_item(
    store: &dyn CareerStore,
    user_id: Uuid,
    item_id: Uuid,
) -> Result<(), AppError> {
    if store.delete_portfolio(user_id, item_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(format!(
            "Portfolio item {item_id} not found"
        )))
    }
}
