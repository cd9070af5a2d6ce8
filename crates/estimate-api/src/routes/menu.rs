//! Read-only menu catalog.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use estimate::{MenuCatalog, MenuCategory, MenuItem};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 100;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories))
        .route("/items", get(items))
        .route("/items/{id}", get(item))
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemsQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<usize>,
}

async fn categories() -> Json<Vec<&'static str>> {
    Json(MenuCatalog::categories())
}

/// Search when `search` is given, else the category listing, else popular items.
async fn items(
    State(state): State<AppState>,
    query: Result<Query<ItemsQuery>, QueryRejection>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if limit > MAX_LIMIT {
        return Err(ApiError::Validation(format!(
            "limit must be at most {}",
            MAX_LIMIT
        )));
    }
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(|c| {
            MenuCategory::parse(c)
                .ok_or_else(|| ApiError::Validation(format!("Unknown category: {}", c)))
        })
        .transpose()?;

    let found: Vec<&MenuItem> = match (query.search.as_deref().filter(|s| !s.trim().is_empty()), category) {
        (Some(search), category) => state.menu.search(search, category, limit),
        (None, Some(category)) => state.menu.by_category(category).into_iter().take(limit).collect(),
        (None, None) => state.menu.popular(limit),
    };
    Ok(Json(found.into_iter().cloned().collect()))
}

async fn item(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<MenuItem>, ApiError> {
    state
        .menu
        .get_by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Позиция не найдена".to_string()))
}
