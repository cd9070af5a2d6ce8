//! Saved estimates, statistics, deterministic planning and cleanup.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use estimate::{
    format_for_telegram, EventDetails, OrderStatus, Proposal, ProposalPlanner, ValidationReport,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use storage::{EstimateRecord, EstimateStats};
use tracing::info;

use crate::cleanup::run_cleanup;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/completed", get(completed))
        .route("/details/{id}", get(details))
        .route("/stats", get(stats))
        .route("/plan", post(plan))
        .route("/admin/cleanup", post(cleanup))
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CleanupQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub proposal: Proposal,
    pub validation: ValidationReport,
    /// Proposal as the bot would send it, without markup.
    pub formatted: String,
}

fn in_range(name: &str, value: i64, min: i64, max: i64) -> Result<i64, ApiError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ApiError::Validation(format!(
            "{} must be between {} and {}",
            name, min, max
        )))
    }
}

async fn completed(
    State(state): State<AppState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let limit = in_range("limit", query.limit.unwrap_or(10), 1, 100)?;
    let estimates = state
        .repo
        .list_by_status(OrderStatus::Completed.as_str(), limit)
        .await?;
    Ok(Json(json!({
        "count": estimates.len(),
        "estimates": estimates,
    })))
}

/// Looks the estimate up by id, then by order number.
async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EstimateRecord>, ApiError> {
    let record = match state.repo.get_by_id(&id).await? {
        Some(record) => Some(record),
        None => state.repo.get_by_order_number(&id).await?,
    };
    record
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Estimate not found".to_string()))
}

async fn stats(State(state): State<AppState>) -> Result<Json<EstimateStats>, ApiError> {
    Ok(Json(state.repo.get_stats().await?))
}

async fn plan(
    State(state): State<AppState>,
    details: Result<Json<EventDetails>, JsonRejection>,
) -> Result<Json<PlanResponse>, ApiError> {
    let Json(details) = details?;
    let mut proposal = ProposalPlanner::new(&state.menu, state.standards()).plan(&details);
    let validation = state
        .engine
        .validate_order(&proposal.to_order_data(&details, None));
    proposal.apply_report(&validation);

    info!(
        items = proposal.item_count(),
        total_cost = proposal.total_cost(),
        status = validation.overall_status.as_str(),
        "Planned proposal"
    );
    let formatted = format_for_telegram(&proposal).plain;
    Ok(Json(PlanResponse {
        proposal,
        validation,
        formatted,
    }))
}

async fn cleanup(
    State(state): State<AppState>,
    query: Result<Query<CleanupQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let days = in_range("days", query.days.unwrap_or(7), 1, 30)?;
    let report = run_cleanup(&state.repo, &state.quotes_dir, days).await?;
    Ok(Json(json!({
        "message": format!("Очистка данных старше {} дней выполнена", days),
        "deleted_estimates": report.estimates,
        "deleted_quotes": report.quotes,
        "timestamp": Local::now().to_rfc3339(),
    })))
}
