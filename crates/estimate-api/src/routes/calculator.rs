//! Portion and service cost calculators.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use estimate::{EventType, PortionCheck, PerEvent, PortionStandard, ServiceCalculator, ServiceQuote};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate-portions", post(validate_portions))
        .route("/portion-standards", get(portion_standards))
        .route("/service-cost", post(service_cost))
}

#[derive(Debug, Deserialize)]
pub struct PortionRequest {
    pub event_type: EventType,
    pub grams_per_guest: f64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ServiceCostRequest {
    pub guests: u32,
    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(default = "default_true")]
    pub need_service: bool,
    #[serde(default)]
    pub outside_mkad: bool,
}

async fn validate_portions(
    State(state): State<AppState>,
    request: Result<Json<PortionRequest>, JsonRejection>,
) -> Result<Json<PortionCheck>, ApiError> {
    let Json(request) = request?;
    if !request.grams_per_guest.is_finite() || request.grams_per_guest < 0.0 {
        return Err(ApiError::Validation(
            "grams_per_guest must be a non-negative number".to_string(),
        ));
    }
    let check = ServiceCalculator::new(state.standards())
        .check_portion(request.event_type, request.grams_per_guest);
    Ok(Json(check))
}

async fn portion_standards(State(state): State<AppState>) -> Json<PerEvent<PortionStandard>> {
    Json(state.standards().portion_standards)
}

async fn service_cost(
    State(state): State<AppState>,
    request: Result<Json<ServiceCostRequest>, JsonRejection>,
) -> Result<Json<ServiceQuote>, ApiError> {
    let Json(request) = request?;
    if request.guests == 0 {
        return Err(ApiError::Validation("guests must be positive".to_string()));
    }
    let quote = ServiceCalculator::new(state.standards()).service_quote(
        request.guests,
        request.hours,
        request.need_service,
        request.outside_mkad,
    );
    Ok(Json(quote))
}
