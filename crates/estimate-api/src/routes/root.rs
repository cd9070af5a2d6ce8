use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use serde_json::{json, Value};

use crate::state::AppState;

pub const SERVICE_NAME: &str = "Rest Delivery Estimates";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "timestamp": Local::now().to_rfc3339(),
        "endpoints": {
            "validate_order": "/api/business/validate-order",
            "business_standards": "/api/business/standards",
            "business_health": "/api/business/health",
            "quick_test": "/api/business/quick-test",
            "calculator": "/api/calculator/*",
            "menu": "/api/menu/*",
            "estimates": "/api/estimates/*",
        },
        "configuration": {
            "debug_mode": state.config.debug,
            "environment": state.config.environment,
            "menu_items": state.menu.len(),
            "min_order_amount": state.standards().min_order_amount,
        },
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": Local::now().to_rfc3339(),
    }))
}
