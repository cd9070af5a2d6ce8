//! Order validation against the business rules.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use estimate::{OrderData, OrderInfo, OrderMenuItem, OrderService, OrderTotals, ValidationReport};
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

const CAPABILITIES: [&str; 5] = [
    "portion_validation",
    "cost_validation",
    "service_validation",
    "timing_validation",
    "menu_validation",
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate-order", post(validate_order))
        .route("/standards", get(standards))
        .route("/quick-test", post(quick_test))
        .route("/health", get(health))
}

async fn validate_order(
    State(state): State<AppState>,
    order: Result<Json<OrderData>, JsonRejection>,
) -> Result<Json<ValidationReport>, ApiError> {
    let Json(order) = order?;
    info!(
        order_number = order.order_info.number.as_deref().unwrap_or("-"),
        guests = order.order_info.guests,
        event_type = %order.order_info.event_type,
        "Validating order"
    );
    Ok(Json(state.engine.validate_order(&order)))
}

async fn standards(State(state): State<AppState>) -> Json<Value> {
    let s = state.standards();
    Json(json!({
        "service": "Rest Delivery Business Standards",
        "status": "active",
        "standards": {
            "min_order_amount": s.min_order_amount,
            "portion_standards": s.portion_standards,
            "cost_per_guest_ranges": s.cost_per_guest_ranges,
            "waiter_ratios": {
                "simple": s.waiter_ratio_simple,
                "complex": s.waiter_ratio_complex,
            },
            "waiter_cost": {
                "base": s.waiter_cost_base,
                "hourly": s.waiter_cost_hourly,
                "base_shift_hours": s.base_shift_hours,
                "taxi_surcharge": s.taxi_surcharge,
            },
            "delivery_cost": {
                "mkad": s.delivery_cost_mkad,
                "outside_mkad": s.delivery_cost_outside,
            },
            "timing_requirements": s.timing_requirements,
        },
        "description": {
            "portion_standards": "Граммовка на гостя по типам мероприятий",
            "cost_per_guest_ranges": "Ценовые диапазоны на гостя",
            "waiter_ratios": "Соотношение официантов к гостям",
            "timing_requirements": "Минимальные сроки заказа в часах",
        },
    }))
}

/// Sample buffet order used by the quick test.
pub fn sample_order() -> OrderData {
    let item = |name: &str, category: &str, quantity| OrderMenuItem {
        name: name.to_string(),
        category: Some(category.to_string()),
        quantity,
        weight_per_set: 0.0,
        price_per_set: 0.0,
    };
    OrderData {
        order_info: OrderInfo {
            guests: 25,
            event_type: "buffet".to_string(),
            date: Some("2025-02-15".to_string()),
            number: Some("TEST-001".to_string()),
        },
        menu_items: vec![
            item("Канапе с лососем", "канапе", 50),
            item("Салат Цезарь", "салаты", 25),
        ],
        services: vec![OrderService {
            name: "Официант".to_string(),
            quantity: 2,
            duration: 4.0,
            cost: 19_000.0,
        }],
        totals: OrderTotals {
            total_weight: 8_500.0,
            total_cost: 65_000.0,
            service_cost: 19_000.0,
        },
    }
}

async fn quick_test(State(state): State<AppState>) -> Json<Value> {
    let order = sample_order();
    let report = state.engine.validate_order(&order);
    Json(json!({
        "message": "Тестовая валидация выполнена успешно",
        "timestamp": Local::now().to_rfc3339(),
        "test_data": order,
        "validation_result": report,
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let probe = OrderData {
        order_info: OrderInfo {
            guests: 1,
            event_type: "coffee_break".to_string(),
            ..Default::default()
        },
        totals: OrderTotals {
            total_weight: 250.0,
            total_cost: 10_000.0,
            service_cost: 0.0,
        },
        ..Default::default()
    };

    let started = Instant::now();
    let report = state.engine.validate_order(&probe);
    let response_time_ms = (started.elapsed().as_secs_f64() * 100_000.0).round() / 100.0;

    Json(json!({
        "status": "healthy",
        "service": "Business Logic Core",
        "timestamp": Local::now().to_rfc3339(),
        "response_time_ms": response_time_ms,
        "test_result": {
            "status": report.overall_status,
            "validations_count": report.summary.total_validations,
        },
        "capabilities": CAPABILITIES,
    }))
}
