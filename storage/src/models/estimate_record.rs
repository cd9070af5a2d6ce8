//! Estimate record model for persistence.
//!
//! Maps to the `estimates` table. Event details and the accepted proposal are stored as JSON text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EstimateRecord {
    pub id: String,
    pub order_number: String,
    pub chat_id: i64,
    pub user_id: i64,
    pub event_type: String,
    pub guests: i64,
    pub event_date: Option<String>,
    pub menu_cost: i64,
    pub service_cost: i64,
    pub total_cost: i64,
    /// Lowercase order status (`draft`, `completed`, ...).
    pub status: String,
    pub details_json: String,
    pub proposal_json: String,
    pub quote_file: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EstimateRecord {
    /// Creates a draft record with a generated UUID and current timestamps.
    pub fn new(order_number: impl Into<String>, chat_id: i64, user_id: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            order_number: order_number.into(),
            chat_id,
            user_id,
            event_type: String::new(),
            guests: 0,
            event_date: None,
            menu_cost: 0,
            service_cost: 0,
            total_cost: 0,
            status: "draft".to_string(),
            details_json: "{}".to_string(),
            proposal_json: "{}".to_string(),
            quote_file: None,
            created_at: now,
            updated_at: now,
        }
    }
}
