//! Aggregate statistics for estimates.
//!
//! Returned by EstimateRepository::get_stats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateStats {
    pub total_estimates: i64,
    pub completed_estimates: i64,
    /// Sum of `total_cost` over all estimates.
    pub total_value: i64,
    pub average_cost: f64,
    pub unique_chats: i64,
    pub first_estimate: Option<DateTime<Utc>>,
    pub last_estimate: Option<DateTime<Utc>>,
}
