use serde::{Deserialize, Serialize};

fn default_event_type() -> String {
    "buffet".to_string()
}

/// Order as seen by the rules engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderData {
    #[serde(default)]
    pub order_info: OrderInfo,
    #[serde(default)]
    pub menu_items: Vec<OrderMenuItem>,
    #[serde(default)]
    pub services: Vec<OrderService>,
    #[serde(default)]
    pub totals: OrderTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInfo {
    #[serde(default)]
    pub guests: i64,
    #[serde(default = "default_event_type")]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

impl Default for OrderInfo {
    fn default() -> Self {
        Self {
            guests: 0,
            event_type: default_event_type(),
            date: None,
            number: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderMenuItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub weight_per_set: f64,
    #[serde(default)]
    pub price_per_set: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderService {
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    #[serde(default)]
    pub total_weight: f64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub service_cost: f64,
}
