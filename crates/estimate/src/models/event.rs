use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::lenient;
use crate::error::EstimateError;

/// Event format. Determines portion and cost-per-guest standards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    CoffeeBreak,
    #[default]
    Buffet,
    Banquet,
}

impl EventType {
    pub const ALL: [EventType; 3] = [EventType::CoffeeBreak, EventType::Buffet, EventType::Banquet];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::CoffeeBreak => "coffee_break",
            EventType::Buffet => "buffet",
            EventType::Banquet => "banquet",
        }
    }

    /// Name shown to clients.
    pub fn display_name(&self) -> &'static str {
        match self {
            EventType::CoffeeBreak => "Кофе-брейк",
            EventType::Buffet => "Фуршет",
            EventType::Banquet => "Банкет",
        }
    }

    /// Accepts the snake_case key and common Russian / English spellings.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        if s.is_empty() {
            return None;
        }
        if s.contains("coffee") || s.contains("кофе") {
            Some(EventType::CoffeeBreak)
        } else if s.contains("buffet") || s.contains("фуршет") {
            Some(EventType::Buffet)
        } else if s.contains("banquet") || s.contains("банкет") {
            Some(EventType::Banquet)
        } else {
            None
        }
    }

    /// Unknown or empty values fall back to buffet.
    pub fn from_str_or_default(s: &str) -> Self {
        Self::parse_lenient(s).unwrap_or_default()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s).ok_or_else(|| EstimateError::UnknownEventType(s.to_string()))
    }
}

/// Guests assumed when the request does not name a count.
pub const DEFAULT_GUESTS: u32 = 20;

/// Structured request extracted from a client's free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_positive_u32")]
    pub guests_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub event_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub event_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_positive_f64")]
    pub duration_hours: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub need_service: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub need_equipment: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_positive_u64")]
    pub budget_limit: Option<u64>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub dietary_restrictions: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub special_requests: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub event_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub missing_info: Vec<String>,
}

impl EventDetails {
    /// Guest count a menu is sized for: the stated count or [`DEFAULT_GUESTS`].
    pub fn planned_guests(&self) -> u32 {
        self.guests_count.unwrap_or(DEFAULT_GUESTS).max(1)
    }

    /// Event type with the buffet fallback applied.
    pub fn event_kind(&self) -> EventType {
        self.event_type
            .as_deref()
            .map(EventType::from_str_or_default)
            .unwrap_or_default()
    }

    pub fn wants_service(&self) -> bool {
        self.need_service.unwrap_or(false)
    }

    /// True when the address points outside the Moscow ring road.
    pub fn is_outside_mkad(&self) -> bool {
        self.event_address
            .as_deref()
            .map(|a| {
                let a = a.to_lowercase();
                a.contains("за мкад") || a.contains("область")
            })
            .unwrap_or(false)
    }
}
