//! Keyword analysis of a client request, used when the model cannot be reached.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::models::{EventDetails, EventType};

static GUESTS_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(?:человек|гост|чел)").ok());
static BUDGET_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:бюджет|стоимость)[:\s]*(\d+)").ok());

/// Requests shorter than this never count as complete.
const MIN_REQUEST_CHARS: usize = 30;

fn first_number(re: &Option<Regex>, text: &str) -> Option<u64> {
    re.as_ref()?
        .captures(text)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
        .filter(|n| *n > 0)
}

fn detect_event_type(text: &str) -> Option<EventType> {
    if text.contains("кофе-брейк") || text.contains("кофе брейк") || text.contains("coffee") {
        Some(EventType::CoffeeBreak)
    } else if text.contains("фуршет") || text.contains("buffet") {
        Some(EventType::Buffet)
    } else if text.contains("банкет") || text.contains("banquet") {
        Some(EventType::Banquet)
    } else {
        None
    }
}

/// Extracts event type, guests and budget by keywords.
///
/// Without event type and guests (or with a very short text) `missing_info` asks for the event type,
/// guest count and date.
pub fn keyword_analysis(text: &str) -> EventDetails {
    let lower = text.to_lowercase();
    let event_type = detect_event_type(&lower);
    let guests = first_number(&GUESTS_RE, &lower).and_then(|n| u32::try_from(n).ok());
    let budget = first_number(&BUDGET_RE, &lower);

    let has_minimum_info =
        event_type.is_some() && guests.is_some() && text.chars().count() > MIN_REQUEST_CHARS;

    info!(
        event_type = event_type.map(|e| e.as_str()).unwrap_or("unknown"),
        guests = guests.unwrap_or(0),
        has_minimum_info,
        "Keyword analysis used"
    );

    EventDetails {
        event_type: event_type.map(|e| e.as_str().to_string()),
        guests_count: guests,
        budget_limit: budget,
        missing_info: if has_minimum_info {
            Vec::new()
        } else {
            vec![
                "event_type".to_string(),
                "guests_count".to_string(),
                "event_date".to_string(),
            ]
        },
        ..Default::default()
    }
}
