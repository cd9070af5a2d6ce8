//! Lenient field deserializers for JSON produced by a language model.
//!
//! Numbers may arrive as `35000`, `35000.0`, `"35 000 руб"` or `null`; lists may arrive as `null`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Extracts a number from a JSON value. Strings keep their digits and the first decimal separator;
/// a comma followed by exactly three digits groups thousands (`120,000`), any other comma is decimal.
pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let span: Vec<char> = s
                .trim()
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit() || c.is_whitespace() || *c == '.' || *c == ',')
                .filter(|c| !c.is_whitespace())
                .collect();

            let mut cleaned = String::with_capacity(span.len());
            let mut seen_dot = false;
            for (i, &c) in span.iter().enumerate() {
                match c {
                    ',' if is_thousands_group(&span[i + 1..]) => {}
                    ',' | '.' => {
                        if !seen_dot {
                            cleaned.push('.');
                            seen_dot = true;
                        }
                    }
                    digit => cleaned.push(digit),
                }
            }
            cleaned.trim_end_matches('.').parse().ok()
        }
        _ => None,
    }
}

fn is_thousands_group(rest: &[char]) -> bool {
    rest.len() >= 3
        && rest[..3].iter().all(char::is_ascii_digit)
        && rest.get(3).map_or(true, |c| !c.is_ascii_digit())
}

pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Positive integer or None; zero and negatives count as "not given".
pub(crate) fn opt_positive_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .filter(|n| *n >= 1.0)
        .map(|n| n.round().min(u32::MAX as f64) as u32))
}

pub(crate) fn opt_positive_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .filter(|n| *n >= 1.0)
        .map(|n| n.round() as u64))
}

pub(crate) fn opt_positive_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .filter(|n| *n > 0.0))
}

pub(crate) fn opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "да" => Some(true),
            "false" | "no" | "нет" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

pub(crate) fn u32_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .filter(|n| *n > 0.0)
        .map(|n| n.round().min(u32::MAX as f64) as u32)
        .unwrap_or(0))
}

pub(crate) fn u64_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .filter(|n| *n > 0.0)
        .map(|n| n.round() as u64)
        .unwrap_or(0))
}

pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    })
}

pub(crate) fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_from_value() {
        assert_eq!(number_from_value(&json!(35000)), Some(35000.0));
        assert_eq!(number_from_value(&json!("35 000 руб")), Some(35000.0));
        assert_eq!(number_from_value(&json!("около 4,5 часов")), Some(4.5));
        assert_eq!(number_from_value(&json!("25г")), Some(25.0));
        assert_eq!(number_from_value(&json!("нет")), None);
        assert_eq!(number_from_value(&json!(null)), None);
    }

    #[test]
    fn test_comma_groups_thousands_or_marks_decimals() {
        assert_eq!(number_from_value(&json!("120,000 руб")), Some(120_000.0));
        assert_eq!(number_from_value(&json!("1,500")), Some(1_500.0));
        assert_eq!(number_from_value(&json!("1,250,000")), Some(1_250_000.0));
        assert_eq!(number_from_value(&json!("2,5")), Some(2.5));
        assert_eq!(number_from_value(&json!("12,50 руб")), Some(12.5));
        assert_eq!(number_from_value(&json!("1,5000")), Some(1.5));
    }

    #[test]
    fn test_event_details_with_grouped_numbers() {
        let details: crate::models::EventDetails =
            serde_json::from_value(json!({"budget_limit": "120,000 руб", "guests_count": "1,500"}))
                .unwrap();
        assert_eq!(details.budget_limit, Some(120_000));
        assert_eq!(details.guests_count, Some(1_500));
    }
}
