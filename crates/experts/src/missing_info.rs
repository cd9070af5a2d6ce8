//! Russian labels for missing-info keys reported by the analysis.

const TRANSLATIONS: [(&str, &str); 11] = [
    ("event_type", "тип мероприятия"),
    ("guests_count", "количество гостей"),
    ("event_date", "дата мероприятия"),
    ("event_time", "время начала"),
    ("duration_hours", "продолжительность (в часах)"),
    ("need_service", "необходимость обслуживания"),
    ("need_equipment", "необходимость доп. оборудования"),
    ("budget_limit", "бюджет"),
    ("dietary_restrictions", "диетические ограничения"),
    ("special_requests", "особые пожелания"),
    ("event_address", "адрес мероприятия"),
];

/// Label for one key; unknown keys are returned as is.
pub fn translate_key(key: &str) -> &str {
    TRANSLATIONS
        .iter()
        .find(|(k, _)| *k == key.trim())
        .map_or(key, |(_, label)| *label)
}

pub fn translate_missing_info(keys: &[String]) -> Vec<String> {
    keys.iter().map(|k| translate_key(k).to_string()).collect()
}

/// Question sent to the client when details are missing.
pub fn missing_info_question(keys: &[String]) -> String {
    format!(
        "Уточните, пожалуйста: {}?",
        translate_missing_info(keys).join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_keys() {
        let keys = vec!["guests_count".to_string(), "цвет скатертей".to_string()];
        assert_eq!(
            translate_missing_info(&keys),
            vec!["количество гостей", "цвет скатертей"]
        );
    }

    #[test]
    fn test_question() {
        let keys = vec!["event_type".to_string(), "event_date".to_string()];
        assert_eq!(
            missing_info_question(&keys),
            "Уточните, пожалуйста: тип мероприятия, дата мероприятия?"
        );
    }
}
