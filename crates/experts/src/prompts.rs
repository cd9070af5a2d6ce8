//! Prompt texts for the analysis and proposal calls.
//!
//! The proposal prompt is assembled from titled sections (rules, event, menu, previous proposal, edits);
//! empty sections are omitted.

use estimate::{BusinessStandards, EventType};

pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"Ты опытный менеджер кейтеринговой компании Rest Delivery (Москва, доставка фуршетов).
Извлеки из запроса клиента параметры мероприятия и ответь ТОЛЬКО JSON-объектом без пояснений:
{
  "event_type": "coffee_break" | "buffet" | "banquet",
  "guests_count": число,
  "event_date": "ГГГГ-ММ-ДД" или null,
  "event_time": "ЧЧ:ММ" или null,
  "duration_hours": число или null,
  "need_service": true | false,
  "need_equipment": true | false,
  "budget_limit": число в рублях или null,
  "dietary_restrictions": [строки],
  "special_requests": строка или null,
  "event_address": строка или null,
  "missing_info": [ключи полей, которых не хватает]
}
В missing_info указывай только ключи из списка: event_type, guests_count, event_date.
Не выдумывай значения, которых нет в запросе."#;

/// User message of the analysis call.
pub fn analysis_request(text: &str) -> String {
    format!("Проанализируй запрос клиента: {}", text)
}

pub const PROPOSAL_SYSTEM_PROMPT: &str = r#"Ты шеф-менеджер Rest Delivery и составляешь предложение по меню строго из переданного меню.
Ответь ТОЛЬКО JSON-объектом:
{
  "proposal_text": "короткое вступление для клиента",
  "menu_items": [
    {"category": "название категории", "items": [
      {"name": "название из меню", "weight": граммы одной порции, "price_per_item": цена одной порции, "quantity": количество}
    ]}
  ],
  "summary": {"price_per_guest": число, "weight_per_guest_grams": число, "total_menu_price": число},
  "service_calculation": {"service_details": "текст", "total_service_cost": число, "waiters_count": число} или null,
  "warnings": ["важные замечания для клиента"]
}"#;

fn rules_section(standards: &BusinessStandards) -> String {
    let mut lines = vec![format!(
        "- Минимальная сумма заказа: {} руб.",
        standards.min_order_amount
    )];
    for event in EventType::ALL {
        let portion = standards.portion_standards.get(event);
        lines.push(format!(
            "- {}: {}-{} г на гостя, оптимально {} г",
            event.display_name(),
            portion.min,
            portion.max,
            portion.optimal
        ));
    }
    lines.push(format!(
        "- Один официант на {} гостей, смена {} ч за {} руб., каждый доп. час {} руб.",
        standards.waiter_ratio_simple,
        standards.base_shift_hours,
        standards.waiter_cost_base,
        standards.waiter_cost_hourly
    ));
    lines.push(format!(
        "- Такси официантам после позднего окончания: {} руб.",
        standards.taxi_surcharge
    ));
    lines.push(format!(
        "- Доставка за МКАД: {} руб.",
        standards.delivery_cost_outside
    ));
    lines.push("- Не выходи за бюджет клиента, если он указан.".to_string());
    lines.join("\n")
}

/// Inputs of one proposal call.
pub struct ProposalPrompt<'a> {
    pub standards: &'a BusinessStandards,
    pub event_details_json: &'a str,
    pub menu_json: &'a str,
    pub previous_json: Option<&'a str>,
    pub edits: Option<&'a str>,
}

impl ProposalPrompt<'_> {
    pub fn render(&self) -> String {
        let mut sections = vec![
            ("Правила компании", rules_section(self.standards)),
            ("Параметры мероприятия", self.event_details_json.to_string()),
            ("Меню", self.menu_json.to_string()),
        ];
        if let Some(previous) = self.previous_json.filter(|p| !p.trim().is_empty()) {
            sections.push(("Предыдущее предложение", previous.to_string()));
        }
        if let Some(edits) = self.edits.filter(|e| !e.trim().is_empty()) {
            sections.push((
                "Правки клиента (внеси их в предыдущее предложение)",
                edits.trim().to_string(),
            ));
        }

        sections
            .into_iter()
            .map(|(title, body)| format!("{}:\n{}", title, body))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
