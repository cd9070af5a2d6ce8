//! Order validators. Each one checks a single aspect of [`OrderData`] and reports findings.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::format::group_thousands;
use crate::models::OrderData;
use crate::standards::BusinessStandards;

/// Grams per guest below this are critical regardless of event type.
const CRITICAL_PORTION_GRAMS: f64 = 250.0;
/// Grams per guest above this are flagged as too much food.
const HIGH_PORTION_GRAMS: f64 = 750.0;
const PORTION_REFERENCE_CASE: &str = "P-39454";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub level: ValidationLevel,
    pub message: String,
    pub field: String,
    pub recommendation: Option<String>,
    pub reference_case: Option<String>,
}

impl ValidationResult {
    fn new(level: ValidationLevel, field: &str, message: String, recommendation: String) -> Self {
        Self {
            level,
            message,
            field: field.to_string(),
            recommendation: Some(recommendation),
            reference_case: None,
        }
    }

    fn with_reference(mut self, case: &str) -> Self {
        self.reference_case = Some(case.to_string());
        self
    }
}

/// Inputs shared by all validators: standards and the moment the order is checked.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub standards: &'a BusinessStandards,
    pub now: NaiveDateTime,
}

pub trait Validator: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, order: &OrderData, ctx: &ValidationContext<'_>) -> Vec<ValidationResult>;
}

/// Grams per guest against the event's portion standard.
pub struct PortionValidator;

impl Validator for PortionValidator {
    fn name(&self) -> &'static str {
        "portion"
    }

    fn validate(&self, order: &OrderData, ctx: &ValidationContext<'_>) -> Vec<ValidationResult> {
        let guests = order.order_info.guests;
        let event_type = &order.order_info.event_type;

        if guests <= 0 {
            return vec![ValidationResult::new(
                ValidationLevel::Error,
                "guests",
                "❌ Количество гостей должно быть больше 0".to_string(),
                "Укажите корректное количество гостей".to_string(),
            )];
        }

        let grams = order.totals.total_weight / guests as f64;
        let standard = ctx.standards.portion_for(event_type);

        let result = if grams < CRITICAL_PORTION_GRAMS {
            ValidationResult::new(
                ValidationLevel::Critical,
                "portion_size",
                format!("🚨 КРИТИЧНО: Недостаточно еды! {:.0}г < 250г на гостя", grams),
                "Увеличьте количество блюд минимум до 250г на гостя".to_string(),
            )
        } else if grams > HIGH_PORTION_GRAMS {
            ValidationResult::new(
                ValidationLevel::Warning,
                "portion_size",
                format!("⚠️ Много еды: {:.0}г > 750г на гостя", grams),
                "Рассмотрите возможность уменьшения порций".to_string(),
            )
        } else if grams >= standard.min as f64 && grams <= standard.max as f64 {
            ValidationResult::new(
                ValidationLevel::Info,
                "portion_size",
                format!("✅ Оптимальная граммовка: {:.0}г для {}", grams, event_type),
                "Граммовка соответствует стандартам".to_string(),
            )
            .with_reference(PORTION_REFERENCE_CASE)
        } else {
            ValidationResult::new(
                ValidationLevel::Warning,
                "portion_size",
                format!("⚠️ Граммовка вне стандартов: {:.0}г для {}", grams, event_type),
                format!("Оптимальный диапазон: {}-{}г", standard.min, standard.max),
            )
        };
        vec![result]
    }
}

/// Minimum order amount and cost per guest.
pub struct CostValidator;

impl Validator for CostValidator {
    fn name(&self) -> &'static str {
        "cost"
    }

    fn validate(&self, order: &OrderData, ctx: &ValidationContext<'_>) -> Vec<ValidationResult> {
        let guests = order.order_info.guests;
        let total = order.totals.total_cost;
        let min_order = ctx.standards.min_order_amount;

        if total < min_order as f64 {
            return vec![ValidationResult::new(
                ValidationLevel::Error,
                "total_cost",
                format!(
                    "❌ Сумма заказа {}₽ меньше минимальной {}₽",
                    group_thousands(total.round() as i64),
                    group_thousands(min_order as i64)
                ),
                format!("Увеличьте заказ до {}₽", group_thousands(min_order as i64)),
            )];
        }

        if guests <= 0 {
            return Vec::new();
        }

        let per_guest = total / guests as f64;
        let range = ctx.standards.cost_range_for(&order.order_info.event_type);
        let result = if per_guest < range.min as f64 * 0.7 {
            ValidationResult::new(
                ValidationLevel::Warning,
                "cost_per_guest",
                format!(
                    "⚠️ Низкая стоимость на гостя: {}₽",
                    group_thousands(per_guest.round() as i64)
                ),
                format!(
                    "Ожидаемый диапазон: {}-{}₽",
                    group_thousands(range.min as i64),
                    group_thousands(range.max as i64)
                ),
            )
        } else if per_guest > range.max as f64 * 1.5 {
            ValidationResult::new(
                ValidationLevel::Warning,
                "cost_per_guest",
                format!(
                    "⚠️ Высокая стоимость на гостя: {}₽",
                    group_thousands(per_guest.round() as i64)
                ),
                "Проверьте корректность расчета".to_string(),
            )
        } else {
            ValidationResult::new(
                ValidationLevel::Info,
                "total_cost",
                format!(
                    "✅ Сумма заказа {}₽ соответствует требованиям",
                    group_thousands(total.round() as i64)
                ),
                "Стоимость в пределах нормы".to_string(),
            )
        };
        vec![result]
    }
}

/// Waiter headcount against guest ratios. Silent when no waiters are ordered.
pub struct ServiceValidator;

impl Validator for ServiceValidator {
    fn name(&self) -> &'static str {
        "service"
    }

    fn validate(&self, order: &OrderData, ctx: &ValidationContext<'_>) -> Vec<ValidationResult> {
        let guests = order.order_info.guests;
        let waiters: i64 = order
            .services
            .iter()
            .filter(|s| {
                let name = s.name.to_lowercase();
                name.contains("официант") || name.contains("waiter")
            })
            .map(|s| s.quantity as i64)
            .sum();

        if waiters == 0 {
            return Vec::new();
        }

        let min = (guests / ctx.standards.waiter_ratio_simple.max(1) as i64).max(1);
        let max = (guests / ctx.standards.waiter_ratio_complex.max(1) as i64).max(2);

        let result = if waiters < min {
            ValidationResult::new(
                ValidationLevel::Warning,
                "waiter_count",
                format!("⚠️ Мало официантов: {} для {} гостей", waiters, guests),
                format!("Рекомендуем минимум {} официант(ов)", min),
            )
        } else if waiters > max {
            ValidationResult::new(
                ValidationLevel::Warning,
                "waiter_count",
                format!("⚠️ Много официантов: {} для {} гостей", waiters, guests),
                format!("Оптимальное количество: {}-{}", min, max),
            )
        } else {
            ValidationResult::new(
                ValidationLevel::Info,
                "waiter_count",
                format!("✅ Количество официантов оптимально: {}", waiters),
                "Персонал соответствует требованиям".to_string(),
            )
        };
        vec![result]
    }
}

/// Notice period before the event date. Silent when no date is given.
pub struct TimingValidator;

impl Validator for TimingValidator {
    fn name(&self) -> &'static str {
        "timing"
    }

    fn validate(&self, order: &OrderData, ctx: &ValidationContext<'_>) -> Vec<ValidationResult> {
        let Some(date) = order
            .order_info
            .date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
        else {
            return Vec::new();
        };

        let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
            return vec![ValidationResult::new(
                ValidationLevel::Error,
                "event_date",
                "❌ Некорректный формат даты".to_string(),
                "Используйте формат YYYY-MM-DD".to_string(),
            )];
        };

        let event_start = date.and_time(NaiveTime::MIN);
        let hours_until = (event_start - ctx.now).num_seconds() as f64 / 3600.0;
        let required = ctx
            .standards
            .required_notice_hours(!order.services.is_empty(), order.totals.total_cost);

        let result = if hours_until < required as f64 {
            ValidationResult::new(
                ValidationLevel::Warning,
                "timing",
                format!(
                    "⚠️ Мало времени до мероприятия: {:.0}ч < {}ч",
                    hours_until, required
                ),
                format!("Рекомендуем заказывать за {} часов", required),
            )
        } else {
            ValidationResult::new(
                ValidationLevel::Info,
                "timing",
                format!("✅ Время до мероприятия достаточно: {:.0}ч", hours_until),
                "Временные требования соблюдены".to_string(),
            )
        };
        vec![result]
    }
}

/// Menu is non-empty and covers at least two categories.
pub struct MenuValidator;

impl Validator for MenuValidator {
    fn name(&self) -> &'static str {
        "menu"
    }

    fn validate(&self, order: &OrderData, _ctx: &ValidationContext<'_>) -> Vec<ValidationResult> {
        if order.menu_items.is_empty() {
            return vec![ValidationResult::new(
                ValidationLevel::Error,
                "menu_items",
                "❌ Меню не может быть пустым".to_string(),
                "Добавьте блюда в заказ".to_string(),
            )];
        }

        let categories: HashSet<&str> = order
            .menu_items
            .iter()
            .map(|i| i.category.as_deref().unwrap_or("unknown"))
            .collect();

        let result = if categories.len() < 2 {
            ValidationResult::new(
                ValidationLevel::Warning,
                "menu_composition",
                "⚠️ Мало разнообразия в меню".to_string(),
                "Добавьте блюда из разных категорий".to_string(),
            )
        } else {
            ValidationResult::new(
                ValidationLevel::Info,
                "menu_composition",
                format!("✅ Разнообразное меню: {} категорий", categories.len()),
                "Хорошее разнообразие блюд".to_string(),
            )
        };
        vec![result]
    }
}

/// The five validators in evaluation order.
pub fn default_validators() -> Vec<Box<dyn Validator>> {
    vec![
        Box::new(PortionValidator),
        Box::new(CostValidator),
        Box::new(ServiceValidator),
        Box::new(TimingValidator),
        Box::new(MenuValidator),
    ]
}
