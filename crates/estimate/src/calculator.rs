//! Service cost and portion calculations.

use serde::{Deserialize, Serialize};

use crate::models::{EventType, ServiceCalculation};
use crate::standards::BusinessStandards;

/// Outcome of a grams-per-guest check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortionCheck {
    pub valid: bool,
    /// `optimal` or `warning`.
    pub status: String,
    pub message: String,
    pub recommendation: String,
}

/// Breakdown of waiter and delivery costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceQuote {
    pub waiters_count: u32,
    pub hours: f64,
    pub cost_per_waiter: u64,
    pub delivery_cost: u64,
    pub total_cost: u64,
    pub description: String,
}

impl ServiceQuote {
    pub fn to_calculation(&self) -> ServiceCalculation {
        ServiceCalculation {
            service_details: self.description.clone(),
            total_service_cost: self.total_cost,
            waiters_count: (self.waiters_count > 0).then_some(self.waiters_count),
        }
    }
}

pub struct ServiceCalculator<'a> {
    standards: &'a BusinessStandards,
}

impl<'a> ServiceCalculator<'a> {
    pub fn new(standards: &'a BusinessStandards) -> Self {
        Self { standards }
    }

    /// One waiter's shift: base price up to the base shift, plus the hourly rate prorated over extra time.
    pub fn waiter_cost(&self, hours: f64) -> u64 {
        let base_hours = self.standards.base_shift_hours as f64;
        if hours <= base_hours {
            self.standards.waiter_cost_base
        } else {
            let extra = (hours - base_hours) * self.standards.waiter_cost_hourly as f64;
            self.standards.waiter_cost_base + extra.round() as u64
        }
    }

    pub fn delivery_cost(&self, outside_mkad: bool) -> u64 {
        if outside_mkad {
            self.standards.delivery_cost_outside
        } else {
            self.standards.delivery_cost_mkad
        }
    }

    pub fn waiters_needed(&self, guests: u32) -> u32 {
        (guests / self.standards.waiter_ratio_simple.max(1)).max(1)
    }

    /// Waiters plus delivery. Zero-cost quote when service is not needed.
    pub fn service_quote(
        &self,
        guests: u32,
        hours: Option<f64>,
        need_service: bool,
        outside_mkad: bool,
    ) -> ServiceQuote {
        let hours = hours
            .filter(|h| *h > 0.0)
            .unwrap_or(self.standards.base_shift_hours as f64);

        if !need_service {
            return ServiceQuote {
                waiters_count: 0,
                hours,
                cost_per_waiter: 0,
                delivery_cost: 0,
                total_cost: 0,
                description: "Обслуживание не требуется".to_string(),
            };
        }

        let waiters = self.waiters_needed(guests);
        let per_waiter = self.waiter_cost(hours);
        let delivery = self.delivery_cost(outside_mkad);
        let total = waiters as u64 * per_waiter + delivery;

        let mut description = format!(
            "Официанты: {} x {} руб. ({} ч)",
            waiters, per_waiter, hours
        );
        if delivery > 0 {
            description.push_str(&format!("\nДоставка за МКАД: {} руб.", delivery));
        }

        ServiceQuote {
            waiters_count: waiters,
            hours,
            cost_per_waiter: per_waiter,
            delivery_cost: delivery,
            total_cost: total,
            description,
        }
    }

    pub fn check_portion(&self, event_type: EventType, grams_per_guest: f64) -> PortionCheck {
        let standard = self.standards.portion_standards.get(event_type);
        if grams_per_guest < standard.min as f64 {
            PortionCheck {
                valid: false,
                status: "warning".to_string(),
                message: format!("Недостаточно еды: {}г", grams_per_guest),
                recommendation: format!(
                    "Добавьте еще {:.1}г",
                    standard.min as f64 - grams_per_guest
                ),
            }
        } else if grams_per_guest > standard.max as f64 {
            PortionCheck {
                valid: true,
                status: "warning".to_string(),
                message: format!("Много еды: {}г", grams_per_guest),
                recommendation: "Можно уменьшить количество".to_string(),
            }
        } else {
            PortionCheck {
                valid: true,
                status: "optimal".to_string(),
                message: format!("Оптимальная граммовка: {}г", grams_per_guest),
                recommendation: "Идеально!".to_string(),
            }
        }
    }
}
