//! Business standards of Rest Delivery: minimum order, portion sizes, service prices, notice periods.

use std::env;

use serde::Serialize;

use crate::error::{EstimateError, Result};
use crate::models::EventType;

/// Grams of food per guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortionStandard {
    pub min: u32,
    pub max: u32,
    pub optimal: u32,
}

/// Expected rubles per guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostRange {
    pub min: u32,
    pub max: u32,
}

/// Hours of notice before the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimingRequirements {
    pub no_service: u32,
    pub service_standard: u32,
    pub service_premium: u32,
}

/// One value per event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PerEvent<T> {
    pub coffee_break: T,
    pub buffet: T,
    pub banquet: T,
}

impl<T: Copy> PerEvent<T> {
    pub fn get(&self, event_type: EventType) -> T {
        match event_type {
            EventType::CoffeeBreak => self.coffee_break,
            EventType::Buffet => self.buffet,
            EventType::Banquet => self.banquet,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessStandards {
    pub min_order_amount: u64,
    pub portion_standards: PerEvent<PortionStandard>,
    /// Waiter shift price covering `base_shift_hours`.
    pub waiter_cost_base: u64,
    pub waiter_cost_hourly: u64,
    pub base_shift_hours: u32,
    pub taxi_surcharge: u64,
    /// Guests per waiter for simple and complex service.
    pub waiter_ratio_simple: u32,
    pub waiter_ratio_complex: u32,
    pub timing_requirements: TimingRequirements,
    /// Orders above this total with service need premium notice.
    pub premium_order_threshold: u64,
    pub cost_per_guest_ranges: PerEvent<CostRange>,
    pub delivery_cost_mkad: u64,
    pub delivery_cost_outside: u64,
    pub min_grammage_per_guest: u32,
    pub max_grammage_per_guest: u32,
}

impl Default for BusinessStandards {
    fn default() -> Self {
        Self {
            min_order_amount: 10_000,
            portion_standards: PerEvent {
                coffee_break: PortionStandard {
                    min: 250,
                    max: 300,
                    optimal: 275,
                },
                buffet: PortionStandard {
                    min: 250,
                    max: 423,
                    optimal: 335,
                },
                banquet: PortionStandard {
                    min: 600,
                    max: 1000,
                    optimal: 800,
                },
            },
            waiter_cost_base: 9_500,
            waiter_cost_hourly: 1_000,
            base_shift_hours: 6,
            taxi_surcharge: 1_500,
            waiter_ratio_simple: 30,
            waiter_ratio_complex: 15,
            timing_requirements: TimingRequirements {
                no_service: 24,
                service_standard: 48,
                service_premium: 72,
            },
            premium_order_threshold: 60_000,
            cost_per_guest_ranges: PerEvent {
                coffee_break: CostRange { min: 1_150, max: 1_700 },
                buffet: CostRange { min: 2_300, max: 3_300 },
                banquet: CostRange { min: 4_700, max: 8_600 },
            },
            delivery_cost_mkad: 0,
            delivery_cost_outside: 1_500,
            min_grammage_per_guest: 250,
            max_grammage_per_guest: 1_000,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl BusinessStandards {
    /// Defaults overridden by MIN_ORDER_AMOUNT, MIN/MAX_GRAMMAGE_PER_GUEST, WAITER_COST_BASE,
    /// WAITER_COST_HOURLY, DELIVERY_COST_MKAD, DELIVERY_COST_OUTSIDE. Validated before returning.
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        let standards = Self {
            min_order_amount: env_or("MIN_ORDER_AMOUNT", d.min_order_amount),
            min_grammage_per_guest: env_or("MIN_GRAMMAGE_PER_GUEST", d.min_grammage_per_guest),
            max_grammage_per_guest: env_or("MAX_GRAMMAGE_PER_GUEST", d.max_grammage_per_guest),
            waiter_cost_base: env_or("WAITER_COST_BASE", d.waiter_cost_base),
            waiter_cost_hourly: env_or("WAITER_COST_HOURLY", d.waiter_cost_hourly),
            delivery_cost_mkad: env_or("DELIVERY_COST_MKAD", d.delivery_cost_mkad),
            delivery_cost_outside: env_or("DELIVERY_COST_OUTSIDE", d.delivery_cost_outside),
            ..d
        };
        standards.validate()?;
        Ok(standards)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_order_amount == 0 {
            return Err(EstimateError::InvalidStandards(
                "MIN_ORDER_AMOUNT must be positive".to_string(),
            ));
        }
        if self.waiter_cost_base == 0 {
            return Err(EstimateError::InvalidStandards(
                "WAITER_COST_BASE must be positive".to_string(),
            ));
        }
        if self.min_grammage_per_guest >= self.max_grammage_per_guest {
            return Err(EstimateError::InvalidStandards(format!(
                "MIN_GRAMMAGE_PER_GUEST ({}) must be less than MAX_GRAMMAGE_PER_GUEST ({})",
                self.min_grammage_per_guest, self.max_grammage_per_guest
            )));
        }
        Ok(())
    }

    /// Portion standard for an event type string; unknown types use buffet.
    pub fn portion_for(&self, event_type: &str) -> PortionStandard {
        self.portion_standards
            .get(EventType::from_str_or_default(event_type))
    }

    /// Cost-per-guest range for an event type string; unknown types use buffet.
    pub fn cost_range_for(&self, event_type: &str) -> CostRange {
        self.cost_per_guest_ranges
            .get(EventType::from_str_or_default(event_type))
    }

    /// Required notice in hours.
    pub fn required_notice_hours(&self, has_service: bool, total_cost: f64) -> u32 {
        match (has_service, total_cost > self.premium_order_threshold as f64) {
            (false, _) => self.timing_requirements.no_service,
            (true, true) => self.timing_requirements.service_premium,
            (true, false) => self.timing_requirements.service_standard,
        }
    }
}
