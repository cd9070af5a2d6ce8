//! Business rules engine: runs every validator and folds the findings into a report.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::OrderData;
use crate::standards::BusinessStandards;
use crate::validators::{
    default_validators, ValidationContext, ValidationLevel, ValidationResult, Validator,
};

/// Warnings on these fields make the whole order a warning; others leave it valid.
const CRITICAL_WARNING_FIELDS: [&str; 3] = ["portion_size", "total_cost", "waiter_count"];
const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Valid,
    Warning,
    Error,
    Critical,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Valid => "valid",
            OverallStatus::Warning => "warning",
            OverallStatus::Error => "error",
            OverallStatus::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCounts {
    pub info: usize,
    pub warning: usize,
    pub error: usize,
    pub critical: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_validations: usize,
    pub by_level: LevelCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub overall_status: OverallStatus,
    pub validations: Vec<ValidationResult>,
    pub summary: ValidationSummary,
    pub recommendations: Vec<String>,
}

impl ValidationReport {
    /// Messages of warning, error and critical findings in order.
    pub fn problem_messages(&self) -> impl Iterator<Item = &str> {
        self.validations
            .iter()
            .filter(|v| v.level != ValidationLevel::Info)
            .map(|v| v.message.as_str())
    }
}

pub struct BusinessRulesEngine {
    standards: BusinessStandards,
    validators: Vec<Box<dyn Validator>>,
}

impl BusinessRulesEngine {
    pub fn new(standards: BusinessStandards) -> Self {
        Self {
            standards,
            validators: default_validators(),
        }
    }

    pub fn standards(&self) -> &BusinessStandards {
        &self.standards
    }

    /// Validates against the current local time.
    pub fn validate_order(&self, order: &OrderData) -> ValidationReport {
        self.validate_order_at(order, Local::now().naive_local())
    }

    pub fn validate_order_at(&self, order: &OrderData, now: NaiveDateTime) -> ValidationReport {
        let ctx = ValidationContext {
            standards: &self.standards,
            now,
        };

        let mut validations = Vec::new();
        for validator in &self.validators {
            let found = validator.validate(order, &ctx);
            debug!(validator = validator.name(), count = found.len(), "Validator finished");
            validations.extend(found);
        }

        let overall_status = overall_status(&validations);
        let by_level = count_by_level(&validations);
        let recommendations = collect_recommendations(&validations);

        info!(
            order_number = order.order_info.number.as_deref().unwrap_or("-"),
            status = overall_status.as_str(),
            total = validations.len(),
            "step: order validated"
        );

        ValidationReport {
            overall_status,
            summary: ValidationSummary {
                total_validations: validations.len(),
                by_level,
            },
            validations,
            recommendations,
        }
    }
}

fn overall_status(validations: &[ValidationResult]) -> OverallStatus {
    let has = |level| validations.iter().any(|v| v.level == level);
    if has(ValidationLevel::Critical) {
        OverallStatus::Critical
    } else if has(ValidationLevel::Error) {
        OverallStatus::Error
    } else if validations.iter().any(|v| {
        v.level == ValidationLevel::Warning && CRITICAL_WARNING_FIELDS.contains(&v.field.as_str())
    }) {
        OverallStatus::Warning
    } else {
        OverallStatus::Valid
    }
}

fn count_by_level(validations: &[ValidationResult]) -> LevelCounts {
    let mut counts = LevelCounts::default();
    for v in validations {
        match v.level {
            ValidationLevel::Info => counts.info += 1,
            ValidationLevel::Warning => counts.warning += 1,
            ValidationLevel::Error => counts.error += 1,
            ValidationLevel::Critical => counts.critical += 1,
        }
    }
    counts
}

/// Critical and error recommendations first, then distinct warning ones; at most five.
fn collect_recommendations(validations: &[ValidationResult]) -> Vec<String> {
    let mut out: Vec<String> = validations
        .iter()
        .filter(|v| matches!(v.level, ValidationLevel::Critical | ValidationLevel::Error))
        .filter_map(|v| v.recommendation.clone())
        .collect();

    for v in validations.iter().filter(|v| v.level == ValidationLevel::Warning) {
        if let Some(rec) = &v.recommendation {
            if !out.contains(rec) {
                out.push(rec.clone());
            }
        }
    }

    out.truncate(MAX_RECOMMENDATIONS);
    out
}
