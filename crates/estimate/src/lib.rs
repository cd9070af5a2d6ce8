//! # Estimate
//!
//! Domain of catering estimates: menu catalog, business standards, the rules engine that validates an
//! order, service cost calculator, deterministic proposal planner, Telegram formatting and CSV quotes.
//!
//! Nothing here performs network I/O. File access is limited to the menu JSON and the quotes directory.

pub mod analysis;
pub mod calculator;
pub mod error;
pub mod format;
pub mod menu;
pub mod models;
pub mod planner;
pub mod proposal;
pub mod quote;
pub mod rules;
pub mod standards;
pub mod validators;

pub use analysis::keyword_analysis;
pub use calculator::{PortionCheck, ServiceCalculator, ServiceQuote};
pub use error::{EstimateError, Result};
pub use format::{escape_html, format_for_telegram, group_thousands, FormattedProposal};
pub use menu::MenuCatalog;
pub use models::{
    EventDetails, EventType, DEFAULT_GUESTS, MenuCategory, MenuItem, Nutrition, OrderData, OrderInfo,
    OrderMenuItem, OrderService, OrderStatus, OrderTotals, Proposal, ProposalCategory,
    ProposalItem, ProposalSummary, ServiceCalculation,
};
pub use planner::ProposalPlanner;
pub use quote::{cleanup_old_quotes, generate_order_number, quote_file_name, write_quote};
pub use rules::{BusinessRulesEngine, LevelCounts, OverallStatus, ValidationReport, ValidationSummary};
pub use standards::{BusinessStandards, CostRange, PerEvent, PortionStandard, TimingRequirements};
pub use validators::{ValidationContext, ValidationLevel, ValidationResult, Validator};
