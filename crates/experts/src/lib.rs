//! # Experts
//!
//! Language-model experts of the estimate flow: [`EstimateExpert::analyze_request`] turns a client's
//! free text into [`estimate::EventDetails`], [`EstimateExpert::generate_proposal`] composes a menu
//! proposal from the catalog. Both fall back to deterministic code when the model fails.

mod estimate_expert;
mod missing_info;
mod prompts;

pub use estimate_expert::EstimateExpert;
pub use missing_info::{missing_info_question, translate_key, translate_missing_info};
pub use prompts::{ANALYSIS_SYSTEM_PROMPT, PROPOSAL_SYSTEM_PROMPT};
