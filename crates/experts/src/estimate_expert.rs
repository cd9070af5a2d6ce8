use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use estimate::{
    keyword_analysis, BusinessRulesEngine, BusinessStandards, EventDetails, MenuCatalog, Proposal,
    ProposalPlanner, ServiceCalculator,
};
use llm_client::{extract_json_as, ChatMessage, LlmClient};
use tracing::{info, instrument, warn};

use crate::prompts::{analysis_request, ProposalPrompt, ANALYSIS_SYSTEM_PROMPT, PROPOSAL_SYSTEM_PROMPT};

/// Analyses client requests and composes menu proposals with the language model.
///
/// With fallbacks enabled, a failed analysis falls back to keyword extraction and a failed proposal
/// to [`ProposalPlanner`]. Every returned proposal has its totals and service block recomputed locally
/// and carries the rules engine findings in `warnings`.
pub struct EstimateExpert {
    llm: Arc<dyn LlmClient>,
    menu: Arc<MenuCatalog>,
    engine: BusinessRulesEngine,
    menu_json: String,
    enable_fallbacks: bool,
}

impl EstimateExpert {
    pub fn new(llm: Arc<dyn LlmClient>, menu: Arc<MenuCatalog>, standards: BusinessStandards) -> Self {
        let menu_json = menu.to_prompt_json();
        Self {
            llm,
            menu,
            engine: BusinessRulesEngine::new(standards),
            menu_json,
            enable_fallbacks: true,
        }
    }

    pub fn with_fallbacks(mut self, enable: bool) -> Self {
        self.enable_fallbacks = enable;
        self
    }

    pub fn standards(&self) -> &BusinessStandards {
        self.engine.standards()
    }

    pub fn engine(&self) -> &BusinessRulesEngine {
        &self.engine
    }

    pub fn menu(&self) -> &MenuCatalog {
        &self.menu
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn analyze_request(&self, text: &str) -> Result<EventDetails> {
        let messages = vec![
            ChatMessage::system(ANALYSIS_SYSTEM_PROMPT),
            ChatMessage::user(analysis_request(text)),
        ];

        let mut details = match self.ask::<EventDetails>(messages).await {
            Ok(details) => details,
            Err(e) if self.enable_fallbacks => {
                warn!(error = %e, "step: analysis failed, using keyword fallback");
                return Ok(keyword_analysis(text));
            }
            Err(e) => return Err(e.context("Request analysis failed")),
        };

        if details.guests_count.is_none() && !details.missing_info.iter().any(|k| k == "guests_count") {
            details.missing_info.push("guests_count".to_string());
        }

        info!(
            event_type = details.event_type.as_deref().unwrap_or("-"),
            guests = details.guests_count,
            budget = details.budget_limit,
            missing = details.missing_info.len(),
            "step: request analysed"
        );
        Ok(details)
    }

    /// Builds a proposal for `details`. With `previous` and `edits` the model revises the previous one.
    #[instrument(skip_all, fields(revision = previous.is_some()))]
    pub async fn generate_proposal(
        &self,
        details: &EventDetails,
        previous: Option<&Proposal>,
        edits: Option<&str>,
    ) -> Result<Proposal> {
        let mut proposal = match self.ask_proposal(details, previous, edits).await {
            Ok(p) => p,
            Err(e) if self.enable_fallbacks => {
                warn!(error = %e, "step: proposal generation failed, using planner");
                ProposalPlanner::new(&self.menu, self.standards()).plan(details)
            }
            Err(e) => return Err(e.context("Proposal generation failed")),
        };

        self.finalize(&mut proposal, details);
        info!(
            items = proposal.item_count(),
            total_cost = proposal.total_cost(),
            warnings = proposal.warnings.len(),
            "step: proposal ready"
        );
        Ok(proposal)
    }

    /// Recomputes totals and the service block, then attaches the rules engine findings.
    pub fn finalize(&self, proposal: &mut Proposal, details: &EventDetails) {
        let guests = details.planned_guests();
        let service = ServiceCalculator::new(self.standards()).service_quote(
            guests,
            details.duration_hours,
            details.wants_service(),
            details.is_outside_mkad(),
        );
        proposal.recalculate(guests, Some(service.to_calculation()));

        let report = self.engine.validate_order(&proposal.to_order_data(details, None));
        proposal.apply_report(&report);
    }

    async fn ask_proposal(
        &self,
        details: &EventDetails,
        previous: Option<&Proposal>,
        edits: Option<&str>,
    ) -> Result<Proposal> {
        let details_json = serde_json::to_string(details)?;
        let previous_json = previous.map(serde_json::to_string).transpose()?;
        let prompt = ProposalPrompt {
            standards: self.standards(),
            event_details_json: &details_json,
            menu_json: &self.menu_json,
            previous_json: previous_json.as_deref(),
            edits,
        }
        .render();

        let messages = vec![
            ChatMessage::system(PROPOSAL_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ];
        let proposal: Proposal = self.ask(messages).await?;
        if proposal.is_empty() {
            return Err(anyhow!("Model proposal has no menu items"));
        }
        Ok(proposal)
    }

    async fn ask<T: serde::de::DeserializeOwned>(&self, messages: Vec<ChatMessage>) -> Result<T> {
        let reply = self
            .llm
            .get_llm_response_with_messages(messages)
            .await
            .context("LLM call failed")?;
        extract_json_as(&reply)
    }
}
