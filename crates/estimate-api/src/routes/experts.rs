//! Language-model experts over HTTP: request analysis, proposal generation and revision, budget variants.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use estimate::{
    format_for_telegram, group_thousands, EventDetails, OverallStatus, Proposal, ProposalPlanner,
};
use experts::{missing_info_question, translate_missing_info, EstimateExpert};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// Budget variants around a target, in percent of it.
const BUDGET_VARIANTS: [(&str, u64); 3] = [("economy", 80), ("target", 100), ("extended", 120)];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/conversation/analyze", post(analyze))
        .route("/estimate/generate", post(generate))
        .route("/estimate/refine", post(refine))
        .route("/budget/optimize", post(optimize_budget))
        .route("/budget/alternatives", post(budget_alternatives))
}

#[derive(Debug, Deserialize)]
pub struct ContextMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ConversationRequest {
    pub user_input: String,
    /// Earlier turns of the conversation; only the client's messages are used.
    #[serde(default)]
    pub context: Option<Vec<ContextMessage>>,
}

impl ConversationRequest {
    /// Earlier client messages and the new input, joined the way the bot accumulates answers.
    fn request_text(&self) -> Result<String, ApiError> {
        let input = non_empty("user_input", &self.user_input)?;
        let mut parts: Vec<&str> = self
            .context
            .iter()
            .flatten()
            .filter(|m| m.role == "user")
            .map(|m| m.content.trim())
            .filter(|c| !c.is_empty())
            .collect();
        parts.push(input);
        Ok(parts.join(". "))
    }
}

#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    pub details: EventDetails,
    pub proposal: Proposal,
    pub refinement_request: String,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    #[serde(default)]
    pub details: EventDetails,
    pub proposal: Proposal,
    pub target_budget: u64,
}

#[derive(Debug, Deserialize)]
pub struct AlternativesRequest {
    #[serde(default)]
    pub details: EventDetails,
    pub target_budget: u64,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub details: EventDetails,
    /// Missing fields in client wording.
    pub missing_info: Vec<String>,
    /// Question the bot would ask; absent when nothing is missing.
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProposalResponse {
    pub details: EventDetails,
    pub proposal: Proposal,
    pub total_cost: u64,
    pub formatted: String,
}

impl ProposalResponse {
    fn new(details: EventDetails, proposal: Proposal) -> Self {
        Self {
            total_cost: proposal.total_cost(),
            formatted: format_for_telegram(&proposal).plain,
            details,
            proposal,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BudgetAlternative {
    pub label: &'static str,
    pub budget: u64,
    pub total_cost: u64,
    pub status: OverallStatus,
    pub proposal: Proposal,
}

#[derive(Debug, Serialize)]
pub struct AlternativesResponse {
    pub target_budget: u64,
    pub alternatives: Vec<BudgetAlternative>,
}

fn non_empty<'a>(name: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ApiError::Validation(format!("{} must not be empty", name)))
    } else {
        Ok(value)
    }
}

fn positive_budget(target_budget: u64) -> Result<u64, ApiError> {
    if target_budget == 0 {
        Err(ApiError::Validation("target_budget must be positive".to_string()))
    } else {
        Ok(target_budget)
    }
}

fn expert(state: &AppState) -> Result<Arc<EstimateExpert>, ApiError> {
    state
        .expert
        .clone()
        .ok_or_else(|| ApiError::Unavailable("Experts are not configured".to_string()))
}

async fn analyze(
    State(state): State<AppState>,
    request: Result<Json<ConversationRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let Json(request) = request?;
    let text = request.request_text()?;
    let details = expert(&state)?.analyze_request(&text).await?;

    Ok(Json(AnalysisResponse {
        missing_info: translate_missing_info(&details.missing_info),
        question: (!details.missing_info.is_empty())
            .then(|| missing_info_question(&details.missing_info)),
        details,
    }))
}

async fn generate(
    State(state): State<AppState>,
    request: Result<Json<ConversationRequest>, JsonRejection>,
) -> Result<Json<ProposalResponse>, ApiError> {
    let Json(request) = request?;
    let text = request.request_text()?;
    let expert = expert(&state)?;

    let details = expert.analyze_request(&text).await?;
    let proposal = expert.generate_proposal(&details, None, None).await?;
    info!(total_cost = proposal.total_cost(), "Estimate generated over API");
    Ok(Json(ProposalResponse::new(details, proposal)))
}

async fn refine(
    State(state): State<AppState>,
    request: Result<Json<RefineRequest>, JsonRejection>,
) -> Result<Json<ProposalResponse>, ApiError> {
    let Json(request) = request?;
    let edits = non_empty("refinement_request", &request.refinement_request)?;

    let proposal = expert(&state)?
        .generate_proposal(&request.details, Some(&request.proposal), Some(edits))
        .await?;
    Ok(Json(ProposalResponse::new(request.details, proposal)))
}

/// Revises the proposal to fit `target_budget`, service included.
async fn optimize_budget(
    State(state): State<AppState>,
    request: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<ProposalResponse>, ApiError> {
    let Json(request) = request?;
    let target = positive_budget(request.target_budget)?;
    let details = EventDetails {
        budget_limit: Some(target),
        ..request.details
    };
    let edits = format!(
        "Уложись в бюджет {} руб. вместе с обслуживанием",
        group_thousands(target as i64)
    );

    let proposal = expert(&state)?
        .generate_proposal(&details, Some(&request.proposal), Some(&edits))
        .await?;
    Ok(Json(ProposalResponse::new(details, proposal)))
}

/// Planner proposals at 80, 100 and 120 percent of the target. Works without a language model.
async fn budget_alternatives(
    State(state): State<AppState>,
    request: Result<Json<AlternativesRequest>, JsonRejection>,
) -> Result<Json<AlternativesResponse>, ApiError> {
    let Json(request) = request?;
    let target = positive_budget(request.target_budget)?;
    let planner = ProposalPlanner::new(&state.menu, state.standards());

    let alternatives = BUDGET_VARIANTS
        .iter()
        .map(|&(label, percent)| {
            let budget = target * percent / 100;
            let details = EventDetails {
                budget_limit: Some(budget),
                ..request.details.clone()
            };
            let mut proposal = planner.plan(&details);
            let report = state
                .engine
                .validate_order(&proposal.to_order_data(&details, None));
            proposal.apply_report(&report);
            BudgetAlternative {
                label,
                budget,
                total_cost: proposal.total_cost(),
                status: report.overall_status,
                proposal,
            }
        })
        .collect();

    Ok(Json(AlternativesResponse {
        target_budget: target,
        alternatives,
    }))
}
