//! Estimate conversation: request → clarifications → budget → proposal → edits → quote.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use estimate::{
    format_for_telegram, generate_order_number, write_quote, EventDetails, OrderStatus, Proposal,
};
use experts::{missing_info_question, EstimateExpert};
use restdel_core::{Bot, Chat, Handler, HandlerResponse, Message, RestdelError, Result, RichMessage};
use storage::{EstimateRecord, EstimateRepository};
use tokio::sync::OwnedMutexGuard;
use tracing::{error, info, instrument, warn};

use super::texts::*;
use crate::session::{ConversationState, Session, SessionStore};

type SessionGuard = OwnedMutexGuard<Session>;

/// Drives the per-chat conversation. Stops the chain for every message it answers.
pub struct EstimateHandler {
    bot: Arc<dyn Bot>,
    expert: Arc<EstimateExpert>,
    repo: EstimateRepository,
    sessions: Arc<SessionStore>,
    quotes_dir: PathBuf,
}

impl EstimateHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        expert: Arc<EstimateExpert>,
        repo: EstimateRepository,
        sessions: Arc<SessionStore>,
        quotes_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            bot,
            expert,
            repo,
            sessions,
            quotes_dir: quotes_dir.into(),
        }
    }

    async fn say(&self, chat: &Chat, text: &str) -> Result<HandlerResponse> {
        self.bot.send_message(chat, text).await?;
        Ok(HandlerResponse::Reply(text.to_string()))
    }

    /// Edits the message with the pressed button; sends a new one when the edit is rejected.
    async fn edit_or_say(&self, chat: &Chat, message_id: &str, text: &str) -> Result<HandlerResponse> {
        if let Err(e) = self.bot.edit_message(chat, message_id, text).await {
            warn!(error = %e, chat_id = chat.id, "Edit failed, sending a new message");
            self.bot.send_message(chat, text).await?;
        }
        Ok(HandlerResponse::Reply(text.to_string()))
    }

    async fn delete_quietly(&self, chat: &Chat, message_id: &str) {
        if let Err(e) = self.bot.delete_message(chat, message_id).await {
            warn!(error = %e, chat_id = chat.id, "Failed to delete status message");
        }
    }

    async fn send_proposal(&self, chat: &Chat, proposal: &Proposal) -> Result<()> {
        let formatted = format_for_telegram(proposal);
        let message = RichMessage {
            html: formatted.html,
            plain: formatted.plain,
            keyboard: Some(proposal_keyboard()),
        };
        self.bot.send_rich(chat, &message).await
    }

    async fn start_new(&self, chat: &Chat, session: &mut SessionGuard) -> Result<HandlerResponse> {
        session.reset();
        session.state = ConversationState::WaitingForRequest;
        self.say(chat, NEW_REQUEST).await
    }

    async fn on_command(
        &self,
        command: &str,
        chat: &Chat,
        session: &mut SessionGuard,
    ) -> Result<HandlerResponse> {
        match command {
            "start" => {
                session.reset();
                self.say(chat, START).await
            }
            "help" => self.say(chat, HELP).await,
            "new" => self.start_new(chat, session).await,
            "cancel" => {
                session.reset();
                self.say(chat, CANCELLED).await
            }
            _ => self.say(chat, IDLE_HINT).await,
        }
    }

    async fn on_text(
        &self,
        message: &Message,
        session: &mut SessionGuard,
    ) -> Result<HandlerResponse> {
        let chat = &message.chat;
        let text = message.content.trim();
        if text.is_empty() {
            return Ok(HandlerResponse::Ignore);
        }

        match session.state {
            ConversationState::Idle => self.say(chat, IDLE_HINT).await,
            ConversationState::WaitingForRequest => {
                session.request = text.to_string();
                self.details_flow(chat, session).await
            }
            ConversationState::WaitingForDetails => {
                session.append_request(text);
                self.details_flow(chat, session).await
            }
            ConversationState::WaitingForBudget => self.on_budget(chat, text, session).await,
            ConversationState::ConfirmingProposal => self.say(chat, CHOOSE_ACTION).await,
            ConversationState::EditingProposal => self.edits_flow(chat, text, session).await,
        }
    }

    /// Analyses the accumulated request and asks for whatever is still missing.
    #[instrument(skip_all, fields(chat_id = chat.id))]
    async fn details_flow(&self, chat: &Chat, session: &mut SessionGuard) -> Result<HandlerResponse> {
        let status_id = self.bot.send_message_and_return_id(chat, ANALYZING).await?;
        let analysis = self.expert.analyze_request(&session.request).await;
        self.delete_quietly(chat, &status_id).await;

        let details = match analysis {
            Ok(details) => details,
            Err(e) => {
                error!(error = %e, "Request analysis failed");
                return self.say(chat, ANALYSIS_FAILED).await;
            }
        };

        if !details.missing_info.is_empty() {
            let question = missing_info_question(&details.missing_info);
            session.details = Some(details);
            session.state = ConversationState::WaitingForDetails;
            info!(state = %session.state, "step: asking for missing info");
            return self.say(chat, &question).await;
        }

        let has_budget = details.budget_limit.is_some_and(|b| b > 0);
        session.details = Some(details);
        if !has_budget {
            session.state = ConversationState::WaitingForBudget;
            info!(state = %session.state, "step: asking for budget");
            return self.say(chat, ASK_BUDGET).await;
        }
        self.proposal_flow(chat, session).await
    }

    async fn on_budget(
        &self,
        chat: &Chat,
        text: &str,
        session: &mut SessionGuard,
    ) -> Result<HandlerResponse> {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        let Some(budget) = digits.parse::<u64>().ok().filter(|b| *b > 0) else {
            return self.say(chat, BUDGET_DIGITS).await;
        };
        session
            .details
            .get_or_insert_with(EventDetails::default)
            .budget_limit = Some(budget);
        info!(chat_id = chat.id, budget, "step: budget received");
        self.proposal_flow(chat, session).await
    }

    #[instrument(skip_all, fields(chat_id = chat.id))]
    async fn proposal_flow(&self, chat: &Chat, session: &mut SessionGuard) -> Result<HandlerResponse> {
        let status_id = self.bot.send_message_and_return_id(chat, PROCESSING).await?;
        let details = session.details.clone().unwrap_or_default();

        match self.expert.generate_proposal(&details, None, None).await {
            Ok(proposal) => {
                self.delete_quietly(chat, &status_id).await;
                self.send_proposal(chat, &proposal).await?;
                session.proposal = Some(proposal);
                session.state = ConversationState::ConfirmingProposal;
                info!(state = %session.state, "step: proposal sent");
                Ok(HandlerResponse::Stop)
            }
            Err(e) => {
                error!(error = %e, "Proposal generation failed");
                session.reset();
                self.edit_or_say(chat, &status_id, PROPOSAL_FAILED).await
            }
        }
    }

    #[instrument(skip_all, fields(chat_id = chat.id))]
    async fn edits_flow(
        &self,
        chat: &Chat,
        edits: &str,
        session: &mut SessionGuard,
    ) -> Result<HandlerResponse> {
        self.bot.send_message(chat, APPLYING_EDITS).await?;
        let details = session.details.clone().unwrap_or_default();

        let revised = self
            .expert
            .generate_proposal(&details, session.proposal.as_ref(), Some(edits))
            .await;
        match revised {
            Ok(proposal) => {
                self.send_proposal(chat, &proposal).await?;
                session.proposal = Some(proposal);
                session.state = ConversationState::ConfirmingProposal;
                info!(state = %session.state, "step: revised proposal sent");
                Ok(HandlerResponse::Stop)
            }
            Err(e) => {
                error!(error = %e, "Proposal revision failed");
                self.say(chat, EDITS_FAILED).await
            }
        }
    }

    async fn on_callback(
        &self,
        message: &Message,
        session: &mut SessionGuard,
    ) -> Result<HandlerResponse> {
        let chat = &message.chat;
        match message.content.as_str() {
            CB_CANCEL => {
                session.reset();
                self.edit_or_say(chat, &message.id, CANCELLED).await
            }
            CB_NEW_QUOTE => self.start_new(chat, session).await,
            CB_EDIT if session.state == ConversationState::ConfirmingProposal => {
                session.state = ConversationState::EditingProposal;
                self.edit_or_say(chat, &message.id, EDIT_PROMPT).await
            }
            CB_ACCEPT if session.state == ConversationState::ConfirmingProposal => {
                self.accept(message, session).await
            }
            CB_EDIT | CB_ACCEPT => self.say(chat, STALE_PROPOSAL).await,
            other => {
                warn!(chat_id = chat.id, data = %other, "Unknown callback data");
                Ok(HandlerResponse::Ignore)
            }
        }
    }

    /// Persists the accepted proposal, writes the quote file and sends it.
    #[instrument(skip_all, fields(chat_id = message.chat.id))]
    async fn accept(&self, message: &Message, session: &mut SessionGuard) -> Result<HandlerResponse> {
        let chat = &message.chat;
        self.edit_or_say(chat, &message.id, ACCEPTING).await?;

        let details = session.details.clone().unwrap_or_default();
        let Some(proposal) = session.proposal.clone() else {
            session.reset();
            return self.say(chat, STALE_PROPOSAL).await;
        };

        match self.create_quote(message, &details, &proposal).await {
            Ok((order_number, path)) => {
                let caption = quote_caption(&order_number, proposal.total_cost());
                self.bot
                    .send_document(chat, &path, &caption, Some(&new_quote_keyboard()))
                    .await?;
                session.reset();
                info!(order_number = %order_number, "step: quote delivered");
                Ok(HandlerResponse::Reply(caption))
            }
            Err(e) => {
                error!(error = %e, "Quote creation failed");
                self.say(chat, QUOTE_FAILED).await
            }
        }
    }

    async fn create_quote(
        &self,
        message: &Message,
        details: &EventDetails,
        proposal: &Proposal,
    ) -> Result<(String, PathBuf)> {
        let now = Local::now();
        let order_number = generate_order_number(now);
        let path = write_quote(&self.quotes_dir, &order_number, details, proposal, now.date_naive())
            .map_err(|e| RestdelError::Io(std::io::Error::other(e.to_string())))?;

        let record = estimate_record(&order_number, message, details, proposal, &path)?;
        self.repo
            .save(&record)
            .await
            .map_err(|e| RestdelError::Database(e.to_string()))?;
        Ok((order_number, path))
    }
}

/// Completed estimate row for an accepted proposal.
fn estimate_record(
    order_number: &str,
    message: &Message,
    details: &EventDetails,
    proposal: &Proposal,
    quote_path: &std::path::Path,
) -> Result<EstimateRecord> {
    let to_json = |value: serde_json::Result<String>| value.map_err(|e| RestdelError::Unknown(e.to_string()));
    Ok(EstimateRecord {
        event_type: details.event_kind().as_str().to_string(),
        guests: i64::from(details.planned_guests()),
        event_date: details.event_date.clone(),
        menu_cost: proposal.total_menu_price() as i64,
        service_cost: proposal.service_cost() as i64,
        total_cost: proposal.total_cost() as i64,
        status: OrderStatus::Completed.as_str().to_string(),
        details_json: to_json(serde_json::to_string(details))?,
        proposal_json: to_json(serde_json::to_string(proposal))?,
        quote_file: Some(quote_path.display().to_string()),
        ..EstimateRecord::new(order_number, message.chat.id, message.user.id)
    })
}

#[async_trait]
impl Handler for EstimateHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let mut session = self.sessions.lock(message.chat.id).await;
        let state_before = session.state;

        let response = if message.is_callback() {
            self.on_callback(message, &mut session).await
        } else if let Some(command) = message.command() {
            self.on_command(command, &message.chat, &mut session).await
        } else {
            self.on_text(message, &mut session).await
        };

        if session.state != state_before {
            info!(from = %state_before, to = %session.state, "step: conversation state changed");
        }
        response
    }
}

