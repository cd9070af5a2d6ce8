//! Per-chat conversation sessions.
//!
//! Each chat has one [`Session`] behind an async mutex; a handler holds the lock for the whole update,
//! so updates of one chat are processed one at a time. Sessions idle longer than the TTL start over.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use estimate::{EventDetails, Proposal};
use tracing::{debug, info};

/// Where the chat is in the estimate conversation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConversationState {
    #[default]
    Idle,
    WaitingForRequest,
    WaitingForDetails,
    WaitingForBudget,
    ConfirmingProposal,
    EditingProposal,
}

impl ConversationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::Idle => "idle",
            ConversationState::WaitingForRequest => "waiting_for_request",
            ConversationState::WaitingForDetails => "waiting_for_details",
            ConversationState::WaitingForBudget => "waiting_for_budget",
            ConversationState::ConfirmingProposal => "confirming_proposal",
            ConversationState::EditingProposal => "editing_proposal",
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct Session {
    pub state: ConversationState,
    /// Client's request text; follow-up answers are appended with ". ".
    pub request: String,
    pub details: Option<EventDetails>,
    pub proposal: Option<Proposal>,
    last_active: Instant,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: ConversationState::Idle,
            request: String::new(),
            details: None,
            proposal: None,
            last_active: Instant::now(),
        }
    }
}

impl Session {
    /// Clears all data and returns to idle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn append_request(&mut self, text: &str) {
        let text = text.trim();
        if self.request.is_empty() {
            self.request = text.to_string();
        } else {
            self.request = format!("{}. {}", self.request, text);
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_active.elapsed() > ttl
    }
}

pub type SharedSession = Arc<tokio::sync::Mutex<Session>>;

pub struct SessionStore {
    sessions: Mutex<HashMap<i64, SharedSession>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the chat's session, creating it when missing.
    pub fn get(&self, chat_id: i64) -> SharedSession {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.entry(chat_id).or_default().clone()
    }

    /// Locks the chat's session. An expired session is reset first.
    pub async fn lock(&self, chat_id: i64) -> tokio::sync::OwnedMutexGuard<Session> {
        let mut session = self.get(chat_id).lock_owned().await;
        if session.is_expired(self.ttl) {
            debug!(chat_id, state = %session.state, "Session expired, starting over");
            session.reset();
        }
        session.touch();
        session
    }

    /// Drops sessions idle longer than the TTL. Sessions in use are kept.
    pub fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        let before = sessions.len();
        // Another reference means an update took the session from `get` and may still lock it.
        sessions.retain(|_, session| {
            if Arc::strong_count(session) > 1 {
                return true;
            }
            match session.try_lock() {
                Ok(s) => !s.is_expired(self.ttl),
                Err(_) => true,
            }
        });
        let removed = before - sessions.len();
        if removed > 0 {
            info!(removed, remaining = sessions.len(), "Expired sessions purged");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_request() {
        let mut session = Session::default();
        session.append_request("Фуршет на 30 человек");
        session.append_request(" 15 июня ");
        assert_eq!(session.request, "Фуршет на 30 человек. 15 июня");
    }

    #[tokio::test]
    async fn test_expired_session_is_reset_and_purged() {
        let store = SessionStore::new(Duration::from_millis(20));
        {
            let mut session = store.lock(1).await;
            session.state = ConversationState::WaitingForBudget;
            session.request = "Банкет".to_string();
        }
        tokio::time::sleep(Duration::from_millis(40)).await;

        let session = store.lock(1).await;
        assert_eq!(session.state, ConversationState::Idle);
        assert!(session.request.is_empty());
        drop(session);

        tokio::time::sleep(Duration::from_millis(40)).await;
        store.lock(2).await.touch();
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_purge_keeps_session_handed_out() {
        let store = SessionStore::new(Duration::from_millis(20));
        let pending = store.get(1);
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(store.purge_expired(), 0);
        pending.lock().await.state = ConversationState::WaitingForRequest;
        assert!(Arc::ptr_eq(&pending, &store.get(1)));
        drop(pending);

        assert_eq!(store.purge_expired(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_same_chat_shares_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        store.lock(7).await.state = ConversationState::WaitingForRequest;
        assert_eq!(store.lock(7).await.state, ConversationState::WaitingForRequest);
        assert_eq!(store.lock(8).await.state, ConversationState::Idle);
    }
}
