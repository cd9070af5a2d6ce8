//! Integration tests for [`handler_chain::HandlerChain`].
//!
//! Covers: phase ordering, `before` stopping the chain, Reply ending the handle phase, Ignore falling
//! through, and handler errors propagating to the caller.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use handler_chain::HandlerChain;
use restdel_core::{
    Chat, Handler, HandlerError, HandlerResponse, Message, MessageDirection, User,
    MESSAGE_TYPE_TEXT,
};

fn create_test_message(content: &str) -> Message {
    Message {
        id: "test_message_id".to_string(),
        content: content.to_string(),
        user: User {
            id: 123,
            username: Some("manager".to_string()),
            first_name: Some("Anna".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: 456,
            chat_type: "private".to_string(),
        },
        message_type: MESSAGE_TYPE_TEXT.to_string(),
        direction: MessageDirection::Incoming,
        created_at: Utc::now(),
    }
}

type Journal = Arc<Mutex<Vec<String>>>;

/// Records every phase call; `handle` returns the configured response.
struct Recorder {
    name: &'static str,
    allow: bool,
    response: HandlerResponse,
    journal: Journal,
}

impl Recorder {
    fn new(name: &'static str, response: HandlerResponse, journal: &Journal) -> Arc<Self> {
        Arc::new(Self {
            name,
            allow: true,
            response,
            journal: journal.clone(),
        })
    }

    fn blocking(name: &'static str, journal: &Journal) -> Arc<Self> {
        Arc::new(Self {
            name,
            allow: false,
            response: HandlerResponse::Continue,
            journal: journal.clone(),
        })
    }
}

#[async_trait]
impl Handler for Recorder {
    async fn before(&self, _message: &Message) -> restdel_core::Result<bool> {
        self.journal.lock().unwrap().push(format!("before_{}", self.name));
        Ok(self.allow)
    }

    async fn handle(&self, _message: &Message) -> restdel_core::Result<HandlerResponse> {
        self.journal.lock().unwrap().push(format!("handle_{}", self.name));
        Ok(self.response.clone())
    }

    async fn after(
        &self,
        _message: &Message,
        response: &HandlerResponse,
    ) -> restdel_core::Result<()> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("after_{}:{:?}", self.name, response));
        Ok(())
    }
}

/// **Test: Phases run before (in order) → handle (in order) → after (reverse).**
///
/// **Setup:** Two recorders that both return Continue.
/// **Action:** `chain.handle(&message)`.
/// **Expected:** Journal shows the full order; final response is Continue.
#[tokio::test]
async fn test_phase_order_with_continue() {
    let journal: Journal = Arc::default();
    let chain = HandlerChain::new()
        .add_handler(Recorder::new("log", HandlerResponse::Continue, &journal))
        .add_handler(Recorder::new("flow", HandlerResponse::Continue, &journal));

    let result = chain.handle(&create_test_message("hi")).await.unwrap();

    assert_eq!(result, HandlerResponse::Continue);
    assert_eq!(
        *journal.lock().unwrap(),
        vec![
            "before_log",
            "before_flow",
            "handle_log",
            "handle_flow",
            "after_flow:Continue",
            "after_log:Continue",
        ]
    );
}

/// **Test: A `before` returning false stops the chain; no handle, no after.**
#[tokio::test]
async fn test_before_false_stops_chain() {
    let journal: Journal = Arc::default();
    let chain = HandlerChain::new()
        .add_handler(Recorder::blocking("auth", &journal))
        .add_handler(Recorder::new("flow", HandlerResponse::Stop, &journal));

    let result = chain.handle(&create_test_message("hi")).await.unwrap();

    assert_eq!(result, HandlerResponse::Stop);
    assert_eq!(*journal.lock().unwrap(), vec!["before_auth"]);
}

/// **Test: Reply ends the handle phase and is passed to every after.**
///
/// **Setup:** Ignore handler, Reply handler, and a third handler that must not be reached.
/// **Expected:** Third handler's handle is skipped; after sees Reply("done").
#[tokio::test]
async fn test_reply_ends_handle_phase_and_reaches_after() {
    let journal: Journal = Arc::default();
    let chain = HandlerChain::new()
        .add_handler(Recorder::new("skip", HandlerResponse::Ignore, &journal))
        .add_handler(Recorder::new(
            "flow",
            HandlerResponse::Reply("done".to_string()),
            &journal,
        ))
        .add_handler(Recorder::new("late", HandlerResponse::Continue, &journal));

    let result = chain.handle(&create_test_message("hi")).await.unwrap();

    assert_eq!(result, HandlerResponse::Reply("done".to_string()));
    let journal = journal.lock().unwrap();
    assert!(!journal.contains(&"handle_late".to_string()));
    assert!(journal.contains(&"after_skip:Reply(\"done\")".to_string()));
    assert!(journal.contains(&"after_late:Reply(\"done\")".to_string()));
}

/// **Test: An error from handle is returned to the caller.**
#[tokio::test]
async fn test_handle_error_propagates() {
    struct Failing;

    #[async_trait]
    impl Handler for Failing {
        async fn handle(&self, _message: &Message) -> restdel_core::Result<HandlerResponse> {
            Err(HandlerError::State("broken session".to_string()).into())
        }
    }

    let chain = HandlerChain::new().add_handler(Arc::new(Failing));
    let err = chain.handle(&create_test_message("hi")).await.unwrap_err();
    assert!(err.to_string().contains("broken session"));
}

/// **Test: Empty chain returns Continue.**
#[tokio::test]
async fn test_empty_chain() {
    let chain = HandlerChain::new();
    assert!(chain.is_empty());
    let result = chain.handle(&create_test_message("hi")).await.unwrap();
    assert_eq!(result, HandlerResponse::Continue);
}
