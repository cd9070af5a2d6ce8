//! Integration tests of the estimate conversation: the full handler chain with a MockBot, a scripted
//! language model and an in-memory database.

mod common;

use anyhow::anyhow;
use common::{
    BotEvent, Harness, Options, ScriptedLlm, CHAT_ID, FULL_ANALYSIS, MODEL_PROPOSAL,
    NO_BUDGET_ANALYSIS, USER_ID,
};
use restdel_bot::handlers::texts::*;
use restdel_bot::{ConversationState, HandlerError, HandlerResponse, RestdelError};

/// **Test: Request to delivered quote in one pass.**
///
/// **Setup:** Model returns a complete analysis (budget included) and a two-line proposal.
/// **Action:** /new, describe the event, press "accept" on the proposal message.
/// **Expected:** Status message deleted; proposal sent with accept/edit/cancel buttons; on accept the
/// proposal message is edited, a CSV quote is sent with the new-quote button, the estimate is saved as
/// completed and the session is back to idle.
#[tokio::test]
async fn test_full_flow_to_quote() {
    let h = Harness::new(ScriptedLlm::ok(&[FULL_ANALYSIS, MODEL_PROPOSAL])).await;

    assert_eq!(h.text("/new").await, HandlerResponse::Reply(NEW_REQUEST.to_string()));
    assert_eq!(h.state().await, ConversationState::WaitingForRequest);

    let response = h.text("Фуршет на 30 человек 1 июня, бюджет 50000").await;
    assert_eq!(response, HandlerResponse::Stop);
    assert_eq!(h.state().await, ConversationState::ConfirmingProposal);
    assert!(h.llm.last_user_message().contains("Канапе с лососем"));

    let events = h.bot.take();
    assert!(events.contains(&BotEvent::Deleted {
        chat_id: CHAT_ID,
        message_id: "100".to_string()
    }));
    let rich: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BotEvent::Rich { html, buttons, .. } => Some((html.clone(), buttons.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(rich.len(), 1);
    assert!(rich[0].0.contains("Канапе с лососем"));
    assert_eq!(rich[0].1, vec![CB_ACCEPT, CB_EDIT, CB_CANCEL]);

    let response = h.press("777", CB_ACCEPT).await;
    let HandlerResponse::Reply(caption) = response else {
        panic!("expected the quote caption, got {:?}", response);
    };
    assert!(caption.contains("Номер заказа: P-"));
    assert!(caption.contains("20,700"));
    assert_eq!(h.state().await, ConversationState::Idle);

    let events = h.bot.take();
    assert!(events.contains(&BotEvent::Edited {
        chat_id: CHAT_ID,
        message_id: "777".to_string(),
        text: ACCEPTING.to_string()
    }));
    let Some(BotEvent::Document { path, buttons, .. }) =
        events.iter().find(|e| matches!(e, BotEvent::Document { .. }))
    else {
        panic!("no document sent: {:?}", events);
    };
    assert!(path.exists());
    assert!(path.starts_with(&h.quotes_dir));
    assert_eq!(buttons, &vec![CB_NEW_QUOTE.to_string()]);

    let saved = h.components.repo.list_by_status("completed", 10).await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].chat_id, CHAT_ID);
    assert_eq!(saved[0].user_id, USER_ID);
    assert_eq!(saved[0].guests, 30);
    assert_eq!(saved[0].total_cost, 20_700);
    assert_eq!(saved[0].event_type, "buffet");
    assert!(caption.contains(&saved[0].order_number));
    assert_eq!(saved[0].quote_file.as_deref(), Some(path.display().to_string().as_str()));
}

/// **Test: Budget must contain digits; the planner covers a failed proposal.**
///
/// **Setup:** Analysis without budget; the proposal call fails (fallbacks on).
/// **Action:** Request, a budget without digits, then "около 40 000 руб".
/// **Expected:** Budget question, digits hint with state kept, then a planner proposal.
#[tokio::test]
async fn test_budget_retry_and_planner_fallback() {
    let llm = ScriptedLlm::new(vec![Ok(NO_BUDGET_ANALYSIS.to_string()), Err(anyhow!("timeout"))]);
    let h = Harness::new(llm).await;

    h.text("/new").await;
    assert_eq!(
        h.text("Фуршет на 30 человек").await,
        HandlerResponse::Reply(ASK_BUDGET.to_string())
    );
    assert_eq!(h.state().await, ConversationState::WaitingForBudget);

    assert_eq!(
        h.text("не знаю").await,
        HandlerResponse::Reply(BUDGET_DIGITS.to_string())
    );
    assert_eq!(h.state().await, ConversationState::WaitingForBudget);

    h.bot.take();
    assert_eq!(h.text("около 40 000 руб").await, HandlerResponse::Stop);
    assert_eq!(h.state().await, ConversationState::ConfirmingProposal);
    assert_eq!(h.bot.rich_messages().len(), 1);
    assert!(h.llm.last_user_message().contains("40000"));
}

/// **Test: Missing details are asked for and the answer is appended to the request.**
///
/// **Setup:** First analysis has no guest count; the second one is complete.
/// **Expected:** Question names the missing field; the second analysis sees "request. answer".
#[tokio::test]
async fn test_missing_info_is_asked() {
    let llm = ScriptedLlm::ok(&[
        r#"{"event_type": "banquet", "guests_count": 0}"#,
        FULL_ANALYSIS,
        MODEL_PROPOSAL,
    ]);
    let h = Harness::new(llm).await;

    h.text("/new").await;
    let response = h.text("Банкет в июне").await;
    assert_eq!(
        response,
        HandlerResponse::Reply("Уточните, пожалуйста: количество гостей?".to_string())
    );
    assert_eq!(h.state().await, ConversationState::WaitingForDetails);

    assert_eq!(h.text("Нас будет 30 человек").await, HandlerResponse::Stop);
    assert_eq!(h.llm.request_count(), 3);
    assert_eq!(h.state().await, ConversationState::ConfirmingProposal);
}

/// **Test: Appended request text reaches the model.**
#[tokio::test]
async fn test_appended_request_reaches_analysis() {
    let llm = ScriptedLlm::ok(&[r#"{"event_type": "banquet"}"#, r#"{"event_type": "banquet"}"#]);
    let h = Harness::new(llm).await;

    h.text("/new").await;
    h.text("Банкет в июне").await;
    h.text("Нас будет 40 человек").await;

    assert_eq!(h.llm.request_count(), 2);
    assert!(h
        .llm
        .last_user_message()
        .contains("Банкет в июне. Нас будет 40 человек"));
    assert_eq!(h.state().await, ConversationState::WaitingForDetails);
}

/// **Test: Edits regenerate the proposal from the previous one.**
///
/// **Action:** Press "edit", send edits.
/// **Expected:** Button message edited to the edit prompt; the revision prompt carries the edits;
/// a new proposal is sent and the state returns to confirming.
#[tokio::test]
async fn test_edit_flow() {
    let revised = r#"{"proposal_text": "Без икры", "menu_items": [
        {"category": "десерты", "items": [{"name": "Макарон ассорти", "weight": 15, "price_per_item": 90, "quantity": 60}]}
    ]}"#;
    let h = Harness::new(ScriptedLlm::ok(&[FULL_ANALYSIS, MODEL_PROPOSAL, revised])).await;
    h.text("/new").await;
    h.text("Фуршет на 30 человек, бюджет 50000").await;
    h.bot.take();

    assert_eq!(
        h.press("300", CB_EDIT).await,
        HandlerResponse::Reply(EDIT_PROMPT.to_string())
    );
    assert_eq!(h.state().await, ConversationState::EditingProposal);
    assert_eq!(h.bot.edited_texts(), vec![EDIT_PROMPT.to_string()]);

    assert_eq!(h.text("Добавьте десерты").await, HandlerResponse::Stop);
    assert!(h.llm.last_user_message().contains("Добавьте десерты"));
    assert!(h.llm.last_user_message().contains("Легкий фуршет для 30 гостей"));
    assert_eq!(h.state().await, ConversationState::ConfirmingProposal);
    assert!(h.bot.sent_texts().contains(&APPLYING_EDITS.to_string()));

    let rich = h.bot.rich_messages();
    assert_eq!(rich.len(), 1);
    let BotEvent::Rich { html, .. } = &rich[0] else { unreachable!() };
    assert!(html.contains("Макарон ассорти"));
}

/// **Test: Without fallbacks, failed edits keep the client in editing mode.**
#[tokio::test]
async fn test_failed_edits_keep_state() {
    let llm = ScriptedLlm::ok(&[FULL_ANALYSIS, MODEL_PROPOSAL]);
    let h = Harness::with_options(
        llm,
        Options {
            fallbacks: false,
            ..Default::default()
        },
    )
    .await;
    h.text("/new").await;
    h.text("Фуршет на 30 человек, бюджет 50000").await;
    h.press("300", CB_EDIT).await;

    assert_eq!(
        h.text("Замените рыбу на курицу").await,
        HandlerResponse::Reply(EDITS_FAILED.to_string())
    );
    assert_eq!(h.state().await, ConversationState::EditingProposal);
}

/// **Test: Without fallbacks, analysis and proposal failures are reported.**
///
/// **Expected:** Analysis failure keeps the request state; proposal failure edits the status message
/// and resets the conversation.
#[tokio::test]
async fn test_failures_without_fallbacks() {
    let llm = ScriptedLlm::new(vec![
        Ok("Не могу помочь".to_string()),
        Ok(FULL_ANALYSIS.to_string()),
        Err(anyhow!("connection refused")),
    ]);
    let h = Harness::with_options(
        llm,
        Options {
            fallbacks: false,
            ..Default::default()
        },
    )
    .await;

    h.text("/new").await;
    assert_eq!(
        h.text("Фуршет").await,
        HandlerResponse::Reply(ANALYSIS_FAILED.to_string())
    );
    assert_eq!(h.state().await, ConversationState::WaitingForRequest);

    h.bot.take();
    assert_eq!(
        h.text("Фуршет на 30 человек, бюджет 50000").await,
        HandlerResponse::Reply(PROPOSAL_FAILED.to_string())
    );
    assert_eq!(h.state().await, ConversationState::Idle);
    assert_eq!(h.bot.edited_texts(), vec![PROPOSAL_FAILED.to_string()]);
}

/// **Test: Cancel resets; stale buttons and idle text get hints.**
#[tokio::test]
async fn test_cancel_and_stale_buttons() {
    let h = Harness::new(ScriptedLlm::ok(&[FULL_ANALYSIS, MODEL_PROPOSAL])).await;
    h.text("/new").await;
    h.text("Фуршет на 30 человек, бюджет 50000").await;

    assert_eq!(
        h.press("300", CB_CANCEL).await,
        HandlerResponse::Reply(CANCELLED.to_string())
    );
    assert_eq!(h.state().await, ConversationState::Idle);

    assert_eq!(
        h.press("300", CB_ACCEPT).await,
        HandlerResponse::Reply(STALE_PROPOSAL.to_string())
    );
    assert_eq!(h.text("Привет").await, HandlerResponse::Reply(IDLE_HINT.to_string()));
    assert!(h.components.repo.list_recent(10).await.unwrap().is_empty());
}

/// **Test: Text while a proposal is on screen asks to use the buttons.**
#[tokio::test]
async fn test_text_while_confirming() {
    let h = Harness::new(ScriptedLlm::ok(&[FULL_ANALYSIS, MODEL_PROPOSAL])).await;
    h.text("/new").await;
    h.text("Фуршет на 30 человек, бюджет 50000").await;

    assert_eq!(
        h.text("А можно дешевле?").await,
        HandlerResponse::Reply(CHOOSE_ACTION.to_string())
    );
    assert_eq!(h.state().await, ConversationState::ConfirmingProposal);
}

/// **Test: A rejected edit falls back to a new message.**
#[tokio::test]
async fn test_cancel_when_edit_fails() {
    let h = Harness::new(ScriptedLlm::ok(&[])).await;
    h.bot.fail_edits();

    h.press("12", CB_CANCEL).await;

    assert_eq!(h.bot.sent_texts(), vec![CANCELLED.to_string()]);
}

/// **Test: The new-quote button and /start, /help, /cancel commands.**
#[tokio::test]
async fn test_commands_and_new_quote_button() {
    let h = Harness::new(ScriptedLlm::ok(&[])).await;

    assert_eq!(h.text("/start").await, HandlerResponse::Reply(START.to_string()));
    assert_eq!(h.text("/help").await, HandlerResponse::Reply(HELP.to_string()));

    assert_eq!(
        h.press("55", CB_NEW_QUOTE).await,
        HandlerResponse::Reply(NEW_REQUEST.to_string())
    );
    assert_eq!(h.state().await, ConversationState::WaitingForRequest);

    assert_eq!(h.text("/cancel").await, HandlerResponse::Reply(CANCELLED.to_string()));
    assert_eq!(h.state().await, ConversationState::Idle);
    assert_eq!(h.llm.request_count(), 0);
}

/// **Test: Users outside the allowlist are rejected before any reply.**
#[tokio::test]
async fn test_allowlist() {
    let h = Harness::with_options(
        ScriptedLlm::ok(&[]),
        Options {
            allowed_user_ids: vec![USER_ID],
            ..Default::default()
        },
    )
    .await;

    let err = h.text_from(7, "/new").await.unwrap_err();
    assert!(matches!(err, RestdelError::Handler(HandlerError::Unauthorized)));
    assert!(h.bot.events().is_empty());

    assert_eq!(h.text("/new").await, HandlerResponse::Reply(NEW_REQUEST.to_string()));
}
