//! Dispatcher runner: converts teloxide messages and button presses to core::Message and passes them to
//! HandlerChain in a spawned task per update.

use handler_chain::HandlerChain;
use restdel_core::{Message as CoreMessage, ToCoreMessage};
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use tracing::{error, info, instrument, warn};

use super::adapters::{TelegramCallbackWrapper, TelegramMessageWrapper};

fn bot_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", "Начать работу"),
        BotCommand::new("new", "Новая смета"),
        BotCommand::new("cancel", "Отменить текущий расчет"),
        BotCommand::new("help", "Справка"),
    ]
}

fn spawn_chain(chain: HandlerChain, core_msg: CoreMessage) {
    tokio::spawn(async move {
        info!(
            user_id = core_msg.user.id,
            chat_id = core_msg.chat.id,
            message_id = %core_msg.id,
            "step: processing message (handler chain started)"
        );
        if let Err(e) = chain.handle(&core_msg).await {
            error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
        }
    });
}

async fn on_message(msg: Message, chain: HandlerChain) -> ResponseResult<()> {
    let core_msg = TelegramMessageWrapper(&msg).to_core();
    if msg.text().is_none() {
        info!(
            user_id = core_msg.user.id,
            chat_id = core_msg.chat.id,
            "Received non-text message"
        );
        return Ok(());
    }
    spawn_chain(chain, core_msg);
    Ok(())
}

async fn on_callback(bot: Bot, query: CallbackQuery, chain: HandlerChain) -> ResponseResult<()> {
    // Stops the client's loading indicator; the handler answers in the chat.
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, "Failed to answer callback query");
    }
    let core_msg = TelegramCallbackWrapper(&query).to_core();
    if core_msg.content.is_empty() {
        return Ok(());
    }
    spawn_chain(chain, core_msg);
    Ok(())
}

/// Registers the command menu and dispatches updates until Ctrl+C.
#[instrument(skip(bot, handler_chain))]
pub async fn run_dispatcher(bot: teloxide::Bot, handler_chain: HandlerChain) -> anyhow::Result<()> {
    if let Err(e) = bot.set_my_commands(bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }
    if let Ok(me) = bot.get_me().await {
        info!(username = ?me.user.username, "Bot identity resolved");
    }

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![handler_chain])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped");
    Ok(())
}
