//! Handlers of the bot's chain: logging, allowlist and the estimate conversation.

mod estimate_handler;
mod logging_auth;
pub mod texts;

pub use estimate_handler::EstimateHandler;
pub use logging_auth::{AuthHandler, LoggingHandler};
