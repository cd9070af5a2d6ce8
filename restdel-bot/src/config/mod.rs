//! Bot configuration: BaseConfig (Telegram + log + DB) + AppExtensions (menu, quotes, sessions, LLM, business rules, API server).

mod base;
mod bot_config;
mod extensions;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use extensions::AppExtensions;
