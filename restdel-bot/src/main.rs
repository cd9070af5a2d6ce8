//! restdel CLI: run the Telegram bot, serve the HTTP API or print the configuration.

use anyhow::Result;
use clap::Parser;
use restdel_bot::{run_bot, run_server, BotConfig, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => run_bot(BotConfig::load(token)?).await,
        Commands::Serve { host, port } => run_server(BotConfig::load(None)?, host, port).await,
        Commands::Config => {
            let config = BotConfig::load(None)?;
            println!("{}", config.describe());
            config.validate()?;
            println!("Configuration is valid");
            Ok(())
        }
    }
}
