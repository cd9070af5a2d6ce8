//! CLI parser.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "restdel")]
#[command(about = "Rest Delivery estimate bot: run, serve, config", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Serve the HTTP API (APP_HOST / APP_PORT unless overridden).
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the effective configuration with secrets masked, then validate it.
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Test: Subcommands and their overrides parse.**
    #[test]
    fn test_parse_commands() {
        let cli = Cli::parse_from(["restdel", "run", "--token", "123:abc"]);
        assert!(matches!(cli.command, Commands::Run { token: Some(ref t) } if t == "123:abc"));

        let cli = Cli::parse_from(["restdel", "serve", "--host", "127.0.0.1", "-p", "9000"]);
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected serve"),
        }

        assert!(matches!(Cli::parse_from(["restdel", "config"]).command, Commands::Config));
        assert!(Cli::try_parse_from(["restdel", "serve", "--port", "http"]).is_err());
    }
}
