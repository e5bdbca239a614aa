//! CLI parser.

use clap::{Parser, Subcommand};

use crate::facade::{DEFAULT_ASSISTANT_NAME, DEFAULT_MODEL};

#[derive(Parser)]
#[command(name = "winko-bot")]
#[command(about = "Telegram assistant bot with BNB balance tools", long_about = None)]
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
    /// Print the BNB balance of an address (needs BSC_API_KEY).
    Balance { address: String },
    /// Register an assistant with the crypto function tools and print its id.
    CreateAssistant {
        #[arg(short, long, default_value = DEFAULT_MODEL)]
        model: String,
        #[arg(short, long, default_value = DEFAULT_ASSISTANT_NAME)]
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_token() {
        let cli = Cli::try_parse_from(["winko-bot", "run", "--token", "abc"]).unwrap();
        assert!(matches!(cli.command, Commands::Run { token: Some(ref t) } if t == "abc"));
    }

    #[test]
    fn test_create_assistant_defaults() {
        let cli = Cli::try_parse_from(["winko-bot", "create-assistant"]).unwrap();
        match cli.command {
            Commands::CreateAssistant { model, name } => {
                assert_eq!(model, "gpt-3.5-turbo-1106");
                assert_eq!(name, "Winko");
            }
            _ => panic!("expected create-assistant"),
        }
    }

    #[test]
    fn test_balance_requires_address() {
        assert!(Cli::try_parse_from(["winko-bot", "balance"]).is_err());
    }
}
