use anyhow::Result;
use clap::Parser;
use winko_bot::{check_balance, create_assistant, run_bot, BotConfig, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BotConfig::load(token)?;
            run_bot(config).await
        }
        Commands::Balance { address } => {
            let bnb = check_balance(&address).await?;
            println!("{} BNB", bnb);
            Ok(())
        }
        Commands::CreateAssistant { model, name } => {
            let assistant_id = create_assistant(&model, &name).await?;
            println!("Created assistant: {}", assistant_id);
            println!("Set ASSISTANT_ID={} in .env to use it", assistant_id);
            Ok(())
        }
    }
}
