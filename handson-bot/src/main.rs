//! handson-bot CLI: run on Telegram or on the console. Config from env and optional CLI args.

use anyhow::Result;
use clap::Parser;
use handson_bot::{run_bot, run_console_bot, BotConfig, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BotConfig::load(token)?;
            run_bot(config).await
        }
        Commands::Console { user } => {
            let config = BotConfig::load(None)?;
            run_console_bot(config, &user).await
        }
    }
}
