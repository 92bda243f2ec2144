//! CLI parser.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "handson-bot")]
#[command(about = "Sample bot: welcome, handle name prompt, greeting", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run on Telegram (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Chat with the bot on stdin/stdout.
    Console {
        /// User id for the session; user state is keyed by it.
        #[arg(short, long, default_value = "console-user")]
        user: String,
    },
}
