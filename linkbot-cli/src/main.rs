//! linkbot CLI: run the link-saving Telegram bot. Config from env (and `.env`) plus optional CLI args.

use anyhow::Result;
use clap::Parser;
use linkbot_cli::{load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            token,
            api_url,
            batch_size,
        } => {
            let config = load_config(token, api_url, batch_size)?;
            run_bot(config).await
        }
    }
}
