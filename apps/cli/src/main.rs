//! Paperboard CLI: post the day's top Hugging Face papers to Notion.
//!
//! Scrapes the daily papers listing, keeps the well-upvoted entries, reads
//! each abstract, and appends one toggle per paper to a Notion page.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
