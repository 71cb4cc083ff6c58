//! Folio CLI: render portfolio pages from a content document.
//!
//! Loads a static HTML page, merges the site's `content.json` into its
//! regions and applies the configured default theme.

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
