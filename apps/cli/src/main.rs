//! docsgen CLI: aggregate documentation from many repositories into one tree.
//!
//! Markdown files are sorted into tutorials, how-to guides, explanations and
//! references, written per repository, and linked together.

mod commands;
mod repos;
mod table;

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
