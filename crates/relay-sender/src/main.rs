mod bootstrap_helpers;
mod commands;

use anyhow::Result;
use clap::Parser;
use relay_cli::Cli;

use crate::bootstrap_helpers::init_tracing;
use crate::commands::run_cli;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run_cli(cli).await
}
