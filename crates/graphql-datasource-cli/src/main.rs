mod cli;
mod commands;
mod config;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        output::print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing_with_level(&cli.log_level);
    let config = config::resolve_config(&cli)?;

    match cli.command {
        Commands::Sdl(args) => commands::sdl::run(config, args).await,
        Commands::Roots(args) => commands::roots::run(config, args).await,
        Commands::Query(args) => commands::query::run(config, args).await,
    }
}
