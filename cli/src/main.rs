mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{labels, render};

pub async fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Render(args) => render::run(&cli, args).await,
        Commands::Labels(args) => labels::run(&cli, args).await,
    }
}

/// Logs go to stderr so JSON written to stdout stays clean.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> { run().await }
