// floe/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logging on stderr so reports on stdout stay machine-readable.
    // RUST_LOG=debug floe validate ... for details
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let passed = match cli.command {
        Commands::Validate {
            project_dir,
            format,
            output,
        } => commands::validate::execute(project_dir, &format, output).await?,
        Commands::Merge { project_dir } => commands::merge::execute(project_dir)?,
        Commands::Score {
            results,
            project_dir,
            format,
        } => commands::score::execute(results, project_dir, &format)?,
    };

    if !passed {
        // Exit with error code for CI/CD
        std::process::exit(1);
    }
    Ok(())
}
