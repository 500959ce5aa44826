// floe/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "floe")]
#[command(about = "Compile-time policy & data contract governance", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validates manifests, contracts, models and quality results
    Validate {
        /// Project directory
        #[arg(long, default_value = ".", env = "FLOE_PROJECT_DIR")]
        project_dir: PathBuf,

        /// Report format
        #[arg(long, short, default_value = "text", value_parser = ["text", "json", "sarif"])]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Prints the resolved manifest of the project as YAML
    Merge {
        /// Project directory
        #[arg(long, default_value = ".", env = "FLOE_PROJECT_DIR")]
        project_dir: PathBuf,
    },

    /// Scores a file of executed quality check results
    Score {
        /// YAML list of check results
        #[arg(long)]
        results: PathBuf,

        /// Project directory (for the scoring configuration)
        #[arg(long, default_value = ".", env = "FLOE_PROJECT_DIR")]
        project_dir: PathBuf,

        /// Output format
        #[arg(long, short, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}
