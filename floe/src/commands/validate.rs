// floe/src/commands/validate.rs
//
// USE CASE: full compile-time governance check of a project.

use anyhow::{Context, anyhow};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use floe_core::application::{CompileRequest, GovernanceEngine};
use floe_core::domain::registry::PluginRegistry;
use floe_core::infrastructure::adapters::{FileCatalog, StaticTableStore};
use floe_core::infrastructure::config::sources::TABLES_FILE;
use floe_core::infrastructure::config::{load_governance_config, load_project_sources, load_tables};
use floe_core::infrastructure::fs::atomic_write;
use floe_core::infrastructure::reporters::{available_formats, create_renderer};

const CATALOG_DIR: &str = "target/catalog";

pub async fn execute(project_dir: PathBuf, format: &str, output: Option<PathBuf>) -> anyhow::Result<bool> {
    let renderer = create_renderer(format).ok_or_else(|| {
        anyhow!(
            "Unknown report format '{}' (expected one of: {})",
            format,
            available_formats().join(", ")
        )
    })?;

    // A. Load the Config & Sources (Infra)
    let config = load_governance_config(&project_dir)
        .with_context(|| format!("Failed to load governance configuration from {:?}", project_dir))?;
    let sources = load_project_sources(&project_dir)
        .with_context(|| format!("Failed to load project sources from {:?}", project_dir))?;
    let tables_path = project_dir.join(TABLES_FILE);
    let tables = load_tables(&tables_path).with_context(|| format!("Failed to load {:?}", tables_path))?;

    // B. Wire the adapters
    let catalog = Arc::new(FileCatalog::new(project_dir.join(CATALOG_DIR)));
    let mut engine = GovernanceEngine::new(config, PluginRegistry::with_defaults(), catalog)
        .context("Invalid governance configuration")?;
    if tables_path.exists() {
        info!(tables = tables.len(), "drift detection enabled");
        engine = engine.with_table_store(Arc::new(StaticTableStore::new(tables)));
    }

    // C. Run the engine (Application Layer)
    let request = CompileRequest {
        manifests: sources.manifests,
        contracts: sources.contracts,
        project: sources.project,
        quality_results: sources.quality_results,
    };
    let result = engine.enforce(&request).await?;

    // D. Report
    let report = renderer.render(&result)?;
    match output {
        Some(path) => {
            atomic_write(&path, &report).with_context(|| format!("Failed to write report to {:?}", path))?;
            info!(path = %path.display(), format = renderer.format_name(), "report written");
        }
        None => println!("{}", report),
    }

    Ok(result.passed)
}
