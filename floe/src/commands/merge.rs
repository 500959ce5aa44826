// floe/src/commands/merge.rs
//
// USE CASE: show the effective manifest after inheritance.

use anyhow::Context;
use std::path::PathBuf;

use floe_core::application::resolve_manifests;
use floe_core::domain::registry::PluginRegistry;
use floe_core::infrastructure::config::load_project_sources;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<bool> {
    let sources = load_project_sources(&project_dir)
        .with_context(|| format!("Failed to load project sources from {:?}", project_dir))?;

    let (resolved, violations) = resolve_manifests(&sources.manifests, &PluginRegistry::with_defaults());

    for v in &violations {
        eprintln!("{}", v);
    }

    match resolved {
        Some(manifest) => {
            let yaml = serde_yaml::to_string(&manifest).context("Failed to serialize the resolved manifest")?;
            print!("{}", yaml);
        }
        None if sources.manifests.is_empty() => eprintln!("No manifests found in {:?}", project_dir),
        None => {}
    }

    Ok(violations.iter().all(|v| !v.is_error()))
}
