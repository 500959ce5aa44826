// floe-core/src/infrastructure/config/governance.rs

use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::config::{EnforcementMode, GovernanceConfig};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::read_yaml;

pub const CONFIG_CANDIDATES: [&str; 2] = ["floe.yaml", "floe_project.yaml"];

/// Loads `floe.yaml` (or `floe_project.yaml`) from the project root, then
/// layers environment overrides and validates the result.
/// A missing file yields the defaults; a malformed one is an error.
#[instrument(skip(project_dir))]
pub fn load_governance_config(project_dir: &Path) -> Result<GovernanceConfig, InfrastructureError> {
    load_governance_config_with(project_dir, |key| std::env::var(key).ok())
}

/// Same as [`load_governance_config`] with an explicit environment lookup.
pub fn load_governance_config_with<F>(
    project_dir: &Path,
    env: F,
) -> Result<GovernanceConfig, InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if !project_dir.is_dir() {
        return Err(InfrastructureError::ConfigNotFound(project_dir.display().to_string()));
    }

    let mut config = match find_config(project_dir) {
        Some(path) => {
            info!(path = ?path, "Loading governance configuration");
            read_yaml::<GovernanceConfig>(&path)?
        }
        None => {
            info!(dir = ?project_dir, "No floe.yaml found, using default governance configuration");
            GovernanceConfig::default()
        }
    };

    apply_env_overrides(&mut config, env)?;

    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;
    Ok(config)
}

fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}

fn apply_env_overrides<F>(config: &mut GovernanceConfig, env: F) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = env("FLOE_MAX_VIOLATIONS") {
        let parsed = val.trim().parse::<usize>().map_err(|_| {
            InfrastructureError::ConfigError(format!("FLOE_MAX_VIOLATIONS must be a positive integer, got '{}'", val))
        })?;
        info!(old = config.max_violations, new = parsed, "Overriding max_violations via ENV");
        config.max_violations = parsed;
    }
    if let Some(val) = env("FLOE_NAMESPACE") {
        info!(old = ?config.catalog.namespace, new = ?val, "Overriding catalog namespace via ENV");
        config.catalog.namespace = val;
    }
    if let Some(val) = env("FLOE_DRIFT_ENFORCEMENT") {
        let mode: EnforcementMode = val
            .parse()
            .map_err(|e: String| InfrastructureError::ConfigError(format!("FLOE_DRIFT_ENFORCEMENT: {}", e)))?;
        info!(old = %config.enforcement.drift, new = %mode, "Overriding drift enforcement via ENV");
        config.enforcement.drift = mode;
    }
    Ok(())
}
