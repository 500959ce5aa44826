// floe-core/src/infrastructure/config/sources.rs

use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::domain::contract::{DataContract, TableSchema};
use crate::domain::manifest::{Manifest, ManifestValue, RawField, Scope, coerce};
use crate::domain::project::Project;
use crate::domain::quality::CheckResult;
use crate::error::FloeError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::read_yaml;

const SUPPORTED_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

pub const MANIFESTS_DIR: &str = "manifests";
pub const CONTRACTS_DIR: &str = "contracts";
pub const MODELS_FILE: &str = "models.yaml";
pub const TABLES_FILE: &str = "tables.yaml";
pub const QUALITY_RESULTS_FILE: &str = "quality_results.yaml";

/// Everything read from a project directory before validation starts.
#[derive(Debug, Clone, Default)]
pub struct ProjectSources {
    pub manifests: Vec<Manifest>,
    pub contracts: Vec<DataContract>,
    pub project: Project,
    pub quality_results: Option<Vec<CheckResult>>,
}

/// Manifest document as authored, before field typing.
#[derive(Debug, Deserialize)]
struct ManifestDocument {
    name: String,
    #[serde(default = "default_version")]
    version: String,
    scope: Scope,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    policies: BTreeMap<String, Value>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

#[derive(Debug, Deserialize)]
struct TablesDocument {
    #[serde(default)]
    tables: Vec<TableSchema>,
}

#[instrument(skip(project_dir))]
pub fn load_project_sources(project_dir: &Path) -> Result<ProjectSources, FloeError> {
    let manifests = yaml_files(&project_dir.join(MANIFESTS_DIR))
        .iter()
        .map(|p| load_manifest(p))
        .collect::<Result<Vec<_>, _>>()?;

    let contracts = yaml_files(&project_dir.join(CONTRACTS_DIR))
        .iter()
        .map(|p| read_yaml::<DataContract>(p))
        .collect::<Result<Vec<_>, _>>()?;

    let models_path = project_dir.join(MODELS_FILE);
    let project = if models_path.exists() {
        read_yaml::<Project>(&models_path)?
    } else {
        Project::default()
    };

    let results_path = project_dir.join(QUALITY_RESULTS_FILE);
    let quality_results = if results_path.exists() {
        Some(load_quality_results(&results_path)?)
    } else {
        None
    };

    info!(
        manifests = manifests.len(),
        contracts = contracts.len(),
        models = project.models.len(),
        "Project sources loaded"
    );

    Ok(ProjectSources {
        manifests,
        contracts,
        project,
        quality_results,
    })
}

pub fn load_quality_results(path: &Path) -> Result<Vec<CheckResult>, InfrastructureError> {
    read_yaml(path)
}

pub fn load_tables(path: &Path) -> Result<Vec<TableSchema>, InfrastructureError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let doc: TablesDocument = read_yaml(path)?;
    Ok(doc.tables)
}

/// YAML files under `dir`, sorted so load order never depends on the filesystem.
fn yaml_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
        })
        .collect();
    found.sort();
    found
}

fn load_manifest(path: &Path) -> Result<Manifest, FloeError> {
    let doc: ManifestDocument = read_yaml(path)?;
    debug!(path = ?path, manifest = %doc.name, "Typing manifest fields");

    let mut fields = BTreeMap::new();
    for (name, raw) in doc.policies {
        let raw = raw_field(&name, &raw).map_err(|message| InfrastructureError::ParseError {
            path: path.display().to_string(),
            message,
        })?;
        let value: ManifestValue = coerce(&name, raw)?;
        fields.insert(name, value);
    }

    Ok(Manifest {
        name: doc.name,
        version: doc.version,
        scope: doc.scope,
        parent: doc.parent,
        fields,
    })
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn raw_field(name: &str, value: &Value) -> Result<RawField, String> {
    if let Some(s) = scalar(value) {
        return Ok(RawField::Scalar(s));
    }
    match value {
        Value::Sequence(items) => items
            .iter()
            .map(|i| scalar(i).ok_or_else(|| format!("field '{}' must be a list of scalars", name)))
            .collect::<Result<Vec<_>, _>>()
            .map(RawField::List),
        Value::Mapping(map) => {
            let get = |key: &str| map.get(key).and_then(scalar);
            match (get("type"), get("value")) {
                (Some(policy_type), Some(value)) => Ok(RawField::Typed { policy_type, value }),
                _ => Err(format!("field '{}' must be a scalar, a list or {{type, value}}", name)),
            }
        }
        _ => Err(format!("field '{}' has no value", name)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::domain::policy::{PolicyType, PolicyValue};
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) -> Result<()> {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    #[test]
    fn test_loads_full_project() -> Result<()> {
        let dir = tempdir()?;
        write(
            dir.path(),
            "manifests/enterprise.yaml",
            r#"
name: acme
scope: enterprise
policies:
  quality_gate: 80
  classification: confidential
  approved_computes: [duckdb, snowflake]
  retention_window: { type: freshness, value: P30D }
"#,
        )?;
        write(
            dir.path(),
            "contracts/orders.yml",
            r#"
apiVersion: v3.0.0
kind: DataContract
name: orders
version: 1.0.0
owner: sales
models:
  - name: orders
    elements:
      - { name: order_id, type: string, required: true }
"#,
        )?;
        write(dir.path(), "models.yaml", "models:\n  - name: stg_orders\n")?;
        write(
            dir.path(),
            "quality_results.yaml",
            "- { name: not_null_id, dimension: completeness, severity: critical, passed: true }\n",
        )?;

        let sources = load_project_sources(dir.path())?;
        assert_eq!(sources.manifests.len(), 1);
        let m = &sources.manifests[0];
        assert_eq!(m.version, "1.0.0");
        match m.field("quality_gate") {
            Some(ManifestValue::Policy(p)) => {
                assert_eq!(p.policy_type, PolicyType::QualityGate);
                assert_eq!(p.value, PolicyValue::Threshold(80.0));
            }
            other => panic!("unexpected {other:?}"),
        }
        match m.field("retention_window") {
            Some(ManifestValue::Policy(p)) => assert_eq!(p.policy_type, PolicyType::Freshness),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(sources.contracts[0].models[0].elements[0].name, "order_id");
        assert_eq!(sources.project.models[0].name, "stg_orders");
        assert_eq!(sources.quality_results.map(|r| r.len()), Some(1));
        Ok(())
    }

    #[test]
    fn test_unknown_policy_type_is_a_hard_error() -> Result<()> {
        let dir = tempdir()?;
        write(
            dir.path(),
            "manifests/bad.yaml",
            "name: acme\nscope: enterprise\npolicies:\n  retention: { type: retention_days, value: 30 }\n",
        )?;
        let err = load_project_sources(dir.path()).unwrap_err();
        assert!(matches!(err, FloeError::Domain(DomainError::UnknownPolicyType(_))));
        Ok(())
    }

    #[test]
    fn test_empty_project_dir() -> Result<()> {
        let dir = tempdir()?;
        let sources = load_project_sources(dir.path())?;
        assert!(sources.manifests.is_empty() && sources.contracts.is_empty());
        assert!(sources.quality_results.is_none());
        assert!(load_tables(&dir.path().join(TABLES_FILE))?.is_empty());
        Ok(())
    }
}
