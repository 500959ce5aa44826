// floe-core/src/domain/registry.rs

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::domain::enforcement::{ErrorCode, Violation};
use crate::domain::manifest::{FieldKind, Manifest, ManifestValue, field_def};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginKind {
    Compute,
    Orchestrator,
    Catalog,
    Storage,
}

impl PluginKind {
    pub const ALL: [Self; 4] = [Self::Compute, Self::Orchestrator, Self::Catalog, Self::Storage];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compute => "compute",
            Self::Orchestrator => "orchestrator",
            Self::Catalog => "catalog",
            Self::Storage => "storage",
        }
    }

    /// The manifest field that selects a plugin of this kind.
    pub fn from_field(field: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == field)
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known plugins per kind. Built once at startup and passed by reference;
/// there is no global instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PluginRegistry {
    plugins: BTreeMap<PluginKind, BTreeSet<String>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the plugins shipped with the platform.
    pub fn with_defaults() -> Self {
        Self::new()
            .register(PluginKind::Compute, "duckdb")
            .register(PluginKind::Compute, "snowflake")
            .register(PluginKind::Compute, "bigquery")
            .register(PluginKind::Compute, "databricks")
            .register(PluginKind::Compute, "spark")
            .register(PluginKind::Orchestrator, "dagster")
            .register(PluginKind::Orchestrator, "airflow")
            .register(PluginKind::Catalog, "polaris")
            .register(PluginKind::Catalog, "glue")
            .register(PluginKind::Catalog, "unity")
            .register(PluginKind::Storage, "s3")
            .register(PluginKind::Storage, "gcs")
            .register(PluginKind::Storage, "adls")
            .register(PluginKind::Storage, "local")
    }

    pub fn register(mut self, kind: PluginKind, name: impl Into<String>) -> Self {
        self.plugins.entry(kind).or_default().insert(name.into());
        self
    }

    pub fn contains(&self, kind: PluginKind, name: &str) -> bool {
        self.plugins
            .get(&kind)
            .is_some_and(|names| names.contains(name))
    }

    pub fn names(&self, kind: PluginKind) -> impl Iterator<Item = &str> {
        self.plugins
            .get(&kind)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }

    /// Every plugin field of the manifest must name a registered plugin.
    pub fn validate_manifest(&self, manifest: &Manifest) -> Vec<Violation> {
        manifest
            .fields
            .iter()
            .filter(|(field, _)| field_def(field).is_some_and(|s| s.kind == FieldKind::Plugin))
            .filter_map(|(field, value)| {
                let kind = PluginKind::from_field(field)?;
                let ManifestValue::Text(name) = value else {
                    return None;
                };
                if self.contains(kind, name) {
                    return None;
                }
                let known: Vec<&str> = self.names(kind).collect();
                Some(
                    Violation::new(
                        ErrorCode::UnknownPlugin,
                        &manifest.name,
                        format!("Unknown {} plugin '{}'", kind, name),
                    )
                    .expected(format!("one of: {}", known.join(", ")))
                    .actual(name)
                    .suggestion(format!("Register the '{}' plugin or pick a known {}", name, kind)),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::manifest::Scope;

    #[test]
    fn test_defaults_and_lookup() {
        let registry = PluginRegistry::with_defaults();
        assert!(registry.contains(PluginKind::Compute, "duckdb"));
        assert!(!registry.contains(PluginKind::Orchestrator, "duckdb"));
        assert_eq!(PluginKind::from_field("storage"), Some(PluginKind::Storage));
        assert_eq!(PluginKind::from_field("quality_gate"), None);
    }

    #[test]
    fn test_unknown_plugin_is_reported() {
        let registry = PluginRegistry::new().register(PluginKind::Compute, "duckdb");
        let manifest = Manifest::new("acme", Scope::Enterprise)
            .with_field("compute", ManifestValue::Text("oracle".into()))
            .with_field("owner", ManifestValue::Text("platform".into()));

        let violations = registry.validate_manifest(&manifest);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ErrorCode::UnknownPlugin);
        assert_eq!(violations[0].actual.as_deref(), Some("oracle"));
        assert_eq!(violations[0].expected.as_deref(), Some("one of: duckdb"));
    }
}
