// floe-core/src/infrastructure/adapters/file_catalog.rs

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::memory::latest;
use crate::domain::contract::{DataContract, is_safe_name};
use crate::error::FloeError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::catalog::{ContractCatalog, ContractRegistration, RegistrationOutcome};

/// Catalog stored on disk as `{root}/{namespace}/{name}/{version}.json`.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    root: PathBuf,
}

impl FileCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keys become path segments, so each one must stay inside `root`.
    fn segment(value: &str) -> Result<&str, InfrastructureError> {
        if is_safe_name(value) {
            Ok(value)
        } else {
            Err(InfrastructureError::UnsafePath(value.to_string()))
        }
    }

    fn contract_dir(&self, namespace: &str, name: &str) -> Result<PathBuf, InfrastructureError> {
        Ok(self.root.join(Self::segment(namespace)?).join(Self::segment(name)?))
    }

    fn entry_path(&self, registration: &ContractRegistration) -> Result<PathBuf, InfrastructureError> {
        let version = Self::segment(&registration.version)?;
        Ok(self
            .contract_dir(&registration.namespace, &registration.name)?
            .join(format!("{}.json", version)))
    }

    fn read_entry(path: &Path) -> Result<ContractRegistration, InfrastructureError> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| InfrastructureError::CatalogError(format!(
            "corrupt catalog entry {}: {}",
            path.display(),
            e
        )))
    }
}

#[async_trait]
impl ContractCatalog for FileCatalog {
    async fn get_baseline_contract(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DataContract>, FloeError> {
        let dir = self.contract_dir(namespace, name)?;
        if !dir.exists() {
            return Ok(None);
        }

        let mut entries = Vec::new();
        for item in fs::read_dir(&dir)? {
            let path = item?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                entries.push(Self::read_entry(&path)?);
            }
        }
        debug!(dir = ?dir, versions = entries.len(), "Catalog versions found");
        Ok(latest(&entries).map(|r| r.contract.clone()))
    }

    async fn register_contract(
        &self,
        registration: &ContractRegistration,
    ) -> Result<RegistrationOutcome, FloeError> {
        let path = self.entry_path(registration)?;
        if path.exists() {
            let existing = Self::read_entry(&path)?;
            if existing.schema_hash != registration.schema_hash {
                return Ok(RegistrationOutcome::Conflict {
                    existing_hash: existing.schema_hash,
                });
            }
            return Ok(RegistrationOutcome::Registered);
        }

        let json = serde_json::to_string_pretty(registration).map_err(InfrastructureError::from)?;
        atomic_write(&path, json)?;
        debug!(key = %registration.key(), path = ?path, "Contract registered");
        Ok(RegistrationOutcome::Registered)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn registration(version: &str, hash: &str) -> ContractRegistration {
        ContractRegistration {
            namespace: "acme".into(),
            name: "orders".into(),
            version: version.into(),
            schema_hash: hash.into(),
            registered_at: Utc::now(),
            metadata: BTreeMap::new(),
            contract: DataContract {
                name: "orders".into(),
                version: version.into(),
                owner: "sales".into(),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_round_trip_on_disk() -> Result<()> {
        let dir = tempdir()?;
        let catalog = FileCatalog::new(dir.path().join("catalog"));

        assert!(catalog.get_baseline_contract("acme", "orders").await?.is_none());
        catalog.register_contract(&registration("1.0.0", "h1")).await?;
        catalog.register_contract(&registration("2.0.0", "h2")).await?;

        assert!(dir.path().join("catalog/acme/orders/2.0.0.json").exists());
        let baseline = catalog.get_baseline_contract("acme", "orders").await?.unwrap();
        assert_eq!(baseline.version, "2.0.0");
        assert_eq!(baseline.owner, "sales");
        Ok(())
    }

    #[tokio::test]
    async fn test_conflicting_hash() -> Result<()> {
        let dir = tempdir()?;
        let catalog = FileCatalog::new(dir.path());
        catalog.register_contract(&registration("1.0.0", "h1")).await?;
        let outcome = catalog.register_contract(&registration("1.0.0", "h9")).await?;
        assert_eq!(
            outcome,
            RegistrationOutcome::Conflict {
                existing_hash: "h1".into()
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_keys_cannot_leave_the_root() -> Result<()> {
        let dir = tempdir()?;
        let catalog = FileCatalog::new(dir.path().join("catalog"));

        let mut escaping = registration("1.0.0", "h1");
        escaping.name = "../../x".into();
        let err = catalog.register_contract(&escaping).await.unwrap_err();
        assert!(err.to_string().contains("Unsafe path"), "{err}");
        assert!(!dir.path().join("x").exists());

        assert!(catalog.get_baseline_contract("..", "orders").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let contract_dir = dir.path().join("acme/orders");
        fs::create_dir_all(&contract_dir)?;
        fs::write(contract_dir.join("1.0.0.json"), "not json")?;

        let catalog = FileCatalog::new(dir.path());
        assert!(catalog.get_baseline_contract("acme", "orders").await.is_err());
        Ok(())
    }
}
