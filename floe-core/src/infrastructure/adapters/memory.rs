// floe-core/src/infrastructure/adapters/memory.rs

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::contract::{DataContract, SemVer, TableColumn, TableSchema};
use crate::error::FloeError;
use crate::ports::catalog::{ContractCatalog, ContractRegistration, RegistrationOutcome};
use crate::ports::storage::TableStore;

fn poisoned() -> FloeError {
    FloeError::InternalError("catalog mutex poisoned".into())
}

/// Catalog kept in process memory. Shared handles see the same entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    entries: Arc<Mutex<BTreeMap<String, ContractRegistration>>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an outage: every call fails with `Unavailable` until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn seed(&self, registration: ContractRegistration) -> Result<(), FloeError> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert(registration.key(), registration);
        Ok(())
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|e| e.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn check_online(&self) -> Result<(), FloeError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(FloeError::Unavailable("in-memory catalog is offline".into()));
        }
        Ok(())
    }
}

/// Picks the highest semantic version among registrations of one contract.
pub(crate) fn latest<'a, I>(registrations: I) -> Option<&'a ContractRegistration>
where
    I: IntoIterator<Item = &'a ContractRegistration>,
{
    registrations
        .into_iter()
        .filter_map(|r| SemVer::parse(&r.version).ok().map(|v| (v, r)))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, r)| r)
}

#[async_trait]
impl ContractCatalog for InMemoryCatalog {
    async fn get_baseline_contract(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DataContract>, FloeError> {
        self.check_online()?;
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        let candidates = entries
            .values()
            .filter(|r| r.namespace == namespace && r.name == name);
        Ok(latest(candidates).map(|r| r.contract.clone()))
    }

    async fn register_contract(
        &self,
        registration: &ContractRegistration,
    ) -> Result<RegistrationOutcome, FloeError> {
        self.check_online()?;
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        let key = registration.key();
        if let Some(existing) = entries.get(&key) {
            if existing.schema_hash != registration.schema_hash {
                return Ok(RegistrationOutcome::Conflict {
                    existing_hash: existing.schema_hash.clone(),
                });
            }
            return Ok(RegistrationOutcome::Registered);
        }
        entries.insert(key, registration.clone());
        Ok(RegistrationOutcome::Registered)
    }
}

/// Table store answering from a fixed list of schemas (e.g. `tables.yaml`).
#[derive(Debug, Clone, Default)]
pub struct StaticTableStore {
    tables: BTreeMap<String, TableSchema>,
}

impl StaticTableStore {
    pub fn new(tables: impl IntoIterator<Item = TableSchema>) -> Self {
        Self {
            tables: tables
                .into_iter()
                .map(|t| (t.identifier.to_lowercase(), t))
                .collect(),
        }
    }
}

#[async_trait]
impl TableStore for StaticTableStore {
    async fn table_exists(&self, identifier: &str) -> Result<bool, FloeError> {
        Ok(self.tables.contains_key(&identifier.to_lowercase()))
    }

    async fn get_table_schema(&self, identifier: &str) -> Result<Vec<TableColumn>, FloeError> {
        self.tables
            .get(&identifier.to_lowercase())
            .map(|t| t.columns.clone())
            .ok_or_else(|| FloeError::Unavailable(format!("table '{}' not found", identifier)))
    }
}
