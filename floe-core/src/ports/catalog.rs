// floe-core/src/ports/catalog.rs

// What the engine needs from a contract catalog. Adapters decide where
// contracts actually live (files, a REST catalog, memory in tests).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::contract::{DataContract, ValidatedContract};
use crate::error::FloeError;

/// Payload written to the catalog for one validated contract version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRegistration {
    pub namespace: String,
    pub name: String,
    pub version: String,
    pub schema_hash: String,
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    pub contract: DataContract,
}

impl ContractRegistration {
    pub fn from_validated(namespace: &str, validated: &ValidatedContract) -> Self {
        let contract = &validated.contract;
        let mut metadata = BTreeMap::new();
        metadata.insert("owner".to_string(), contract.owner.clone());
        if let Some(parent) = &contract.parent {
            metadata.insert("parent".to_string(), parent.clone());
        }
        Self {
            namespace: namespace.to_string(),
            name: contract.name.clone(),
            version: contract.version.clone(),
            schema_hash: validated.schema_hash.clone(),
            registered_at: validated.validated_at,
            metadata,
            contract: contract.clone(),
        }
    }

    /// `{namespace}/{name}:{version}`
    pub fn key(&self) -> String {
        format!("{}/{}:{}", self.namespace, self.name, self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum RegistrationOutcome {
    /// Stored, or already stored with the same schema hash.
    Registered,
    /// The key exists with a different schema hash.
    Conflict { existing_hash: String },
    /// The catalog could not be reached.
    Unreachable { reason: String },
}

#[async_trait]
pub trait ContractCatalog: Send + Sync {
    /// Latest registered version of `name`, or `None` when it was never registered.
    async fn get_baseline_contract(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DataContract>, FloeError>;

    /// An `Err` is treated as transient and retried by the caller.
    async fn register_contract(
        &self,
        registration: &ContractRegistration,
    ) -> Result<RegistrationOutcome, FloeError>;
}
