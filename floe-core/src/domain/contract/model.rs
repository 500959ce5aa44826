// floe-core/src/domain/contract/model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::domain::policy::ClassificationLevel;

/// A data contract as parsed from its source document.
///
/// Required fields are plain strings defaulting to empty so that a partially
/// written contract still loads and the structural check can report every
/// missing field at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DataContract {
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub models: Vec<ContractModel>,
    #[serde(default)]
    pub sla: SlaProperties,

    /// Name of the parent contract in the enterprise → domain → product chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContractModel {
    pub name: String,
    /// Physical table backing the model. Defaults to the model name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl ContractModel {
    pub fn table_identifier(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.name)
    }

    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Element {
    pub name: String,
    #[serde(rename = "type", default)]
    pub element_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Service-level properties. Values are kept as written (`"PT6H"`, `"99.9%"`)
/// and validated by the structural check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SlaProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freshness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    /// Quality thresholds keyed by metric (`completeness`, `uniqueness`...), as percentages.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub quality: BTreeMap<String, String>,
}

impl DataContract {
    pub fn model(&self, name: &str) -> Option<&ContractModel> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Catalog key: `{namespace}/{name}:{version}`.
    pub fn catalog_key(&self, namespace: &str) -> String {
        format!("{}/{}:{}", namespace, self.name, self.version)
    }

    /// SHA-256 over the element schema only (names, types, flags, classification).
    /// Documentation and SLA changes leave the hash untouched.
    pub fn schema_hash(&self) -> String {
        let mut models: Vec<&ContractModel> = self.models.iter().collect();
        models.sort_by(|a, b| a.name.cmp(&b.name));

        let canonical: Vec<serde_json::Value> = models
            .into_iter()
            .map(|m| {
                let mut elements: Vec<&Element> = m.elements.iter().collect();
                elements.sort_by(|a, b| a.name.cmp(&b.name));
                serde_json::json!({
                    "model": m.name,
                    "elements": elements.iter().map(|e| serde_json::json!({
                        "name": e.name,
                        "type": e.element_type.to_lowercase(),
                        "required": e.required,
                        "primary_key": e.primary_key,
                        "unique": e.unique,
                        "classification": e.classification.map(|c| c.as_str()),
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();

        let mut hasher = Sha256::new();
        hasher.update(serde_json::Value::Array(canonical).to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// A contract that passed validation. Never edited; a change needs a new version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedContract {
    pub contract: DataContract,
    pub schema_hash: String,
    pub validated_at: DateTime<Utc>,
}

impl ValidatedContract {
    pub fn new(contract: DataContract, validated_at: DateTime<Utc>) -> Self {
        let schema_hash = contract.schema_hash();
        Self {
            contract,
            schema_hash,
            validated_at,
        }
    }
}
