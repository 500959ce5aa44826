// floe-core/src/application/contracts.rs

// Collaborator side of contract validation: everything that needs the
// catalog or the table store happens here, before and after the pure checks.

use futures::StreamExt;
use futures::stream;
use tracing::{debug, info, instrument, warn};

use super::retry::with_retry;
use crate::domain::config::CatalogConfig;
use crate::domain::contract::inheritance;
use crate::domain::contract::{ContractInputs, DataContract, TableSchema, ValidatedContract};
use crate::domain::enforcement::{ErrorCode, Violation};
use crate::ports::catalog::{ContractCatalog, ContractRegistration, RegistrationOutcome};
use crate::ports::storage::TableStore;

/// Lookups in flight at once during input resolution.
const LOOKUP_CONCURRENCY: usize = 8;

/// Builds validator inputs for every contract: the folded ancestor chain, baseline from
/// the catalog, live schema per model from the table store.
///
/// Contracts are resolved concurrently; output order follows `contracts`.
/// Collaborator failures never abort: they come back as warnings and the
/// affected input is left unresolved.
#[instrument(skip_all, fields(contracts = contracts.len()))]
pub async fn resolve_inputs(
    contracts: &[DataContract],
    catalog: &dyn ContractCatalog,
    tables: Option<&dyn TableStore>,
    config: &CatalogConfig,
) -> (Vec<ContractInputs>, Vec<Violation>) {
    let resolved: Vec<(ContractInputs, Vec<Violation>)> = stream::iter(contracts)
        .map(|contract| resolve_one(contract, contracts, catalog, tables, config))
        .buffered(LOOKUP_CONCURRENCY)
        .collect()
        .await;

    let mut inputs = Vec::with_capacity(resolved.len());
    let mut warnings = Vec::new();
    for (input, found) in resolved {
        inputs.push(input);
        warnings.extend(found);
    }
    (inputs, warnings)
}

async fn resolve_one(
    contract: &DataContract,
    all: &[DataContract],
    catalog: &dyn ContractCatalog,
    tables: Option<&dyn TableStore>,
    config: &CatalogConfig,
) -> (ContractInputs, Vec<Violation>) {
    let mut input = ContractInputs::new(contract.clone());
    let mut warnings = Vec::new();

    let chain = inheritance::ancestors(contract, all);
    if let Some(parent) = inheritance::effective_parent(&chain) {
        debug!(contract = %contract.name, depth = chain.len(), "parent chain folded");
        input = input.with_parent(parent);
    }

    match fetch_baseline(contract, catalog, config).await {
        Ok(Some(baseline)) => input = input.with_baseline(baseline),
        Ok(None) => debug!(contract = %contract.name, "no baseline, first registration"),
        Err(violation) => warnings.push(violation),
    }

    if let Some(store) = tables {
        for model in &contract.models {
            match fetch_table(model.table_identifier(), store, config).await {
                Ok(table) => input = input.with_table(model.name.clone(), table),
                Err(reason) => {
                    warn!(contract = %contract.name, model = %model.name, %reason, "table schema unavailable");
                    warnings.push(
                        Violation::new(
                            ErrorCode::TableSchemaUnavailable,
                            format!("{}.{}", contract.name, model.name),
                            format!(
                                "Schema of table '{}' could not be read; drift not checked: {}",
                                model.table_identifier(),
                                reason
                            ),
                        )
                        .suggestion("Check storage connectivity and credentials"),
                    );
                }
            }
        }
    }

    (input, warnings)
}

async fn fetch_baseline(
    contract: &DataContract,
    catalog: &dyn ContractCatalog,
    config: &CatalogConfig,
) -> Result<Option<DataContract>, Violation> {
    if contract.name.is_empty() {
        return Ok(None);
    }
    with_retry(&config.retry, "get_baseline_contract", || {
        catalog.get_baseline_contract(&config.namespace, &contract.name)
    })
    .await
    .map_err(|e| {
        warn!(contract = %contract.name, error = %e, "catalog unreachable, versioning checked without baseline");
        Violation::new(
            ErrorCode::CatalogUnreachable,
            &contract.name,
            format!("Baseline lookup failed, version bump not checked: {}", e),
        )
        .suggestion("Check catalog connectivity; the contract was validated locally")
    })
}

/// `Ok(None)` when the table does not exist yet.
async fn fetch_table(
    identifier: &str,
    store: &dyn TableStore,
    config: &CatalogConfig,
) -> Result<Option<TableSchema>, String> {
    let exists = with_retry(&config.retry, "table_exists", || store.table_exists(identifier))
        .await
        .map_err(|e| e.to_string())?;
    if !exists {
        return Ok(None);
    }
    let columns = with_retry(&config.retry, "get_table_schema", || store.get_table_schema(identifier))
        .await
        .map_err(|e| e.to_string())?;
    Ok(Some(TableSchema {
        identifier: identifier.to_string(),
        columns,
    }))
}

/// Registers every validated contract. Conflicts are policy findings;
/// an unreachable catalog only warns and the contract stays in the result.
#[instrument(skip_all, fields(contracts = validated.len(), namespace = %config.namespace))]
pub async fn register_validated(
    validated: &[ValidatedContract],
    catalog: &dyn ContractCatalog,
    config: &CatalogConfig,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for contract in validated {
        let registration = ContractRegistration::from_validated(&config.namespace, contract);
        let key = registration.key();
        let outcome = with_retry(&config.retry, "register_contract", || {
            catalog.register_contract(&registration)
        })
        .await;

        match outcome {
            Ok(RegistrationOutcome::Registered) => {
                info!(key = %key, hash = %registration.schema_hash, "contract registered");
            }
            Ok(RegistrationOutcome::Conflict { existing_hash }) => {
                violations.push(
                    Violation::new(
                        ErrorCode::RegistrationConflict,
                        &registration.name,
                        format!("'{}' is already registered with a different schema", key),
                    )
                    .expected(existing_hash)
                    .actual(&registration.schema_hash)
                    .suggestion("Bump the contract version for schema changes"),
                );
            }
            Ok(RegistrationOutcome::Unreachable { reason }) => {
                warn!(key = %key, %reason, "catalog unreachable, contract not registered");
                violations.push(unreachable(&registration, &reason));
            }
            Err(e) => {
                warn!(key = %key, error = %e, "registration failed, contract not registered");
                violations.push(unreachable(&registration, &e.to_string()));
            }
        }
    }

    violations
}

fn unreachable(registration: &ContractRegistration, reason: &str) -> Violation {
    Violation::new(
        ErrorCode::CatalogUnreachable,
        &registration.name,
        format!("'{}' was not registered: {}", registration.key(), reason),
    )
    .suggestion("Run the compile again once the catalog is reachable")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::config::RetryPolicy;
    use crate::domain::contract::{ContractModel, Element, TableColumn};
    use crate::domain::enforcement::Severity;
    use crate::error::FloeError;
    use crate::infrastructure::adapters::{InMemoryCatalog, StaticTableStore};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    fn config() -> CatalogConfig {
        CatalogConfig {
            retry: RetryPolicy {
                max_attempts: 2,
                initial_backoff_ms: 1,
                max_backoff_ms: 1,
            },
            ..Default::default()
        }
    }

    fn contract(name: &str, version: &str) -> DataContract {
        DataContract {
            api_version: "v3.0.0".into(),
            kind: "DataContract".into(),
            name: name.into(),
            version: version.into(),
            owner: "data-team".into(),
            models: vec![ContractModel {
                name: "customers".into(),
                table: Some("crm.customers".into()),
                elements: vec![Element {
                    name: "customer_id".into(),
                    element_type: "string".into(),
                    required: true,
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    /// Table store that fails every call and counts them.
    #[derive(Default)]
    struct BrokenStore {
        calls: Arc<Mutex<u32>>,
    }

    #[async_trait]
    impl TableStore for BrokenStore {
        async fn table_exists(&self, _identifier: &str) -> Result<bool, FloeError> {
            *self.calls.lock().unwrap() += 1;
            Err(FloeError::Unavailable("warehouse down".into()))
        }

        async fn get_table_schema(&self, _identifier: &str) -> Result<Vec<TableColumn>, FloeError> {
            *self.calls.lock().unwrap() += 1;
            Err(FloeError::Unavailable("warehouse down".into()))
        }
    }

    #[tokio::test]
    async fn test_resolves_parent_baseline_and_tables() {
        let catalog = InMemoryCatalog::new();
        let baseline = ValidatedContract::new(contract("customers", "1.0.0"), Utc::now());
        catalog
            .seed(ContractRegistration::from_validated("default", &baseline))
            .unwrap();

        let mut child = contract("customers", "1.1.0");
        child.parent = Some("crm".into());
        let parent = contract("crm", "1.0.0");

        let store = StaticTableStore::new([TableSchema {
            identifier: "crm.customers".into(),
            columns: vec![TableColumn {
                name: "customer_id".into(),
                data_type: "varchar".into(),
                is_nullable: false,
            }],
        }]);

        let (inputs, warnings) =
            resolve_inputs(&[child, parent], &catalog, Some(&store as &dyn TableStore), &config()).await;

        assert!(warnings.is_empty());
        assert_eq!(inputs[0].parent.as_ref().map(|p| p.name.as_str()), Some("crm"));
        assert_eq!(inputs[0].baseline.as_ref().map(|b| b.version.as_str()), Some("1.0.0"));
        assert!(inputs[0].tables["customers"].is_some());
        assert!(inputs[1].baseline.is_none());
    }

    #[tokio::test]
    async fn test_missing_table_means_skip_not_failure() {
        let catalog = InMemoryCatalog::new();
        let store = StaticTableStore::new([]);
        let (inputs, warnings) =
            resolve_inputs(&[contract("customers", "1.0.0")], &catalog, Some(&store as &dyn TableStore), &config()).await;
        assert!(warnings.is_empty());
        assert_eq!(inputs[0].tables.get("customers"), Some(&None));
    }

    #[tokio::test]
    async fn test_collaborator_outage_becomes_warnings() {
        let catalog = InMemoryCatalog::new();
        catalog.set_offline(true);
        let store = BrokenStore::default();
        let calls = store.calls.clone();

        let (inputs, warnings) =
            resolve_inputs(&[contract("customers", "1.0.0")], &catalog, Some(&store as &dyn TableStore), &config()).await;

        let codes: Vec<ErrorCode> = warnings.iter().map(|v| v.code).collect();
        assert_eq!(codes, vec![ErrorCode::CatalogUnreachable, ErrorCode::TableSchemaUnavailable]);
        assert!(warnings.iter().all(|v| v.severity == Severity::Warning));
        assert!(inputs[0].tables.is_empty());
        assert_eq!(*calls.lock().unwrap(), 2, "table_exists retried once");
    }

    #[tokio::test]
    async fn test_registration_outcomes() {
        let catalog = InMemoryCatalog::new();
        let first = ValidatedContract::new(contract("customers", "1.0.0"), Utc::now());
        assert!(register_validated(&[first.clone()], &catalog, &config()).await.is_empty());
        assert_eq!(catalog.keys(), vec!["default/customers:1.0.0".to_string()]);

        // Same key, same hash: idempotent.
        assert!(register_validated(&[first], &catalog, &config()).await.is_empty());

        let mut changed = contract("customers", "1.0.0");
        changed.models[0].elements[0].element_type = "int".into();
        let changed = ValidatedContract::new(changed, Utc::now());
        let violations = register_validated(&[changed], &catalog, &config()).await;
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ErrorCode::RegistrationConflict);
        assert_eq!(violations[0].severity, Severity::Error);

        catalog.set_offline(true);
        let next = ValidatedContract::new(contract("customers", "1.1.0"), Utc::now());
        let violations = register_validated(&[next], &catalog, &config()).await;
        assert_eq!(violations[0].code, ErrorCode::CatalogUnreachable);
        assert_eq!(violations[0].severity, Severity::Warning);
    }
}
