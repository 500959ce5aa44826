// floe-core/src/application/governance.rs

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::contracts::{register_validated, resolve_inputs};
use super::manifests::resolve_manifests;
use crate::domain::config::{EnforcementMode, GovernanceConfig};
use crate::domain::contract::{ContractValidator, DataContract, ValidatedContract};
use crate::domain::enforcement::{
    EnforcementResult, GovernanceArea, ResultAggregator, Severity, ValidationInput, Validator, Violation,
    ViolationCategory,
};
use crate::domain::manifest::Manifest;
use crate::domain::project::Project;
use crate::domain::quality::{CheckResult, QualityScorer};
use crate::domain::registry::PluginRegistry;
use crate::error::FloeError;
use crate::ports::catalog::ContractCatalog;
use crate::ports::storage::TableStore;

/// Everything one compile run validates, already parsed.
#[derive(Debug, Clone, Default)]
pub struct CompileRequest {
    pub manifests: Vec<Manifest>,
    pub contracts: Vec<DataContract>,
    pub project: Project,
    /// Executed check results. `None` skips quality scoring.
    pub quality_results: Option<Vec<CheckResult>>,
}

/// Compile-time entry point. Owns the configuration and the collaborators,
/// runs every stage, and is the only place where enforcement modes apply.
pub struct GovernanceEngine {
    config: GovernanceConfig,
    registry: PluginRegistry,
    scorer: QualityScorer,
    catalog: Arc<dyn ContractCatalog>,
    tables: Option<Arc<dyn TableStore>>,
}

impl GovernanceEngine {
    pub fn new(
        config: GovernanceConfig,
        registry: PluginRegistry,
        catalog: Arc<dyn ContractCatalog>,
    ) -> Result<Self, FloeError> {
        let scorer = QualityScorer::new(config.scoring.clone())?;
        Ok(Self {
            config,
            registry,
            scorer,
            catalog,
            tables: None,
        })
    }

    /// Enables drift detection against live tables.
    pub fn with_table_store(mut self, tables: Arc<dyn TableStore>) -> Self {
        self.tables = Some(tables);
        self
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    pub fn scorer(&self) -> &QualityScorer {
        &self.scorer
    }

    /// Resolved manifest plus raw (undisposed) chain and plugin findings.
    pub fn resolve_manifests(&self, manifests: &[Manifest]) -> (Option<Manifest>, Vec<Violation>) {
        resolve_manifests(manifests, &self.registry)
    }

    fn mode_for(&self, violation: &Violation) -> EnforcementMode {
        let modes = &self.config.enforcement;
        match violation.code.area() {
            GovernanceArea::Drift => modes.drift,
            GovernanceArea::Quality => modes.quality,
            GovernanceArea::Policy if violation.category == ViolationCategory::Manifest => modes.policy,
            GovernanceArea::Model => match violation.category {
                ViolationCategory::Naming => modes.naming,
                ViolationCategory::Coverage => modes.coverage,
                ViolationCategory::Documentation => modes.documentation,
                ViolationCategory::Semantic => modes.semantic,
                _ => modes.custom,
            },
            _ => modes.data_contracts,
        }
    }

    /// Decides error vs. warning for one finding. `None` means dropped.
    pub fn dispose(&self, violation: Violation) -> Option<Violation> {
        match violation.code.area() {
            GovernanceArea::Structural => Some(violation.with_severity(Severity::Error)),
            GovernanceArea::Infrastructure => Some(violation.with_severity(Severity::Warning)),
            // Undeclared columns and skipped checks are reported whatever the mode.
            GovernanceArea::Drift if violation.severity == Severity::Info => Some(violation),
            _ => match self.mode_for(&violation) {
                EnforcementMode::Off => {
                    debug!(code = %violation.code, subject = %violation.subject, "finding dropped (enforcement off)");
                    None
                }
                EnforcementMode::Warn if violation.is_error() => Some(violation.with_severity(Severity::Warning)),
                _ => Some(violation),
            },
        }
    }

    fn push_all(&self, aggregator: &mut ResultAggregator, violations: Vec<Violation>) -> bool {
        aggregator.extend(violations.into_iter().filter_map(|v| self.dispose(v)))
    }

    /// Runs one full compile: manifests, model validators, contracts, quality,
    /// then registration of the contracts that came out clean.
    #[instrument(skip_all, fields(
        manifests = request.manifests.len(),
        contracts = request.contracts.len(),
        models = request.project.models.len(),
    ))]
    pub async fn enforce(&self, request: &CompileRequest) -> Result<EnforcementResult, FloeError> {
        let mut aggregator = ResultAggregator::new(self.config.max_violations);

        // 1. Manifest chain
        let (manifest, manifest_findings) = self.resolve_manifests(&request.manifests);
        self.push_all(&mut aggregator, manifest_findings);

        // 2. Collaborator lookups (baselines, live schemas)
        let (inputs, lookup_warnings) = resolve_inputs(
            &request.contracts,
            self.catalog.as_ref(),
            self.tables.as_deref(),
            &self.config.catalog,
        )
        .await;
        self.push_all(&mut aggregator, lookup_warnings);

        // 3. Validators, in fixed order, stopping at the cap
        let all_inputs = ValidationInput {
            project: &request.project,
            contracts: &inputs,
            config: &self.config,
        };
        let now = Utc::now();
        let mut sealed: Vec<ValidatedContract> = Vec::new();

        for validator in Validator::ALL {
            if aggregator.is_full() {
                debug!(%validator, "violation cap reached, skipping validator");
                continue;
            }
            if validator != Validator::DataContract {
                let found = validator.validate(&all_inputs);
                debug!(%validator, count = found.len(), "validator done");
                self.push_all(&mut aggregator, found);
                continue;
            }

            // Contracts run one at a time so each keeps its own findings for sealing.
            for input in &inputs {
                if aggregator.is_full() {
                    break;
                }
                let single = ValidationInput {
                    contracts: std::slice::from_ref(input),
                    ..all_inputs
                };
                let disposed: Vec<Violation> = validator
                    .validate(&single)
                    .into_iter()
                    .filter_map(|v| self.dispose(v))
                    .collect();
                if let Some(validated) = ContractValidator::seal(&input.contract, &disposed, now) {
                    sealed.push(validated);
                }
                aggregator.extend(disposed);
            }
        }

        // 4. Quality score and gates
        let quality = request.quality_results.as_ref().map(|results| {
            let score = self.scorer.score(results);
            let subject = if request.project.name.is_empty() {
                "project"
            } else {
                request.project.name.as_str()
            };
            info!(score = score.overall, checks = score.checks, "quality scored");
            self.push_all(&mut aggregator, self.scorer.gate(&score, subject));
            score
        });

        // 5. Registration, only when the compile itself would pass
        if self.config.catalog.register && !sealed.is_empty() {
            if aggregator.has_errors() {
                info!(contracts = sealed.len(), "compile failed, contracts not registered");
            } else {
                let findings = register_validated(&sealed, self.catalog.as_ref(), &self.config.catalog).await;
                self.push_all(&mut aggregator, findings);
            }
        }

        let mut result = EnforcementResult::from_aggregator(aggregator);
        result.manifest = manifest;
        result.contracts = sealed;
        result.quality = quality;

        if result.summary.truncated {
            warn!(dropped = result.summary.dropped, "violation cap reached, report truncated");
        }
        info!(
            passed = result.passed,
            errors = result.summary.errors,
            warnings = result.summary.warnings,
            "enforcement finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::config::EnforcementModes;
    use crate::domain::contract::{ContractModel, Element, TableColumn, TableSchema};
    use crate::domain::enforcement::ErrorCode;
    use crate::domain::manifest::{ManifestValue, Scope};
    use crate::domain::policy::{ClassificationLevel, Policy};
    use crate::domain::project::ModelNode;
    use crate::domain::quality::CheckSeverity;
    use crate::infrastructure::adapters::{InMemoryCatalog, StaticTableStore};
    use crate::ports::catalog::{ContractRegistration, RegistrationOutcome};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn policy(t: &str, raw: &str) -> ManifestValue {
        ManifestValue::Policy(Policy::parse(t, raw).unwrap())
    }

    fn manifests(product_gate: &str) -> Vec<Manifest> {
        vec![
            Manifest::new("acme", Scope::Enterprise)
                .with_field("quality_gate", policy("quality_gate", "80"))
                .with_field("compute", ManifestValue::Text("duckdb".into())),
            Manifest::new("finance", Scope::Domain).with_parent("acme"),
            Manifest::new("ledger", Scope::Product)
                .with_parent("finance")
                .with_field("quality_gate", policy("quality_gate", product_gate)),
        ]
    }

    fn contract() -> DataContract {
        DataContract {
            api_version: "v3.0.0".into(),
            kind: "DataContract".into(),
            name: "customers".into(),
            version: "1.0.0".into(),
            owner: "crm-team".into(),
            models: vec![ContractModel {
                name: "customers".into(),
                table: Some("crm.customers".into()),
                elements: vec![
                    Element {
                        name: "customer_id".into(),
                        element_type: "string".into(),
                        required: true,
                        primary_key: true,
                        ..Default::default()
                    },
                    Element {
                        name: "email".into(),
                        element_type: "string".into(),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn table(customer_id_type: &str) -> TableSchema {
        TableSchema {
            identifier: "crm.customers".into(),
            columns: vec![
                TableColumn {
                    name: "customer_id".into(),
                    data_type: customer_id_type.into(),
                    is_nullable: false,
                },
                TableColumn {
                    name: "email".into(),
                    data_type: "varchar".into(),
                    is_nullable: true,
                },
                TableColumn {
                    name: "internal_notes".into(),
                    data_type: "varchar".into(),
                    is_nullable: true,
                },
            ],
        }
    }

    fn quiet_models() -> EnforcementModes {
        EnforcementModes {
            naming: EnforcementMode::Off,
            coverage: EnforcementMode::Off,
            documentation: EnforcementMode::Off,
            semantic: EnforcementMode::Off,
            custom: EnforcementMode::Off,
            ..Default::default()
        }
    }

    fn engine_with(config: GovernanceConfig, catalog: Arc<dyn ContractCatalog>) -> GovernanceEngine {
        GovernanceEngine::new(config, PluginRegistry::with_defaults(), catalog).unwrap()
    }

    fn config() -> GovernanceConfig {
        GovernanceConfig {
            enforcement: quiet_models(),
            ..Default::default()
        }
    }

    fn codes(result: &EnforcementResult) -> Vec<ErrorCode> {
        result.violations.iter().map(|v| v.code).collect()
    }

    /// Records registrations; optionally answers every call with an error.
    #[derive(Default)]
    struct RecordingCatalog {
        registered: Mutex<Vec<String>>,
        failing: bool,
    }

    #[async_trait]
    impl ContractCatalog for RecordingCatalog {
        async fn get_baseline_contract(&self, _ns: &str, _name: &str) -> Result<Option<DataContract>, FloeError> {
            if self.failing {
                return Err(FloeError::Unavailable("connection refused".into()));
            }
            Ok(None)
        }

        async fn register_contract(
            &self,
            registration: &ContractRegistration,
        ) -> Result<RegistrationOutcome, FloeError> {
            if self.failing {
                return Ok(RegistrationOutcome::Unreachable {
                    reason: "connection refused".into(),
                });
            }
            self.registered.lock().unwrap().push(registration.key());
            Ok(RegistrationOutcome::Registered)
        }
    }

    #[tokio::test]
    async fn test_clean_compile_registers_contracts() {
        let catalog = Arc::new(RecordingCatalog::default());
        let engine = engine_with(config(), catalog.clone());
        let request = CompileRequest {
            manifests: manifests("90"),
            contracts: vec![contract()],
            ..Default::default()
        };

        let result = engine.enforce(&request).await.unwrap();

        assert!(result.passed, "{:?}", result.violations);
        assert_eq!(result.contracts.len(), 1);
        let manifest = result.manifest.unwrap();
        assert_eq!(manifest.name, "ledger");
        assert_eq!(manifest.field("quality_gate").unwrap().to_string(), "90");
        assert_eq!(*catalog.registered.lock().unwrap(), vec!["default/customers:1.0.0".to_string()]);
    }

    #[tokio::test]
    async fn test_weakened_policy_fails_under_strict_and_blocks_registration() {
        let catalog = Arc::new(RecordingCatalog::default());
        let engine = engine_with(config(), catalog.clone());
        let request = CompileRequest {
            manifests: manifests("70"),
            contracts: vec![contract()],
            ..Default::default()
        };

        let result = engine.enforce(&request).await.unwrap();

        assert!(!result.passed);
        assert_eq!(codes(&result), vec![ErrorCode::PolicyWeakened]);
        let v = &result.violations[0];
        assert_eq!(v.expected.as_deref(), Some("80"));
        assert_eq!(v.actual.as_deref(), Some("70"));
        // The contract itself is clean, but nothing is registered on a failing compile.
        assert_eq!(result.contracts.len(), 1);
        assert!(catalog.registered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_warn_mode_downgrades_policy_findings() {
        let mut config = config();
        config.enforcement.policy = EnforcementMode::Warn;
        let engine = engine_with(config, Arc::new(InMemoryCatalog::new()));
        let request = CompileRequest {
            manifests: manifests("70"),
            ..Default::default()
        };

        let result = engine.enforce(&request).await.unwrap();

        assert!(result.passed);
        assert_eq!(result.summary.warnings, 1);
        assert_eq!(result.violations[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_drift_modes() {
        let store: Arc<dyn TableStore> = Arc::new(StaticTableStore::new([table("int")]));
        let request = CompileRequest {
            contracts: vec![contract()],
            ..Default::default()
        };

        // Default drift mode is warn: the mismatch is reported but does not fail.
        let engine = engine_with(config(), Arc::new(InMemoryCatalog::new())).with_table_store(store.clone());
        let result = engine.enforce(&request).await.unwrap();
        assert!(result.passed);
        assert_eq!(
            codes(&result),
            vec![ErrorCode::DriftTypeMismatch, ErrorCode::DriftUndeclaredColumn]
        );
        assert_eq!(result.violations[0].severity, Severity::Warning);
        assert_eq!(result.violations[1].severity, Severity::Info);

        let mut strict = config();
        strict.enforcement.drift = EnforcementMode::Strict;
        let engine = engine_with(strict, Arc::new(InMemoryCatalog::new())).with_table_store(store);
        let result = engine.enforce(&request).await.unwrap();
        assert!(!result.passed);
        assert!(result.contracts.is_empty(), "a contract with blocking drift is not sealed");
    }

    #[tokio::test]
    async fn test_grandparent_contract_guarantees_hold_through_a_silent_domain() {
        let engine = engine_with(config(), Arc::new(InMemoryCatalog::new()));
        let mut enterprise = contract();
        enterprise.name = "enterprise_customers".into();
        enterprise.sla.freshness = Some("PT6H".into());
        enterprise.models[0].elements[1].classification = Some(ClassificationLevel::Confidential);
        let mut domain = contract();
        domain.name = "sales_customers".into();
        domain.parent = Some("enterprise_customers".into());
        let mut product = contract();
        product.parent = Some("sales_customers".into());
        product.sla.freshness = Some("P1D".into());
        product.models[0].elements[1].classification = Some(ClassificationLevel::Public);
        let request = CompileRequest {
            contracts: vec![enterprise, domain, product],
            ..Default::default()
        };

        let result = engine.enforce(&request).await.unwrap();

        assert!(!result.passed);
        assert_eq!(
            codes(&result),
            vec![ErrorCode::SlaRelaxed, ErrorCode::ClassificationWeakened]
        );
        assert!(result.violations.iter().all(|v| v.subject.starts_with("customers")));
        assert_eq!(result.contracts.len(), 2, "only the product contract is blocked");
    }

    #[tokio::test]
    async fn test_drift_off_still_reports_informational_findings() {
        let mut off = config();
        off.enforcement.drift = EnforcementMode::Off;
        let request = CompileRequest {
            contracts: vec![contract()],
            ..Default::default()
        };

        let store: Arc<dyn TableStore> = Arc::new(StaticTableStore::new([table("int")]));
        let engine = engine_with(off.clone(), Arc::new(InMemoryCatalog::new())).with_table_store(store);
        let result = engine.enforce(&request).await.unwrap();
        assert!(result.passed);
        assert_eq!(codes(&result), vec![ErrorCode::DriftUndeclaredColumn]);
        assert_eq!(result.violations[0].severity, Severity::Info);

        let empty: Arc<dyn TableStore> = Arc::new(StaticTableStore::new([]));
        let engine = engine_with(off, Arc::new(InMemoryCatalog::new())).with_table_store(empty);
        let result = engine.enforce(&request).await.unwrap();
        assert!(result.passed);
        assert_eq!(codes(&result), vec![ErrorCode::DriftSkipped]);
    }

    #[tokio::test]
    async fn test_catalog_outage_never_fails_the_compile() {
        let catalog = Arc::new(RecordingCatalog {
            failing: true,
            ..Default::default()
        });
        let mut config = config();
        config.catalog.retry.max_attempts = 1;
        let engine = engine_with(config, catalog);
        let request = CompileRequest {
            contracts: vec![contract()],
            ..Default::default()
        };

        let result = engine.enforce(&request).await.unwrap();

        assert!(result.passed);
        assert_eq!(
            codes(&result),
            vec![ErrorCode::CatalogUnreachable, ErrorCode::CatalogUnreachable]
        );
        assert_eq!(result.contracts.len(), 1, "contract kept in the local result");
    }

    #[tokio::test]
    async fn test_structural_findings_ignore_enforcement_modes() {
        let mut config = config();
        config.enforcement.data_contracts = EnforcementMode::Off;
        let engine = engine_with(config, Arc::new(InMemoryCatalog::new()));
        let mut broken = contract();
        broken.version = "one".into();
        let request = CompileRequest {
            contracts: vec![broken],
            ..Default::default()
        };

        let result = engine.enforce(&request).await.unwrap();

        assert!(!result.passed);
        assert!(codes(&result).contains(&ErrorCode::InvalidVersion));
    }

    #[tokio::test]
    async fn test_quality_gate() {
        let engine = engine_with(config(), Arc::new(InMemoryCatalog::new()));
        let failing: Vec<CheckResult> = ["completeness", "accuracy"]
            .iter()
            .map(|d| CheckResult::new(format!("{d}_check"), *d, CheckSeverity::Critical, false))
            .collect();
        let request = CompileRequest {
            quality_results: Some(failing),
            ..Default::default()
        };

        let result = engine.enforce(&request).await.unwrap();

        assert!(!result.passed);
        assert_eq!(codes(&result), vec![ErrorCode::QualityBelowMinimum]);
        assert_eq!(result.quality.unwrap().overall, 20.0);
    }

    #[tokio::test]
    async fn test_model_validators_follow_their_modes() {
        let mut config = GovernanceConfig::default();
        config.enforcement.semantic = EnforcementMode::Strict;
        config.enforcement.naming = EnforcementMode::Off;
        config.enforcement.coverage = EnforcementMode::Off;
        config.enforcement.documentation = EnforcementMode::Off;
        let engine = engine_with(config, Arc::new(InMemoryCatalog::new()));
        let request = CompileRequest {
            project: Project {
                name: "shop".into(),
                models: vec![ModelNode {
                    name: "orders".into(),
                    refs: vec!["missing".into()],
                    ..Default::default()
                }],
            },
            ..Default::default()
        };

        let result = engine.enforce(&request).await.unwrap();

        assert!(!result.passed);
        assert_eq!(codes(&result), vec![ErrorCode::UnresolvedRef]);
    }

    #[tokio::test]
    async fn test_cap_bounds_the_report() {
        let mut config = config();
        config.max_violations = 2;
        config.enforcement.semantic = EnforcementMode::Strict;
        let engine = engine_with(config, Arc::new(InMemoryCatalog::new()));
        let models = (0..5)
            .map(|i| ModelNode {
                name: format!("m{i}"),
                refs: vec!["ghost".into()],
                ..Default::default()
            })
            .collect();
        let request = CompileRequest {
            project: Project {
                name: "big".into(),
                models,
            },
            contracts: vec![contract()],
            ..Default::default()
        };

        let result = engine.enforce(&request).await.unwrap();

        assert_eq!(result.violations.len(), 2);
        assert!(result.summary.truncated);
        assert_eq!(result.summary.dropped, 3);
        assert!(!result.passed);
        assert!(result.contracts.is_empty(), "contract stage skipped once the cap is hit");
    }
}
