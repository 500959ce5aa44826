// floe-core/src/domain/contract/validator.rs

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

use super::drift::{self, TableSchema};
use super::model::{DataContract, ValidatedContract};
use super::structural::subject_of;
use super::{inheritance, structural, versioning};
use crate::domain::enforcement::{ErrorCode, Violation};

/// Everything the validator needs about one contract, resolved up front by the caller.
#[derive(Debug, Clone, Default)]
pub struct ContractInputs {
    pub contract: DataContract,
    /// Nearest ancestor with the strictest guarantees of the whole chain folded in.
    /// `None` with `contract.parent` set means the lookup failed.
    pub parent: Option<DataContract>,
    /// Last registered version of this contract. `None` on first registration.
    pub baseline: Option<DataContract>,
    /// Live schema per model name. A missing key means no storage collaborator was
    /// consulted; `Some(None)` means the table does not exist yet.
    pub tables: BTreeMap<String, Option<TableSchema>>,
}

impl ContractInputs {
    pub fn new(contract: DataContract) -> Self {
        Self {
            contract,
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent: DataContract) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_baseline(mut self, baseline: DataContract) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn with_table(mut self, model: impl Into<String>, table: Option<TableSchema>) -> Self {
        self.tables.insert(model.into(), table);
        self
    }
}

/// Composes the structural, inheritance, versioning and drift checks.
/// Each check is also callable on its own through the associated functions.
#[derive(Debug, Clone, Copy)]
pub struct ContractValidator {
    max_violations: usize,
}

impl Default for ContractValidator {
    fn default() -> Self {
        Self {
            max_violations: 1000,
        }
    }
}

impl ContractValidator {
    pub fn new(max_violations: usize) -> Self {
        Self { max_violations }
    }

    pub fn structural(contract: &DataContract) -> Vec<Violation> {
        structural::check(contract)
    }

    pub fn inheritance(contract: &DataContract, parent: &DataContract) -> Vec<Violation> {
        inheritance::check(contract, parent)
    }

    pub fn versioning(contract: &DataContract, baseline: Option<&DataContract>) -> Vec<Violation> {
        versioning::check(contract, baseline)
    }

    pub fn drift(contract: &DataContract, tables: &BTreeMap<String, Option<TableSchema>>) -> Vec<Violation> {
        contract
            .models
            .iter()
            .filter_map(|model| {
                tables
                    .get(&model.name)
                    .map(|table| drift::check(&contract.name, model, table.as_ref()))
            })
            .flatten()
            .collect()
    }

    /// Runs every check in order and stops as soon as the cap is reached.
    pub fn validate(&self, inputs: &ContractInputs) -> Vec<Violation> {
        let contract = &inputs.contract;
        let mut out: Vec<Violation> = Vec::new();

        let stages: [(&str, &dyn Fn() -> Vec<Violation>); 4] = [
            ("structural", &|| Self::structural(contract)),
            ("inheritance", &|| self.inheritance_stage(inputs)),
            ("versioning", &|| Self::versioning(contract, inputs.baseline.as_ref())),
            ("drift", &|| Self::drift(contract, &inputs.tables)),
        ];

        for (stage, run) in stages {
            if out.len() >= self.max_violations {
                debug!(contract = %contract.name, stage, "violation cap reached, skipping stage");
                break;
            }
            let found = run();
            debug!(contract = %contract.name, stage, count = found.len(), "contract check done");
            out.extend(found);
        }

        out.truncate(self.max_violations);
        out
    }

    fn inheritance_stage(&self, inputs: &ContractInputs) -> Vec<Violation> {
        match (&inputs.contract.parent, &inputs.parent) {
            (_, Some(parent)) => Self::inheritance(&inputs.contract, parent),
            (Some(parent_name), None) => vec![
                Violation::new(
                    ErrorCode::UnresolvedParentContract,
                    subject_of(&inputs.contract),
                    format!("Parent contract '{}' could not be found", parent_name),
                )
                .suggestion("Declare the parent contract in the project or fix the 'parent' reference"),
            ],
            (None, None) => Vec::new(),
        }
    }

    /// Attaches the schema hash and timestamp once a contract has no blocking finding.
    pub fn seal(
        contract: &DataContract,
        violations: &[Violation],
        at: DateTime<Utc>,
    ) -> Option<ValidatedContract> {
        if violations.iter().any(Violation::is_error) {
            return None;
        }
        Some(ValidatedContract::new(contract.clone(), at))
    }
}
