// floe-core/src/domain/enforcement/validator.rs

use serde::Serialize;
use std::fmt;

use super::violation::{Violation, ViolationCategory};
use super::{coverage, custom, documentation, naming, semantic};
use crate::domain::config::GovernanceConfig;
use crate::domain::contract::{ContractInputs, ContractValidator};
use crate::domain::project::Project;

/// Everything a validator may look at. Borrowed; validators never own or mutate input.
#[derive(Debug, Clone, Copy)]
pub struct ValidationInput<'a> {
    pub project: &'a Project,
    pub contracts: &'a [ContractInputs],
    pub config: &'a GovernanceConfig,
}

/// The closed set of validators the engine runs, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    Naming,
    Coverage,
    Documentation,
    Semantic,
    Custom,
    DataContract,
}

impl Validator {
    pub const ALL: [Self; 6] = [
        Self::Naming,
        Self::Coverage,
        Self::Documentation,
        Self::Semantic,
        Self::Custom,
        Self::DataContract,
    ];

    pub fn category(&self) -> ViolationCategory {
        match self {
            Self::Naming => ViolationCategory::Naming,
            Self::Coverage => ViolationCategory::Coverage,
            Self::Documentation => ViolationCategory::Documentation,
            Self::Semantic => ViolationCategory::Semantic,
            Self::Custom => ViolationCategory::Custom,
            Self::DataContract => ViolationCategory::DataContract,
        }
    }

    pub fn validate(&self, input: &ValidationInput<'_>) -> Vec<Violation> {
        let ValidationInput {
            project,
            contracts,
            config,
        } = *input;
        match self {
            Self::Naming => naming::check(project, &config.naming),
            Self::Coverage => coverage::check(project, &config.coverage),
            Self::Documentation => documentation::check(project, &config.documentation),
            Self::Semantic => semantic::check(project),
            Self::Custom => custom::check(project, &config.custom_rules),
            Self::DataContract => {
                let validator = ContractValidator::new(config.max_violations);
                contracts.iter().flat_map(|c| validator.validate(c)).collect()
            }
        }
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category().as_str())
    }
}
