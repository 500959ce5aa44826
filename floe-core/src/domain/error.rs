// floe-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::enforcement::Violation;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Unknown policy type: '{0}'")]
    #[diagnostic(
        code(floe::domain::unknown_policy_type),
        help("Supported types: classification, quality_gate, test_coverage, sql_linting, contract_enforcement, availability, freshness.")
    )]
    UnknownPolicyType(String),

    #[error("Policy value '{value}' is not a valid '{policy_type}' payload")]
    #[diagnostic(
        code(floe::domain::policy_type_mismatch),
        help("Parent and child must carry the same kind of policy value.")
    )]
    PolicyTypeMismatch { policy_type: String, value: String },

    #[error("Invalid policy value for '{policy_type}': {reason}")]
    #[diagnostic(code(floe::domain::invalid_policy_value))]
    InvalidPolicyValue { policy_type: String, reason: String },

    #[error("Manifest '{manifest}' cannot be merged: {} conflict(s)", .violations.len())]
    #[diagnostic(
        code(floe::domain::merge_conflict),
        help("A child manifest may only strengthen its parent's policies.")
    )]
    MergeConflict {
        manifest: String,
        violations: Vec<Violation>,
    },

    #[error("Invalid scoring configuration: {0}")]
    #[diagnostic(code(floe::domain::scoring_config))]
    InvalidScoringConfig(String),

    #[error("Invalid semantic version: '{0}'")]
    #[diagnostic(code(floe::domain::semver), help("Use MAJOR.MINOR.PATCH, e.g. 1.2.0"))]
    InvalidVersion(String),

    #[error("Invalid ISO-8601 duration: '{0}'")]
    #[diagnostic(code(floe::domain::duration), help("Examples: PT6H, P1D, P1DT12H"))]
    InvalidDuration(String),

    #[error("Manifest Error: {0}")]
    #[diagnostic(code(floe::domain::manifest))]
    ManifestError(String),
}
