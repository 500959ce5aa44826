// floe-core/src/domain/enforcement/violation.rs

use serde::{Serialize, Serializer};
use std::fmt;

use crate::domain::policy::PolicyType;

/// Severity as emitted. Declaration order is report order (errors first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary bucket. One per `Validator` variant, plus manifest and quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    Naming,
    Coverage,
    Documentation,
    Semantic,
    Custom,
    DataContract,
    Manifest,
    Quality,
}

impl ViolationCategory {
    pub const ALL: [Self; 8] = [
        Self::Naming,
        Self::Coverage,
        Self::Documentation,
        Self::Semantic,
        Self::Custom,
        Self::DataContract,
        Self::Manifest,
        Self::Quality,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Naming => "naming",
            Self::Coverage => "coverage",
            Self::Documentation => "documentation",
            Self::Semantic => "semantic",
            Self::Custom => "custom",
            Self::DataContract => "data_contract",
            Self::Manifest => "manifest",
            Self::Quality => "quality",
        }
    }
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error-handling class, used only by the orchestrator to pick a disposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceArea {
    /// Malformed input. Always fatal.
    Structural,
    /// Weakening, bump mismatch, subset violation. Gated by enforcement mode.
    Policy,
    /// Live-schema divergence. Gated by drift enforcement mode.
    Drift,
    /// Quality score gates. Gated by quality enforcement mode.
    Quality,
    /// Model-graph rules (naming, coverage...). Gated per validator.
    Model,
    /// Collaborator failures. Never fatal.
    Infrastructure,
}

/// Stable error codes. External tooling matches on the string form,
/// so existing codes must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCode {
    // --- model validators ---
    NamingPattern,
    CoverageBelowMinimum,
    ModelUndocumented,
    ColumnUndocumented,
    UnresolvedRef,
    SelfReference,
    MissingRequiredTag,
    ForbiddenName,
    MissingMetaKey,
    // --- contract structure ---
    MissingRequiredField,
    InvalidElementType,
    InvalidDuration,
    InvalidPercentage,
    InvalidVersion,
    DuplicateDefinition,
    UnresolvedParentContract,
    UnsafeName,
    // --- contract inheritance ---
    SlaRelaxed,
    ClassificationWeakened,
    // --- versioning ---
    InsufficientVersionBump,
    VersionNotIncremented,
    // --- drift ---
    DriftTypeMismatch,
    DriftMissingColumn,
    DriftUndeclaredColumn,
    DriftSkipped,
    // --- quality ---
    QualityBelowMinimum,
    QualityBelowWarning,
    // --- manifest ---
    PolicyWeakened,
    IntersectViolation,
    UnknownPolicyType,
    InvalidScopeChain,
    UnknownPlugin,
    // --- infrastructure ---
    CatalogUnreachable,
    RegistrationConflict,
    TableSchemaUnavailable,
}

struct CodeDef {
    code: ErrorCode,
    id: &'static str,
    category: ViolationCategory,
    area: GovernanceArea,
    severity: Severity,
    title: &'static str,
}

const fn code_def(
    code: ErrorCode,
    id: &'static str,
    category: ViolationCategory,
    area: GovernanceArea,
    severity: Severity,
    title: &'static str,
) -> CodeDef {
    CodeDef {
        code,
        id,
        category,
        area,
        severity,
        title,
    }
}

use ErrorCode as C;
use GovernanceArea as A;
use Severity as S;
use ViolationCategory as K;

const CODES: &[CodeDef] = &[
    code_def(C::NamingPattern, "FLOE-E401", K::Naming, A::Model, S::Error, "Model name does not match naming convention"),
    code_def(C::CoverageBelowMinimum, "FLOE-E410", K::Coverage, A::Model, S::Error, "Test coverage below minimum"),
    code_def(C::ModelUndocumented, "FLOE-E420", K::Documentation, A::Model, S::Error, "Model has no description"),
    code_def(C::ColumnUndocumented, "FLOE-E421", K::Documentation, A::Model, S::Warning, "Column has no description"),
    code_def(C::UnresolvedRef, "FLOE-E430", K::Semantic, A::Model, S::Error, "Reference to unknown model"),
    code_def(C::SelfReference, "FLOE-E431", K::Semantic, A::Model, S::Error, "Model references itself"),
    code_def(C::MissingRequiredTag, "FLOE-E440", K::Custom, A::Model, S::Error, "Required tag missing"),
    code_def(C::ForbiddenName, "FLOE-E441", K::Custom, A::Model, S::Error, "Model name contains forbidden text"),
    code_def(C::MissingMetaKey, "FLOE-E442", K::Custom, A::Model, S::Error, "Required meta key missing"),
    code_def(C::MissingRequiredField, "FLOE-E500", K::DataContract, A::Structural, S::Error, "Required contract field missing"),
    code_def(C::InvalidElementType, "FLOE-E501", K::DataContract, A::Structural, S::Error, "Invalid element type"),
    code_def(C::InvalidDuration, "FLOE-E502", K::DataContract, A::Structural, S::Error, "Invalid ISO-8601 duration"),
    code_def(C::InvalidPercentage, "FLOE-E503", K::DataContract, A::Structural, S::Error, "Invalid percentage"),
    code_def(C::InvalidVersion, "FLOE-E504", K::DataContract, A::Structural, S::Error, "Invalid semantic version"),
    code_def(C::DuplicateDefinition, "FLOE-E505", K::DataContract, A::Structural, S::Error, "Duplicate model or element"),
    code_def(C::UnresolvedParentContract, "FLOE-E506", K::DataContract, A::Structural, S::Error, "Parent contract not found"),
    code_def(C::UnsafeName, "FLOE-E507", K::DataContract, A::Structural, S::Error, "Contract name is not a safe path segment"),
    code_def(C::SlaRelaxed, "FLOE-E510", K::DataContract, A::Policy, S::Error, "SLA relaxed relative to parent contract"),
    code_def(C::ClassificationWeakened, "FLOE-E511", K::DataContract, A::Policy, S::Error, "Element classification weakened"),
    code_def(C::InsufficientVersionBump, "FLOE-E520", K::DataContract, A::Policy, S::Error, "Version bump too small for changes"),
    code_def(C::VersionNotIncremented, "FLOE-E521", K::DataContract, A::Policy, S::Error, "Version not greater than baseline"),
    code_def(C::DriftTypeMismatch, "FLOE-E530", K::DataContract, A::Drift, S::Error, "Column type differs from contract"),
    code_def(C::DriftMissingColumn, "FLOE-E531", K::DataContract, A::Drift, S::Error, "Contract element missing from table"),
    code_def(C::DriftUndeclaredColumn, "FLOE-E532", K::DataContract, A::Drift, S::Info, "Table column not declared in contract"),
    code_def(C::DriftSkipped, "FLOE-E533", K::DataContract, A::Drift, S::Info, "Drift check skipped"),
    code_def(C::QualityBelowMinimum, "FLOE-E540", K::Quality, A::Quality, S::Error, "Quality score below minimum"),
    code_def(C::QualityBelowWarning, "FLOE-E541", K::Quality, A::Quality, S::Warning, "Quality score below warning threshold"),
    code_def(C::PolicyWeakened, "FLOE-E550", K::Manifest, A::Policy, S::Error, "Child manifest weakens parent policy"),
    code_def(C::IntersectViolation, "FLOE-E551", K::Manifest, A::Policy, S::Error, "Child set is not a subset of parent set"),
    code_def(C::UnknownPolicyType, "FLOE-E552", K::Manifest, A::Policy, S::Error, "Unknown policy type"),
    code_def(C::InvalidScopeChain, "FLOE-E553", K::Manifest, A::Structural, S::Error, "Invalid manifest inheritance chain"),
    code_def(C::UnknownPlugin, "FLOE-E554", K::Manifest, A::Structural, S::Error, "Plugin not registered"),
    code_def(C::CatalogUnreachable, "FLOE-E560", K::DataContract, A::Infrastructure, S::Warning, "Catalog unreachable"),
    code_def(C::RegistrationConflict, "FLOE-E561", K::DataContract, A::Policy, S::Error, "Contract version already registered with a different schema"),
    code_def(C::TableSchemaUnavailable, "FLOE-E562", K::DataContract, A::Infrastructure, S::Warning, "Table schema unavailable"),
];

impl ErrorCode {
    fn def(&self) -> &'static CodeDef {
        CODES
            .iter()
            .find(|s| s.code == *self)
            .unwrap_or(&CODES[0])
    }

    pub fn as_str(&self) -> &'static str {
        self.def().id
    }

    pub fn category(&self) -> ViolationCategory {
        self.def().category
    }

    pub fn area(&self) -> GovernanceArea {
        self.def().area
    }

    pub fn default_severity(&self) -> Severity {
        self.def().severity
    }

    pub fn title(&self) -> &'static str {
        self.def().title
    }

    pub fn all() -> impl Iterator<Item = ErrorCode> {
        CODES.iter().map(|s| s.code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single governance finding. Built once, never edited afterwards;
/// the builder methods consume `self`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub code: ErrorCode,
    pub severity: Severity,
    pub category: ViolationCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_type: Option<PolicyType>,
    /// What the finding is about: a manifest, contract, model or `contract.model.element`.
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Violation {
    pub fn new(code: ErrorCode, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            category: code.category(),
            policy_type: None,
            subject: subject.into(),
            message: message.into(),
            expected: None,
            actual: None,
            suggestion: None,
        }
    }

    pub fn expected(mut self, expected: impl ToString) -> Self {
        self.expected = Some(expected.to_string());
        self
    }

    pub fn actual(mut self, actual: impl ToString) -> Self {
        self.actual = Some(actual.to_string());
        self
    }

    pub fn suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn policy_type(mut self, policy_type: PolicyType) -> Self {
        self.policy_type = Some(policy_type);
        self
    }

    /// Returns a copy with a different severity. Used by the orchestrator's disposition step.
    pub fn with_severity(&self, severity: Severity) -> Self {
        Self {
            severity,
            ..self.clone()
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.subject, self.message)?;
        if let (Some(expected), Some(actual)) = (&self.expected, &self.actual) {
            write!(f, " (expected: {}, actual: {})", expected, actual)?;
        }
        Ok(())
    }
}
