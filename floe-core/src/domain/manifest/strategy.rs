// floe-core/src/domain/manifest/strategy.rs

use serde::Serialize;
use std::fmt;

use super::model::ManifestValue;
use crate::domain::error::DomainError;
use crate::domain::policy::{Policy, PolicyType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeStrategy {
    /// Child replaces parent unconditionally.
    Override,
    /// Union of both sets.
    Extend,
    /// Child replaces parent only when at least as strict.
    OverrideIfStricter,
    /// Child set must be a subset of the parent set and becomes the result.
    Intersect,
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Override => "OVERRIDE",
            Self::Extend => "EXTEND",
            Self::OverrideIfStricter => "OVERRIDE_IF_STRICTER",
            Self::Intersect => "INTERSECT",
        };
        f.write_str(s)
    }
}

/// Shape a field's raw value is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Name of a registered plugin.
    Plugin,
    Set,
    Policy(PolicyType),
    Text,
}

#[derive(Debug)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub strategy: MergeStrategy,
}

const fn field(name: &'static str, kind: FieldKind, strategy: MergeStrategy) -> FieldDef {
    FieldDef {
        name,
        kind,
        strategy,
    }
}

use FieldKind as F;
use MergeStrategy as M;

pub const FIELDS: &[FieldDef] = &[
    field("compute", F::Plugin, M::Override),
    field("orchestrator", F::Plugin, M::Override),
    field("catalog", F::Plugin, M::Override),
    field("storage", F::Plugin, M::Override),
    field("classification_levels", F::Set, M::Extend),
    field("naming_patterns", F::Set, M::Extend),
    field("contract_validators", F::Set, M::Extend),
    field("required_tags", F::Set, M::Extend),
    field("classification", F::Policy(PolicyType::Classification), M::OverrideIfStricter),
    field("quality_gate", F::Policy(PolicyType::QualityGate), M::OverrideIfStricter),
    field("test_coverage", F::Policy(PolicyType::TestCoverage), M::OverrideIfStricter),
    field("sql_linting", F::Policy(PolicyType::SqlLinting), M::OverrideIfStricter),
    field("contract_enforcement", F::Policy(PolicyType::ContractEnforcement), M::OverrideIfStricter),
    field("freshness", F::Policy(PolicyType::Freshness), M::OverrideIfStricter),
    field("availability", F::Policy(PolicyType::Availability), M::OverrideIfStricter),
    field("approved_computes", F::Set, M::Intersect),
    field("approved_plugins", F::Set, M::Intersect),
    field("approved_orchestrators", F::Set, M::Intersect),
];

pub fn field_def(name: &str) -> Option<&'static FieldDef> {
    FIELDS.iter().find(|f| f.name == name)
}

/// Strategy for a field. Fields outside the table default by value kind.
pub fn strategy_for(name: &str, value: &ManifestValue) -> MergeStrategy {
    if let Some(def) = field_def(name) {
        return def.strategy;
    }
    match value {
        ManifestValue::Policy(_) => MergeStrategy::OverrideIfStricter,
        ManifestValue::Set(_) => MergeStrategy::Extend,
        ManifestValue::Text(_) => MergeStrategy::Override,
    }
}

/// Raw field as read from a manifest document, before typing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawField {
    Scalar(String),
    List(Vec<String>),
    /// Explicit `{ type, value }` policy form, usable for fields outside the table.
    Typed { policy_type: String, value: String },
}

/// Coerces a raw field through the field table.
///
/// Unknown fields infer their kind: a list is a set, a scalar is text, and the
/// explicit typed form is a policy whose type must exist.
pub fn coerce(name: &str, raw: RawField) -> Result<ManifestValue, DomainError> {
    let kind = field_def(name).map(|s| s.kind);
    match (kind, raw) {
        (Some(F::Policy(policy_type)), RawField::Scalar(value)) => {
            let value = policy_type.parse_value(&value)?;
            Ok(ManifestValue::Policy(Policy { policy_type, value }))
        }
        (Some(F::Policy(expected)), RawField::Typed { policy_type, value }) => {
            let policy = Policy::parse(&policy_type, &value)?;
            if policy.policy_type != expected {
                return Err(DomainError::PolicyTypeMismatch {
                    policy_type: expected.to_string(),
                    value: format!("{} ({})", value, policy_type),
                });
            }
            Ok(ManifestValue::Policy(policy))
        }
        (Some(F::Set), RawField::List(items)) => Ok(ManifestValue::set(items)),
        (Some(F::Set), RawField::Scalar(item)) => Ok(ManifestValue::set([item])),
        (Some(F::Plugin | F::Text), RawField::Scalar(value)) => Ok(ManifestValue::Text(value)),
        (None, RawField::Typed { policy_type, value }) => {
            Ok(ManifestValue::Policy(Policy::parse(&policy_type, &value)?))
        }
        (None, RawField::List(items)) => Ok(ManifestValue::set(items)),
        (None, RawField::Scalar(value)) => Ok(ManifestValue::Text(value)),
        (Some(kind), raw) => Err(DomainError::ManifestError(format!(
            "field '{}' expects {:?}, got {:?}",
            name, kind, raw
        ))),
    }
}
