// floe-core/src/domain/policy/value.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use super::duration::IsoDuration;
use super::level::{ClassificationLevel, ContractEnforcementLevel, LintLevel};
use crate::domain::error::DomainError;

#[allow(clippy::expect_used)]
static RE_PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?%$").expect("percentage pattern is a valid literal"));

/// Parses `"99.9%"` into `99.9`. Returns `None` when the text does not match `\d+(\.\d+)?%`.
pub fn parse_percentage(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if !RE_PERCENTAGE.is_match(trimmed) {
        return None;
    }
    trimmed.trim_end_matches('%').parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
    Classification,
    QualityGate,
    TestCoverage,
    SqlLinting,
    ContractEnforcement,
    Availability,
    Freshness,
}

/// Which payloads a policy type accepts, and what "stricter" means for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Ordinal enums: a higher index is stricter.
    HigherOrdinal,
    /// Thresholds and percentages: a larger number is stricter.
    HigherValue,
    /// Durations: a shorter window is stricter.
    ShorterDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Classification,
    SqlLinting,
    ContractEnforcement,
    Threshold,
    Percentage,
    Duration,
}

struct PolicyTypeDef {
    policy_type: PolicyType,
    name: &'static str,
    strictness: Strictness,
    payloads: &'static [PayloadKind],
}

const POLICY_TYPES: &[PolicyTypeDef] = &[
    PolicyTypeDef {
        policy_type: PolicyType::Classification,
        name: "classification",
        strictness: Strictness::HigherOrdinal,
        payloads: &[PayloadKind::Classification],
    },
    PolicyTypeDef {
        policy_type: PolicyType::QualityGate,
        name: "quality_gate",
        strictness: Strictness::HigherValue,
        payloads: &[PayloadKind::Threshold, PayloadKind::Percentage],
    },
    PolicyTypeDef {
        policy_type: PolicyType::TestCoverage,
        name: "test_coverage",
        strictness: Strictness::HigherValue,
        payloads: &[PayloadKind::Percentage, PayloadKind::Threshold],
    },
    PolicyTypeDef {
        policy_type: PolicyType::SqlLinting,
        name: "sql_linting",
        strictness: Strictness::HigherOrdinal,
        payloads: &[PayloadKind::SqlLinting],
    },
    PolicyTypeDef {
        policy_type: PolicyType::ContractEnforcement,
        name: "contract_enforcement",
        strictness: Strictness::HigherOrdinal,
        payloads: &[PayloadKind::ContractEnforcement],
    },
    PolicyTypeDef {
        policy_type: PolicyType::Availability,
        name: "availability",
        strictness: Strictness::HigherValue,
        payloads: &[PayloadKind::Percentage],
    },
    PolicyTypeDef {
        policy_type: PolicyType::Freshness,
        name: "freshness",
        strictness: Strictness::ShorterDuration,
        payloads: &[PayloadKind::Duration],
    },
];

impl PolicyType {
    fn def(&self) -> &'static PolicyTypeDef {
        // Every variant has exactly one row; the fallback is the first row.
        POLICY_TYPES
            .iter()
            .find(|s| s.policy_type == *self)
            .unwrap_or(&POLICY_TYPES[0])
    }

    pub fn as_str(&self) -> &'static str {
        self.def().name
    }

    pub fn strictness(&self) -> Strictness {
        self.def().strictness
    }

    pub fn accepts(&self, value: &PolicyValue) -> bool {
        self.def().payloads.contains(&value.kind())
    }

    /// Parses a raw textual payload for this type (`"confidential"`, `"80"`, `"99.9%"`, `"PT6H"`).
    pub fn parse_value(&self, raw: &str) -> Result<PolicyValue, DomainError> {
        let invalid = |reason: String| DomainError::InvalidPolicyValue {
            policy_type: self.as_str().to_string(),
            reason,
        };

        match self {
            Self::Classification => ClassificationLevel::from_str(raw)
                .map(PolicyValue::Classification)
                .map_err(invalid),
            Self::SqlLinting => LintLevel::from_str(raw)
                .map(PolicyValue::SqlLinting)
                .map_err(invalid),
            Self::ContractEnforcement => ContractEnforcementLevel::from_str(raw)
                .map(PolicyValue::ContractEnforcement)
                .map_err(invalid),
            Self::Freshness => IsoDuration::parse(raw)
                .map(PolicyValue::Duration)
                .map_err(|e| invalid(e.to_string())),
            Self::QualityGate | Self::TestCoverage | Self::Availability => {
                if let Some(pct) = parse_percentage(raw).filter(|v| v.is_finite()) {
                    return Ok(PolicyValue::Percentage(pct));
                }
                if *self == Self::Availability {
                    return Err(invalid(format!("'{}' is not a percentage", raw)));
                }
                match raw.trim().parse::<f64>() {
                    Ok(v) if v.is_finite() => Ok(PolicyValue::Threshold(v)),
                    Ok(_) => Err(invalid(format!("'{}' is not a finite number", raw))),
                    Err(_) => Err(invalid(format!("'{}' is not a number", raw))),
                }
            }
        }
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        POLICY_TYPES
            .iter()
            .find(|def| def.name == needle)
            .map(|def| def.policy_type)
            .ok_or_else(|| DomainError::UnknownPolicyType(s.to_string()))
    }
}

/// The single comparable payload of a policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum PolicyValue {
    Classification(ClassificationLevel),
    SqlLinting(LintLevel),
    ContractEnforcement(ContractEnforcementLevel),
    Threshold(f64),
    Percentage(f64),
    Duration(IsoDuration),
}

impl PolicyValue {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Classification(_) => PayloadKind::Classification,
            Self::SqlLinting(_) => PayloadKind::SqlLinting,
            Self::ContractEnforcement(_) => PayloadKind::ContractEnforcement,
            Self::Threshold(_) => PayloadKind::Threshold,
            Self::Percentage(_) => PayloadKind::Percentage,
            Self::Duration(_) => PayloadKind::Duration,
        }
    }

    pub fn ordinal(&self) -> Option<u8> {
        match self {
            Self::Classification(l) => Some(l.ordinal()),
            Self::SqlLinting(l) => Some(l.ordinal()),
            Self::ContractEnforcement(l) => Some(l.ordinal()),
            _ => None,
        }
    }

    pub fn numeric(&self) -> Option<f64> {
        match self {
            Self::Threshold(v) | Self::Percentage(v) => Some(*v),
            Self::Duration(d) => Some(d.as_seconds()),
            _ => None,
        }
    }
}

impl fmt::Display for PolicyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classification(l) => write!(f, "{}", l),
            Self::SqlLinting(l) => write!(f, "{}", l),
            Self::ContractEnforcement(l) => write!(f, "{}", l),
            Self::Threshold(v) => write!(f, "{}", v),
            Self::Percentage(v) => write!(f, "{}%", v),
            Self::Duration(d) => write!(f, "{}", d),
        }
    }
}

/// A typed policy: the type fixes how the payload is compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    pub value: PolicyValue,
}

impl Policy {
    pub fn new(policy_type: PolicyType, value: PolicyValue) -> Result<Self, DomainError> {
        if !policy_type.accepts(&value) {
            return Err(DomainError::PolicyTypeMismatch {
                policy_type: policy_type.to_string(),
                value: value.to_string(),
            });
        }
        Ok(Self { policy_type, value })
    }

    pub fn parse(policy_type: &str, raw: &str) -> Result<Self, DomainError> {
        let policy_type = PolicyType::from_str(policy_type)?;
        let value = policy_type.parse_value(raw)?;
        Ok(Self { policy_type, value })
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_pattern() {
        assert_eq!(parse_percentage("99.9%"), Some(99.9));
        assert_eq!(parse_percentage("100%"), Some(100.0));
        assert_eq!(parse_percentage("99.9"), None);
        assert_eq!(parse_percentage("%"), None);
        assert_eq!(parse_percentage("-5%"), None);
        assert_eq!(parse_percentage("9.%"), None);
    }

    #[test]
    fn test_unknown_policy_type_is_an_error() {
        let err = PolicyType::from_str("retention_days").unwrap_err();
        assert!(matches!(err, DomainError::UnknownPolicyType(ref t) if t == "retention_days"));
    }

    #[test]
    fn test_parse_value_per_type() -> anyhow::Result<()> {
        assert_eq!(
            PolicyType::Classification.parse_value("restricted")?,
            PolicyValue::Classification(ClassificationLevel::Restricted)
        );
        assert_eq!(PolicyType::QualityGate.parse_value("80")?, PolicyValue::Threshold(80.0));
        assert_eq!(PolicyType::TestCoverage.parse_value("75%")?, PolicyValue::Percentage(75.0));
        assert!(PolicyType::Availability.parse_value("99").is_err());
        assert!(PolicyType::Freshness.parse_value("six hours").is_err());
        Ok(())
    }

    #[test]
    fn test_non_finite_thresholds_are_rejected() {
        for raw in ["NaN", "inf", "-infinity"] {
            assert!(PolicyType::QualityGate.parse_value(raw).is_err(), "{raw}");
            assert!(PolicyType::TestCoverage.parse_value(raw).is_err(), "{raw}");
        }
        let huge = format!("{}%", "9".repeat(400));
        assert!(PolicyType::Availability.parse_value(&huge).is_err());
    }

    #[test]
    fn test_policy_new_rejects_foreign_payload() {
        let res = Policy::new(
            PolicyType::Classification,
            PolicyValue::Threshold(3.0),
        );
        assert!(matches!(res, Err(DomainError::PolicyTypeMismatch { .. })));
    }

    #[test]
    fn test_display_renders_plain_numbers() {
        assert_eq!(PolicyValue::Threshold(80.0).to_string(), "80");
        assert_eq!(PolicyValue::Percentage(99.5).to_string(), "99.5%");
    }
}
