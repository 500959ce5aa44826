// floe-core/src/domain/policy/comparator.rs

use serde::Serialize;

use super::value::{PolicyType, PolicyValue, Strictness};
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub at_least_as_strict: bool,
}

/// Strictness comparison between a parent policy value and a child override.
///
/// Pure: no I/O, no configuration. The rule for each type comes from the
/// policy type table, so adding a type never touches this function.
pub struct PolicyComparator;

impl PolicyComparator {
    pub fn compare(
        parent: &PolicyValue,
        child: &PolicyValue,
        policy_type: PolicyType,
    ) -> Result<Comparison, DomainError> {
        for value in [parent, child] {
            if !policy_type.accepts(value) {
                return Err(DomainError::PolicyTypeMismatch {
                    policy_type: policy_type.to_string(),
                    value: value.to_string(),
                });
            }
        }

        let at_least_as_strict = match policy_type.strictness() {
            Strictness::HigherOrdinal => match (parent.ordinal(), child.ordinal()) {
                (Some(p), Some(c)) if parent.kind() == child.kind() => c >= p,
                _ => return Err(mismatch(policy_type, child)),
            },
            Strictness::HigherValue => match (parent.numeric(), child.numeric()) {
                (Some(p), Some(c)) => c >= p,
                _ => return Err(mismatch(policy_type, child)),
            },
            Strictness::ShorterDuration => match (parent.numeric(), child.numeric()) {
                (Some(p), Some(c)) => c <= p,
                _ => return Err(mismatch(policy_type, child)),
            },
        };

        Ok(Comparison { at_least_as_strict })
    }

    /// Same as [`compare`](Self::compare) with the policy type given by name.
    /// An unrecognised name is a hard error.
    pub fn compare_named(
        parent: &PolicyValue,
        child: &PolicyValue,
        policy_type: &str,
    ) -> Result<Comparison, DomainError> {
        let policy_type: PolicyType = policy_type.parse()?;
        Self::compare(parent, child, policy_type)
    }

    /// Returns whichever of the two values is stricter (the parent on ties).
    pub fn stricter_of<'a>(
        a: &'a PolicyValue,
        b: &'a PolicyValue,
        policy_type: PolicyType,
    ) -> Result<&'a PolicyValue, DomainError> {
        let b_over_a = Self::compare(a, b, policy_type)?;
        let a_over_b = Self::compare(b, a, policy_type)?;
        if b_over_a.at_least_as_strict && !a_over_b.at_least_as_strict {
            Ok(b)
        } else {
            Ok(a)
        }
    }
}

fn mismatch(policy_type: PolicyType, value: &PolicyValue) -> DomainError {
    DomainError::PolicyTypeMismatch {
        policy_type: policy_type.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::policy::duration::IsoDuration;
    use crate::domain::policy::level::{ClassificationLevel, ContractEnforcementLevel, LintLevel};
    use proptest::prelude::*;

    fn strict(parent: &PolicyValue, child: &PolicyValue, t: PolicyType) -> bool {
        PolicyComparator::compare(parent, child, t)
            .unwrap()
            .at_least_as_strict
    }

    #[test]
    fn test_classification_exhaustive() {
        for p in ClassificationLevel::ALL {
            for c in ClassificationLevel::ALL {
                let expected = c.ordinal() >= p.ordinal();
                assert_eq!(
                    strict(
                        &PolicyValue::Classification(p),
                        &PolicyValue::Classification(c),
                        PolicyType::Classification
                    ),
                    expected,
                    "parent={p} child={c}"
                );
            }
        }
    }

    #[test]
    fn test_sql_linting_exhaustive() {
        for p in LintLevel::ALL {
            for c in LintLevel::ALL {
                assert_eq!(
                    strict(
                        &PolicyValue::SqlLinting(p),
                        &PolicyValue::SqlLinting(c),
                        PolicyType::SqlLinting
                    ),
                    c.ordinal() >= p.ordinal()
                );
            }
        }
    }

    #[test]
    fn test_contract_enforcement_exhaustive() {
        for p in ContractEnforcementLevel::ALL {
            for c in ContractEnforcementLevel::ALL {
                assert_eq!(
                    strict(
                        &PolicyValue::ContractEnforcement(p),
                        &PolicyValue::ContractEnforcement(c),
                        PolicyType::ContractEnforcement
                    ),
                    c.ordinal() >= p.ordinal()
                );
            }
        }
    }

    #[test]
    fn test_threshold_rule() {
        let parent = PolicyValue::Threshold(80.0);
        assert!(strict(&parent, &PolicyValue::Threshold(90.0), PolicyType::QualityGate));
        assert!(strict(&parent, &PolicyValue::Threshold(80.0), PolicyType::QualityGate));
        assert!(!strict(&parent, &PolicyValue::Threshold(70.0), PolicyType::QualityGate));
    }

    #[test]
    fn test_shorter_freshness_is_stricter() -> anyhow::Result<()> {
        let day = PolicyValue::Duration(IsoDuration::parse("P1D")?);
        let six_hours = PolicyValue::Duration(IsoDuration::parse("PT6H")?);
        assert!(strict(&day, &six_hours, PolicyType::Freshness));
        assert!(!strict(&six_hours, &day, PolicyType::Freshness));
        Ok(())
    }

    #[test]
    fn test_cross_type_comparison_fails() {
        let res = PolicyComparator::compare(
            &PolicyValue::Classification(ClassificationLevel::Public),
            &PolicyValue::Threshold(3.0),
            PolicyType::Classification,
        );
        assert!(matches!(res, Err(DomainError::PolicyTypeMismatch { .. })));

        let res = PolicyComparator::compare_named(
            &PolicyValue::Threshold(1.0),
            &PolicyValue::Threshold(2.0),
            "retention",
        );
        assert!(matches!(res, Err(DomainError::UnknownPolicyType(_))));
    }

    #[test]
    fn test_stricter_of() -> anyhow::Result<()> {
        let a = PolicyValue::Percentage(80.0);
        let b = PolicyValue::Percentage(95.0);
        assert_eq!(PolicyComparator::stricter_of(&a, &b, PolicyType::TestCoverage)?, &b);
        assert_eq!(PolicyComparator::stricter_of(&b, &a, PolicyType::TestCoverage)?, &b);
        Ok(())
    }

    proptest! {
        #[test]
        fn numeric_rule_matches_ge(parent in 0.0f64..100.0, child in 0.0f64..100.0) {
            let res = PolicyComparator::compare(
                &PolicyValue::Percentage(parent),
                &PolicyValue::Percentage(child),
                PolicyType::TestCoverage,
            ).unwrap();
            prop_assert_eq!(res.at_least_as_strict, child >= parent);
        }

        #[test]
        fn comparison_is_reflexive(value in 0.0f64..1_000.0) {
            let v = PolicyValue::Threshold(value);
            prop_assert!(PolicyComparator::compare(&v, &v, PolicyType::QualityGate).unwrap().at_least_as_strict);
        }
    }
}
