// floe-core/src/domain/manifest/merger.rs

use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use super::model::{Manifest, ManifestValue, Scope};
use super::strategy::{MergeStrategy, strategy_for};
use crate::domain::enforcement::{ErrorCode, Violation};
use crate::domain::error::DomainError;
use crate::domain::policy::PolicyComparator;

/// Combines a parent manifest with a child, field by field.
///
/// Deterministic and side-effect free: `merge(merge(p, c), c) == merge(p, c)`.
pub struct ManifestMerger;

impl ManifestMerger {
    /// Merges `child` over `parent`. Any conflict fails the whole merge.
    pub fn merge(parent: &Manifest, child: &Manifest) -> Result<Manifest, DomainError> {
        let (merged, violations) = Self::merge_collect(parent, child);
        if violations.is_empty() {
            Ok(merged)
        } else {
            Err(DomainError::MergeConflict {
                manifest: child.name.clone(),
                violations,
            })
        }
    }

    /// Best-effort merge: conflicting fields keep the parent value and are reported.
    pub fn merge_collect(parent: &Manifest, child: &Manifest) -> (Manifest, Vec<Violation>) {
        let mut merged = Manifest {
            name: child.name.clone(),
            version: child.version.clone(),
            scope: child.scope,
            parent: child.parent.clone(),
            fields: parent.fields.clone(),
        };
        let mut violations = Vec::new();

        for (field, child_value) in &child.fields {
            let Some(parent_value) = parent.fields.get(field) else {
                merged.fields.insert(field.clone(), child_value.clone());
                continue;
            };

            let strategy = strategy_for(field, parent_value);
            match merge_field(&child.name, field, strategy, parent_value, child_value) {
                Ok(value) => {
                    merged.fields.insert(field.clone(), value);
                }
                Err(violation) => {
                    debug!(manifest = %child.name, field = %field, %strategy, "merge conflict");
                    violations.push(violation);
                }
            }
        }

        (merged, violations)
    }

    /// Walks `parent` links from `leaf` up to the root and returns the chain root-first.
    pub fn lineage<'a>(manifests: &'a [Manifest], leaf: &str) -> Result<Vec<&'a Manifest>, Violation> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = leaf.to_string();

        loop {
            if !seen.insert(current.clone()) {
                return Err(Violation::new(
                    ErrorCode::InvalidScopeChain,
                    leaf,
                    format!("Manifest inheritance cycle through '{}'", current),
                ));
            }
            let Some(manifest) = manifests.iter().find(|m| m.name == current) else {
                return Err(Violation::new(
                    ErrorCode::InvalidScopeChain,
                    leaf,
                    format!("Parent manifest '{}' not found", current),
                )
                .suggestion("Add the parent manifest to the project"));
            };
            chain.push(manifest);
            match &manifest.parent {
                Some(parent) => current = parent.clone(),
                None => break,
            }
        }

        chain.reverse();
        Ok(chain)
    }

    /// Merges a root-first chain (enterprise → domain → product).
    ///
    /// Scope links are validated here, not in [`merge`](Self::merge). Conflicts
    /// from every tier are accumulated; the returned manifest is the best-effort
    /// resolution with parent values kept where a child conflicted.
    pub fn resolve_chain(chain: &[Manifest]) -> (Option<Manifest>, Vec<Violation>) {
        let mut violations = check_scopes(chain);
        let mut iter = chain.iter();
        let Some(root) = iter.next() else {
            return (None, violations);
        };

        let mut resolved = root.clone();
        for child in iter {
            let (merged, conflicts) = Self::merge_collect(&resolved, child);
            violations.extend(conflicts);
            resolved = merged;
        }
        (Some(resolved), violations)
    }
}

fn check_scopes(chain: &[Manifest]) -> Vec<Violation> {
    let mut violations = Vec::new();

    if let Some(root) = chain.first() {
        if root.scope != Scope::Enterprise {
            violations.push(
                Violation::new(
                    ErrorCode::InvalidScopeChain,
                    &root.name,
                    format!("Chain root must be an enterprise manifest, found {}", root.scope),
                )
                .expected(Scope::Enterprise)
                .actual(root.scope),
            );
        }
        if let Some(parent) = &root.parent {
            violations.push(Violation::new(
                ErrorCode::InvalidScopeChain,
                &root.name,
                format!("Root manifest declares parent '{}' which is not part of the chain", parent),
            ));
        }
    }

    for pair in chain.windows(2) {
        let (parent, child) = (&pair[0], &pair[1]);
        if child.scope.parent_scope() != Some(parent.scope) {
            violations.push(
                Violation::new(
                    ErrorCode::InvalidScopeChain,
                    &child.name,
                    format!(
                        "A {} manifest cannot inherit from a {} manifest",
                        child.scope, parent.scope
                    ),
                )
                .expected(child.scope.parent_scope().map_or("none", |s| s.as_str()))
                .actual(parent.scope),
            );
        }
        if child.parent.as_deref() != Some(parent.name.as_str()) {
            violations.push(
                Violation::new(
                    ErrorCode::InvalidScopeChain,
                    &child.name,
                    format!("Manifest parent does not match chain predecessor '{}'", parent.name),
                )
                .expected(&parent.name)
                .actual(child.parent.as_deref().unwrap_or("none")),
            );
        }
    }

    violations
}

fn merge_field(
    manifest: &str,
    field: &str,
    strategy: MergeStrategy,
    parent: &ManifestValue,
    child: &ManifestValue,
) -> Result<ManifestValue, Violation> {
    let kind_mismatch = || {
        Violation::new(
            ErrorCode::UnknownPolicyType,
            manifest,
            format!(
                "Field '{}' changes kind from {} to {}",
                field,
                parent.kind_name(),
                child.kind_name()
            ),
        )
        .expected(parent.kind_name())
        .actual(child.kind_name())
    };

    match strategy {
        MergeStrategy::Override => match (parent, child) {
            (ManifestValue::Text(_), ManifestValue::Text(_)) => Ok(child.clone()),
            (ManifestValue::Set(_), ManifestValue::Set(_)) => Ok(child.clone()),
            (ManifestValue::Policy(p), ManifestValue::Policy(c)) if p.policy_type == c.policy_type => {
                Ok(child.clone())
            }
            _ => Err(kind_mismatch()),
        },
        MergeStrategy::Extend => match (parent, child) {
            (ManifestValue::Set(p), ManifestValue::Set(c)) => {
                Ok(ManifestValue::Set(p.union(c).cloned().collect()))
            }
            _ => Err(kind_mismatch()),
        },
        MergeStrategy::Intersect => match (parent, child) {
            (ManifestValue::Set(p), ManifestValue::Set(c)) => {
                let offending: BTreeSet<&String> = c.difference(p).collect();
                if offending.is_empty() {
                    return Ok(child.clone());
                }
                let offending: Vec<&str> = offending.into_iter().map(String::as_str).collect();
                Err(Violation::new(
                    ErrorCode::IntersectViolation,
                    manifest,
                    format!(
                        "Field '{}' may only narrow the parent set; not allowed: {}",
                        field,
                        offending.join(", ")
                    ),
                )
                .expected(format!("subset of {}", parent))
                .actual(offending.join(", "))
                .suggestion(format!("Remove {} or approve it in the parent manifest", offending.join(", "))))
            }
            _ => Err(kind_mismatch()),
        },
        MergeStrategy::OverrideIfStricter => match (parent, child) {
            (ManifestValue::Policy(p), ManifestValue::Policy(c)) => {
                if p.policy_type != c.policy_type {
                    return Err(kind_mismatch());
                }
                let comparison = PolicyComparator::compare(&p.value, &c.value, p.policy_type)
                    .map_err(|e| {
                        Violation::new(ErrorCode::UnknownPolicyType, manifest, e.to_string())
                            .policy_type(p.policy_type)
                    })?;
                if comparison.at_least_as_strict {
                    Ok(child.clone())
                } else {
                    Err(Violation::new(
                        ErrorCode::PolicyWeakened,
                        manifest,
                        format!(
                            "Field '{}' weakens the parent policy: parent={}, child={}",
                            field, p.value, c.value
                        ),
                    )
                    .policy_type(p.policy_type)
                    .expected(&p.value)
                    .actual(&c.value)
                    .suggestion(format!("Use a value at least as strict as {}", p.value)))
                }
            }
            _ => Err(kind_mismatch()),
        },
    }
}
