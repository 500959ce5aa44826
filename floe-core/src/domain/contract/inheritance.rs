// floe-core/src/domain/contract/inheritance.rs

use std::collections::HashSet;
use tracing::warn;

use super::model::{ContractModel, DataContract, Element, SlaProperties};
use super::structural::subject_of;
use crate::domain::enforcement::{ErrorCode, Violation};
use crate::domain::policy::{PolicyComparator, PolicyType, PolicyValue};

/// A child contract may tighten its parent's SLAs and element classifications,
/// never relax them. Properties the child omits are inherited, not relaxed.
pub fn check(child: &DataContract, parent: &DataContract) -> Vec<Violation> {
    let subject = subject_of(child);
    let mut violations = Vec::new();

    for (property, policy_type, parent_raw, child_raw) in sla_pairs(&parent.sla, &child.sla) {
        let Some(child_raw) = child_raw else {
            continue;
        };
        // Unparseable values are the structural check's concern.
        let (Ok(parent_value), Ok(child_value)) = (
            policy_type.parse_value(parent_raw),
            policy_type.parse_value(child_raw),
        ) else {
            continue;
        };

        match PolicyComparator::compare(&parent_value, &child_value, policy_type) {
            Ok(cmp) if cmp.at_least_as_strict => {}
            Ok(_) => violations.push(
                Violation::new(
                    ErrorCode::SlaRelaxed,
                    &subject,
                    format!(
                        "SLA '{}' relaxed relative to parent contract '{}'",
                        property, parent.name
                    ),
                )
                .policy_type(policy_type)
                .expected(describe_bound(policy_type, &parent_value))
                .actual(&child_value)
                .suggestion(format!(
                    "Keep '{}' at least as strict as the parent value {}",
                    property, parent_value
                )),
            ),
            Err(e) => violations.push(
                Violation::new(ErrorCode::SlaRelaxed, &subject, e.to_string())
                    .policy_type(policy_type),
            ),
        }
    }

    for parent_model in &parent.models {
        let Some(child_model) = child.model(&parent_model.name) else {
            continue;
        };
        for parent_element in &parent_model.elements {
            let Some(parent_level) = parent_element.classification else {
                continue;
            };
            let Some(child_level) = child_model
                .element(&parent_element.name)
                .and_then(|e| e.classification)
            else {
                continue;
            };

            let weakened = PolicyComparator::compare(
                &PolicyValue::Classification(parent_level),
                &PolicyValue::Classification(child_level),
                PolicyType::Classification,
            )
            .map(|c| !c.at_least_as_strict)
            .unwrap_or(true);

            if weakened {
                violations.push(
                    Violation::new(
                        ErrorCode::ClassificationWeakened,
                        format!("{}.{}.{}", subject, child_model.name, parent_element.name),
                        format!(
                            "Classification of '{}' weakened from {} to {}",
                            parent_element.name, parent_level, child_level
                        ),
                    )
                    .policy_type(PolicyType::Classification)
                    .expected(format!(">= {}", parent_level))
                    .actual(child_level)
                    .suggestion(format!("Use '{}' or a stricter level", parent_level)),
                );
            }
        }
    }

    violations
}

/// Follows `parent` links through `all`, nearest ancestor first.
/// Stops at a missing parent or at the first name already visited.
pub fn ancestors<'a>(contract: &DataContract, all: &'a [DataContract]) -> Vec<&'a DataContract> {
    let mut chain = Vec::new();
    let mut seen: HashSet<&str> = HashSet::from([contract.name.as_str()]);
    let mut next = contract.parent.as_deref();

    while let Some(name) = next {
        if !seen.insert(name) {
            warn!(contract = %contract.name, parent = %name, "contract parent chain loops, stopping");
            break;
        }
        let Some(parent) = all.iter().find(|c| c.name == name) else {
            break;
        };
        chain.push(parent);
        next = parent.parent.as_deref();
    }
    chain
}

/// Folds an ancestor chain (nearest first) into a single contract that carries
/// the strictest SLA and element classification any ancestor declares.
/// The result keeps the nearest ancestor's name.
pub fn effective_parent(ancestors: &[&DataContract]) -> Option<DataContract> {
    let (nearest, rest) = ancestors.split_first()?;
    let mut effective = (*nearest).clone();
    for ancestor in rest {
        fold_sla(&mut effective.sla, &ancestor.sla);
        fold_classifications(&mut effective.models, &ancestor.models);
    }
    Some(effective)
}

fn fold_sla(into: &mut SlaProperties, ancestor: &SlaProperties) {
    fold_value(&mut into.freshness, ancestor.freshness.as_deref(), PolicyType::Freshness);
    fold_value(&mut into.availability, ancestor.availability.as_deref(), PolicyType::Availability);
    for (metric, raw) in &ancestor.quality {
        let mut current = into.quality.get(metric).cloned();
        fold_value(&mut current, Some(raw), PolicyType::QualityGate);
        if let Some(value) = current {
            into.quality.insert(metric.clone(), value);
        }
    }
}

/// Keeps whichever of the two values is stricter. Unparseable values stay as they are.
fn fold_value(current: &mut Option<String>, ancestor: Option<&str>, policy_type: PolicyType) {
    let Some(ancestor_raw) = ancestor else {
        return;
    };
    let Some(current_raw) = current.as_deref() else {
        *current = Some(ancestor_raw.to_string());
        return;
    };
    let (Ok(ancestor_value), Ok(current_value)) =
        (policy_type.parse_value(ancestor_raw), policy_type.parse_value(current_raw))
    else {
        return;
    };
    if let Ok(cmp) = PolicyComparator::compare(&ancestor_value, &current_value, policy_type)
        && !cmp.at_least_as_strict
    {
        *current = Some(ancestor_raw.to_string());
    }
}

fn fold_classifications(into: &mut Vec<ContractModel>, ancestor: &[ContractModel]) {
    for model in ancestor {
        for element in &model.elements {
            let Some(level) = element.classification else {
                continue;
            };
            let target_model = match into.iter().position(|m| m.name == model.name) {
                Some(i) => &mut into[i],
                None => {
                    into.push(ContractModel {
                        name: model.name.clone(),
                        ..Default::default()
                    });
                    let last = into.len() - 1;
                    &mut into[last]
                }
            };
            match target_model
                .elements
                .iter_mut()
                .find(|e| e.name.eq_ignore_ascii_case(&element.name))
            {
                Some(existing) => {
                    existing.classification = Some(existing.classification.map_or(level, |c| c.max(level)));
                }
                None => target_model.elements.push(Element {
                    name: element.name.clone(),
                    element_type: element.element_type.clone(),
                    classification: Some(level),
                    ..Default::default()
                }),
            }
        }
    }
}

fn describe_bound(policy_type: PolicyType, parent_value: &PolicyValue) -> String {
    match policy_type {
        PolicyType::Freshness => format!("<= {}", parent_value),
        _ => format!(">= {}", parent_value),
    }
}

/// `(property, policy type, parent value, child value)` for every SLA the parent declares.
fn sla_pairs<'a>(
    parent: &'a SlaProperties,
    child: &'a SlaProperties,
) -> Vec<(String, PolicyType, &'a str, Option<&'a str>)> {
    let mut pairs = Vec::new();
    if let Some(p) = &parent.freshness {
        pairs.push((
            "freshness".to_string(),
            PolicyType::Freshness,
            p.as_str(),
            child.freshness.as_deref(),
        ));
    }
    if let Some(p) = &parent.availability {
        pairs.push((
            "availability".to_string(),
            PolicyType::Availability,
            p.as_str(),
            child.availability.as_deref(),
        ));
    }
    for (metric, p) in &parent.quality {
        pairs.push((
            format!("quality.{}", metric),
            PolicyType::QualityGate,
            p.as_str(),
            child.quality.get(metric).map(String::as_str),
        ));
    }
    pairs
}
