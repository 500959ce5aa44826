// floe-core/src/domain/contract/versioning.rs

use serde::Serialize;
use std::fmt;

use super::model::{ContractModel, DataContract, Element, SlaProperties};
use super::semver::{BumpKind, SemVer};
use super::structural::subject_of;
use super::types::canonical_type;
use crate::domain::enforcement::{ErrorCode, Violation};
use crate::domain::policy::{PolicyComparator, PolicyType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeClass {
    Patch,
    NonBreaking,
    Breaking,
}

impl ChangeClass {
    pub fn required_bump(&self) -> BumpKind {
        match self {
            Self::Breaking => BumpKind::Major,
            Self::NonBreaking => BumpKind::Minor,
            Self::Patch => BumpKind::Patch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    RemovedModel,
    RemovedElement,
    TypeChanged,
    OptionalToRequired,
    ConstraintRelaxed,
    SlaRelaxed,
    AddedModel,
    AddedOptionalElement,
    AddedRequiredElement,
    RequiredToOptional,
    ConstraintTightened,
    ClassificationChanged,
    SlaTightened,
    DocumentationChanged,
}

impl ChangeKind {
    pub fn class(&self) -> ChangeClass {
        match self {
            Self::RemovedModel
            | Self::RemovedElement
            | Self::TypeChanged
            | Self::OptionalToRequired
            | Self::AddedRequiredElement
            | Self::ConstraintRelaxed
            | Self::SlaRelaxed => ChangeClass::Breaking,
            Self::AddedModel
            | Self::AddedOptionalElement
            | Self::RequiredToOptional
            | Self::ConstraintTightened
            | Self::ClassificationChanged
            | Self::SlaTightened => ChangeClass::NonBreaking,
            Self::DocumentationChanged => ChangeClass::Patch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaChange {
    pub kind: ChangeKind,
    pub path: String,
    pub detail: String,
}

impl fmt::Display for SchemaChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.detail)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeSet {
    pub changes: Vec<SchemaChange>,
}

impl ChangeSet {
    fn push(&mut self, kind: ChangeKind, path: impl Into<String>, detail: impl Into<String>) {
        self.changes.push(SchemaChange {
            kind,
            path: path.into(),
            detail: detail.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn highest_class(&self) -> Option<ChangeClass> {
        self.changes.iter().map(|c| c.kind.class()).max()
    }

    /// Minimum version component that must change. `None` when nothing changed.
    pub fn required_bump(&self) -> Option<BumpKind> {
        self.highest_class().map(|c| c.required_bump())
    }

    pub fn of_class(&self, class: ChangeClass) -> impl Iterator<Item = &SchemaChange> {
        self.changes.iter().filter(move |c| c.kind.class() == class)
    }
}

/// Classifies every difference between the registered baseline and the candidate.
pub fn classify(baseline: &DataContract, candidate: &DataContract) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for old_model in &baseline.models {
        match candidate.model(&old_model.name) {
            None => changes.push(
                ChangeKind::RemovedModel,
                &old_model.name,
                format!("model '{}' removed", old_model.name),
            ),
            Some(new_model) => diff_model(old_model, new_model, &mut changes),
        }
    }
    for new_model in &candidate.models {
        if baseline.model(&new_model.name).is_none() {
            changes.push(
                ChangeKind::AddedModel,
                &new_model.name,
                format!("model '{}' added", new_model.name),
            );
        }
    }

    diff_sla(&baseline.sla, &candidate.sla, &mut changes);

    if baseline.description != candidate.description
        || baseline.tags != candidate.tags
        || baseline.links != candidate.links
    {
        changes.push(
            ChangeKind::DocumentationChanged,
            "contract",
            "description, tags or links changed",
        );
    }

    changes
}

fn diff_model(old: &ContractModel, new: &ContractModel, changes: &mut ChangeSet) {
    for old_el in &old.elements {
        let path = format!("{}.{}", old.name, old_el.name);
        let Some(new_el) = new.element(&old_el.name) else {
            changes.push(
                ChangeKind::RemovedElement,
                path,
                format!(
                    "{} element '{}' removed",
                    if old_el.required { "required" } else { "optional" },
                    old_el.name
                ),
            );
            continue;
        };
        diff_element(&path, old_el, new_el, changes);
    }

    for new_el in &new.elements {
        if old.element(&new_el.name).is_none() {
            let kind = if new_el.required {
                ChangeKind::AddedRequiredElement
            } else {
                ChangeKind::AddedOptionalElement
            };
            changes.push(
                kind,
                format!("{}.{}", new.name, new_el.name),
                format!("element '{}' added", new_el.name),
            );
        }
    }

    if old.description != new.description {
        changes.push(
            ChangeKind::DocumentationChanged,
            &old.name,
            "model description changed",
        );
    }
}

fn diff_element(path: &str, old: &Element, new: &Element, changes: &mut ChangeSet) {
    if canonical_type(&old.element_type) != canonical_type(&new.element_type) {
        changes.push(
            ChangeKind::TypeChanged,
            path,
            format!("type changed from {} to {}", old.element_type, new.element_type),
        );
    }

    match (old.required, new.required) {
        (false, true) => changes.push(ChangeKind::OptionalToRequired, path, "optional → required"),
        (true, false) => changes.push(ChangeKind::RequiredToOptional, path, "required → optional"),
        _ => {}
    }

    for (flag, was, is) in [
        ("primary_key", old.primary_key, new.primary_key),
        ("unique", old.unique, new.unique),
    ] {
        match (was, is) {
            (true, false) => {
                changes.push(ChangeKind::ConstraintRelaxed, path, format!("{} dropped", flag))
            }
            (false, true) => {
                changes.push(ChangeKind::ConstraintTightened, path, format!("{} added", flag))
            }
            _ => {}
        }
    }

    if old.classification != new.classification {
        changes.push(
            ChangeKind::ClassificationChanged,
            path,
            format!(
                "classification changed from {} to {}",
                old.classification.map_or("none", |c| c.as_str()),
                new.classification.map_or("none", |c| c.as_str())
            ),
        );
    }

    if old.description != new.description || old.tags != new.tags {
        changes.push(ChangeKind::DocumentationChanged, path, "element documentation changed");
    }
}

fn diff_sla(old: &SlaProperties, new: &SlaProperties, changes: &mut ChangeSet) {
    let mut pairs: Vec<(String, PolicyType, Option<&String>, Option<&String>)> = vec![
        (
            "sla.freshness".into(),
            PolicyType::Freshness,
            old.freshness.as_ref(),
            new.freshness.as_ref(),
        ),
        (
            "sla.availability".into(),
            PolicyType::Availability,
            old.availability.as_ref(),
            new.availability.as_ref(),
        ),
    ];
    let metrics: std::collections::BTreeSet<&String> =
        old.quality.keys().chain(new.quality.keys()).collect();
    for metric in metrics {
        pairs.push((
            format!("sla.quality.{}", metric),
            PolicyType::QualityGate,
            old.quality.get(metric),
            new.quality.get(metric),
        ));
    }

    for (path, policy_type, old_raw, new_raw) in pairs {
        match (old_raw, new_raw) {
            (None, None) => {}
            (Some(o), None) => {
                changes.push(ChangeKind::SlaRelaxed, path, format!("{} removed", o))
            }
            (None, Some(n)) => {
                changes.push(ChangeKind::SlaTightened, path, format!("{} introduced", n))
            }
            (Some(o), Some(n)) => {
                let (Ok(ov), Ok(nv)) = (policy_type.parse_value(o), policy_type.parse_value(n))
                else {
                    if o != n {
                        changes.push(ChangeKind::SlaRelaxed, path, format!("{} → {}", o, n));
                    }
                    continue;
                };
                let tighter_or_equal = PolicyComparator::compare(&ov, &nv, policy_type)
                    .map(|c| c.at_least_as_strict)
                    .unwrap_or(false);
                let looser_or_equal = PolicyComparator::compare(&nv, &ov, policy_type)
                    .map(|c| c.at_least_as_strict)
                    .unwrap_or(false);
                match (tighter_or_equal, looser_or_equal) {
                    (true, true) => {}
                    (true, false) => {
                        changes.push(ChangeKind::SlaTightened, path, format!("{} → {}", o, n))
                    }
                    _ => changes.push(ChangeKind::SlaRelaxed, path, format!("{} → {}", o, n)),
                }
            }
        }
    }
}

/// Checks that the declared version bumps at least the component the changes require.
/// No baseline means first registration, which is always valid.
pub fn check(candidate: &DataContract, baseline: Option<&DataContract>) -> Vec<Violation> {
    let Some(baseline) = baseline else {
        return Vec::new();
    };
    // Malformed versions are reported by the structural check.
    let (Ok(new_version), Ok(old_version)) =
        (SemVer::parse(&candidate.version), SemVer::parse(&baseline.version))
    else {
        return Vec::new();
    };

    let subject = subject_of(candidate);
    let changes = classify(baseline, candidate);
    let actual = new_version.bump_from(&old_version);

    if new_version < old_version {
        return vec![
            Violation::new(
                ErrorCode::VersionNotIncremented,
                &subject,
                format!(
                    "Version {} is lower than the registered baseline {}",
                    new_version, old_version
                ),
            )
            .expected(format!("> {}", old_version))
            .actual(&new_version),
        ];
    }

    let Some(required) = changes.required_bump() else {
        // Identical contract: re-registering the same version is fine.
        return Vec::new();
    };

    match actual {
        None => vec![
            Violation::new(
                ErrorCode::VersionNotIncremented,
                &subject,
                format!(
                    "Contract changed ({} change(s)) but version {} was not incremented",
                    changes.changes.len(),
                    new_version
                ),
            )
            .expected(format!("{} bump over {}", required, old_version))
            .actual("no bump")
            .suggestion(suggest_version(&old_version, required)),
        ],
        Some(bump) if bump < required => {
            let reasons: Vec<String> = changes
                .changes
                .iter()
                .filter(|c| c.kind.class().required_bump() > bump)
                .map(|c| c.to_string())
                .collect();
            vec![
                Violation::new(
                    ErrorCode::InsufficientVersionBump,
                    &subject,
                    format!(
                        "{} bump required but only {} applied ({} -> {}): {}",
                        required,
                        bump,
                        old_version,
                        new_version,
                        reasons.join("; ")
                    ),
                )
                .expected(required)
                .actual(bump)
                .suggestion(suggest_version(&old_version, required)),
            ]
        }
        Some(_) => Vec::new(),
    }
}

fn suggest_version(baseline: &SemVer, bump: BumpKind) -> String {
    let next = match bump {
        BumpKind::Major => format!("{}.0.0", baseline.major + 1),
        BumpKind::Minor => format!("{}.{}.0", baseline.major, baseline.minor + 1),
        BumpKind::Patch => format!("{}.{}.{}", baseline.major, baseline.minor, baseline.patch + 1),
    };
    format!("Declare version {} or higher", next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, t: &str, required: bool) -> Element {
        Element {
            name: name.into(),
            element_type: t.into(),
            required,
            ..Default::default()
        }
    }

    fn baseline() -> DataContract {
        DataContract {
            name: "orders".into(),
            version: "1.2.0".into(),
            models: vec![ContractModel {
                name: "orders".into(),
                elements: vec![
                    element("order_id", "string", true),
                    element("amount", "decimal", true),
                    element("note", "string", false),
                ],
                ..Default::default()
            }],
            sla: SlaProperties {
                freshness: Some("PT6H".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_removed_required_element_with_patch_bump_is_rejected() {
        let mut candidate = baseline();
        candidate.version = "1.2.1".into();
        candidate.models[0].elements.retain(|e| e.name != "amount");

        let violations = check(&candidate, Some(&baseline()));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ErrorCode::InsufficientVersionBump);
        assert_eq!(violations[0].code.as_str(), "FLOE-E520");
        assert_eq!(violations[0].expected.as_deref(), Some("MAJOR"));
        assert_eq!(violations[0].actual.as_deref(), Some("PATCH"));
        assert!(violations[0].message.contains("orders.amount"));
    }

    #[test]
    fn test_added_optional_element_with_minor_bump_passes() {
        let mut candidate = baseline();
        candidate.version = "1.3.0".into();
        candidate.models[0].elements.push(element("coupon", "string", false));
        assert!(check(&candidate, Some(&baseline())).is_empty());
    }

    #[test]
    fn test_type_change_within_a_family_is_breaking() {
        let mut candidate = baseline();
        candidate.version = "1.2.1".into();
        candidate.models[0].elements[1].element_type = "double".into();
        candidate.models[0].elements[0].element_type = "uuid".into();

        let changes = classify(&baseline(), &candidate);
        let type_changes: Vec<&str> = changes
            .changes
            .iter()
            .filter(|c| c.kind == ChangeKind::TypeChanged)
            .map(|c| c.path.as_str())
            .collect();
        assert_eq!(type_changes, vec!["orders.order_id", "orders.amount"]);

        let violations = check(&candidate, Some(&baseline()));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ErrorCode::InsufficientVersionBump);
        assert_eq!(violations[0].expected.as_deref(), Some("MAJOR"));
    }

    #[test]
    fn test_type_alias_is_not_a_change() {
        let mut candidate = baseline();
        candidate.models[0].elements[0].element_type = "TEXT".into();
        assert!(classify(&baseline(), &candidate).is_empty());
    }

    #[test]
    fn test_added_required_element_needs_major() {
        let mut candidate = baseline();
        candidate.version = "1.3.0".into();
        candidate.models[0].elements.push(element("currency", "string", true));

        let changes = classify(&baseline(), &candidate);
        assert_eq!(changes.changes[0].kind, ChangeKind::AddedRequiredElement);
        assert_eq!(changes.highest_class(), Some(ChangeClass::Breaking));
        assert_eq!(
            ChangeKind::AddedRequiredElement.class(),
            ChangeKind::OptionalToRequired.class()
        );

        let violations = check(&candidate, Some(&baseline()));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ErrorCode::InsufficientVersionBump);
        assert_eq!(violations[0].actual.as_deref(), Some("MINOR"));

        candidate.version = "2.0.0".into();
        assert!(check(&candidate, Some(&baseline())).is_empty());
    }

    #[test]
    fn test_first_registration_is_always_valid() {
        assert!(check(&baseline(), None).is_empty());
    }

    #[test]
    fn test_classification_of_deltas() {
        let base = baseline();
        let mut candidate = base.clone();
        candidate.models[0].elements[1].element_type = "string".into();
        candidate.models[0].elements[2].required = true;
        candidate.models[0].elements[0].required = false;
        candidate.sla.freshness = Some("P1D".into());
        candidate.description = Some("Orders placed online".into());

        let kinds: Vec<ChangeKind> = classify(&base, &candidate).changes.iter().map(|c| c.kind).collect();
        assert!(kinds.contains(&ChangeKind::TypeChanged));
        assert!(kinds.contains(&ChangeKind::OptionalToRequired));
        assert!(kinds.contains(&ChangeKind::RequiredToOptional));
        assert!(kinds.contains(&ChangeKind::SlaRelaxed));
        assert!(kinds.contains(&ChangeKind::DocumentationChanged));
        assert_eq!(classify(&base, &candidate).required_bump(), Some(BumpKind::Major));
    }

    #[test]
    fn test_documentation_only_needs_patch() {
        let base = baseline();
        let mut candidate = base.clone();
        candidate.tags = vec!["finance".into()];
        let changes = classify(&base, &candidate);
        assert_eq!(changes.highest_class(), Some(ChangeClass::Patch));

        candidate.version = "1.2.1".into();
        assert!(check(&candidate, Some(&base)).is_empty());

        candidate.version = "1.2.0".into();
        let violations = check(&candidate, Some(&base));
        assert_eq!(violations[0].code, ErrorCode::VersionNotIncremented);
    }

    #[test]
    fn test_sla_tightening_is_non_breaking() {
        let base = baseline();
        let mut candidate = base.clone();
        candidate.sla.freshness = Some("PT1H".into());
        let changes = classify(&base, &candidate);
        assert_eq!(changes.highest_class(), Some(ChangeClass::NonBreaking));
        assert_eq!(changes.of_class(ChangeClass::NonBreaking).count(), 1);
    }

    #[test]
    fn test_version_regression_is_rejected() {
        let mut candidate = baseline();
        candidate.version = "1.1.9".into();
        let violations = check(&candidate, Some(&baseline()));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ErrorCode::VersionNotIncremented);
    }

    #[test]
    fn test_identical_contract_same_version_passes() {
        assert!(check(&baseline(), Some(&baseline())).is_empty());
    }
}
