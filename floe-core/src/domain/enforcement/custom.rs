// floe-core/src/domain/enforcement/custom.rs

use super::violation::{ErrorCode, Violation};
use crate::domain::config::CustomRules;
use crate::domain::project::Project;

/// Declarative rules: required tags, forbidden name fragments, required meta keys.
pub fn check(project: &Project, rules: &CustomRules) -> Vec<Violation> {
    let mut violations = Vec::new();

    for model in &project.models {
        for tag in &rules.required_tags {
            if !model.tags.iter().any(|t| t == tag) {
                violations.push(
                    Violation::new(
                        ErrorCode::MissingRequiredTag,
                        &model.name,
                        format!("Model '{}' is missing required tag '{}'", model.name, tag),
                    )
                    .expected(tag),
                );
            }
        }

        let lowered = model.name.to_lowercase();
        for fragment in &rules.forbidden_name_substrings {
            if lowered.contains(&fragment.to_lowercase()) {
                violations.push(
                    Violation::new(
                        ErrorCode::ForbiddenName,
                        &model.name,
                        format!("Model name '{}' contains forbidden text '{}'", model.name, fragment),
                    )
                    .actual(fragment),
                );
            }
        }

        for key in &rules.required_meta_keys {
            if !model.meta.contains_key(key) {
                violations.push(
                    Violation::new(
                        ErrorCode::MissingMetaKey,
                        &model.name,
                        format!("Model '{}' is missing meta key '{}'", model.name, key),
                    )
                    .expected(key),
                );
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::ModelNode;

    #[test]
    fn test_rules() {
        let project = Project {
            name: "shop".into(),
            models: vec![ModelNode {
                name: "fct_orders_tmp".into(),
                tags: vec!["finance".into()],
                ..Default::default()
            }],
        };
        let rules = CustomRules {
            required_tags: vec!["finance".into(), "pii-reviewed".into()],
            forbidden_name_substrings: vec!["TMP".into()],
            required_meta_keys: vec!["owner".into()],
        };
        let codes: Vec<ErrorCode> = check(&project, &rules).iter().map(|v| v.code).collect();
        assert_eq!(
            codes,
            vec![
                ErrorCode::MissingRequiredTag,
                ErrorCode::ForbiddenName,
                ErrorCode::MissingMetaKey
            ]
        );
        assert!(check(&project, &CustomRules::default()).is_empty());
    }
}
