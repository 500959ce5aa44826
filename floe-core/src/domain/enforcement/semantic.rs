// floe-core/src/domain/enforcement/semantic.rs

use std::collections::HashSet;

use super::violation::{ErrorCode, Violation};
use crate::domain::project::Project;

/// Every ref resolves to a known model and no model selects from itself.
pub fn check(project: &Project) -> Vec<Violation> {
    let known: HashSet<&str> = project.models.iter().map(|m| m.name.as_str()).collect();
    let mut violations = Vec::new();

    for model in &project.models {
        for reference in &model.refs {
            if reference == &model.name {
                violations.push(Violation::new(
                    ErrorCode::SelfReference,
                    &model.name,
                    format!("Model '{}' references itself", model.name),
                ));
            } else if !known.contains(reference.as_str()) {
                violations.push(
                    Violation::new(
                        ErrorCode::UnresolvedRef,
                        &model.name,
                        format!("Model '{}' references unknown model '{}'", model.name, reference),
                    )
                    .actual(reference)
                    .suggestion("Check the ref name or add the missing model"),
                );
            }
        }
    }

    violations
}
