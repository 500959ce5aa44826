// floe-core/src/domain/enforcement/documentation.rs

use super::violation::{ErrorCode, Violation};
use crate::domain::config::DocumentationConfig;
use crate::domain::project::Project;

pub fn check(project: &Project, config: &DocumentationConfig) -> Vec<Violation> {
    let mut violations = Vec::new();

    for model in &project.models {
        if config.require_model_descriptions && !model.is_documented() {
            violations.push(
                Violation::new(
                    ErrorCode::ModelUndocumented,
                    &model.name,
                    format!("Model '{}' has no description", model.name),
                )
                .suggestion("Add a description to the model's schema file"),
            );
        }
        if config.require_column_descriptions {
            for column in model.columns.iter().filter(|c| !c.is_documented()) {
                violations.push(Violation::new(
                    ErrorCode::ColumnUndocumented,
                    format!("{}.{}", model.name, column.name),
                    format!("Column '{}' of model '{}' has no description", column.name, model.name),
                ));
            }
        }
    }

    violations
}
