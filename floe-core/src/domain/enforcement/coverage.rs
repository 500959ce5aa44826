// floe-core/src/domain/enforcement/coverage.rs

use super::violation::{ErrorCode, Violation};
use crate::domain::config::CoverageConfig;
use crate::domain::project::Project;

pub fn check(project: &Project, config: &CoverageConfig) -> Vec<Violation> {
    project
        .models
        .iter()
        .filter_map(|model| {
            let coverage = model.test_coverage();
            if coverage >= config.min_test_coverage {
                return None;
            }
            let untested: Vec<&str> = model
                .columns
                .iter()
                .filter(|c| c.tests.is_empty())
                .map(|c| c.name.as_str())
                .collect();
            Some(
                Violation::new(
                    ErrorCode::CoverageBelowMinimum,
                    &model.name,
                    format!(
                        "Test coverage {:.1}% is below the required {}%",
                        coverage, config.min_test_coverage
                    ),
                )
                .expected(format!(">= {}%", config.min_test_coverage))
                .actual(format!("{:.1}%", coverage))
                .suggestion(format!("Add tests to: {}", untested.join(", "))),
            )
        })
        .collect()
}
