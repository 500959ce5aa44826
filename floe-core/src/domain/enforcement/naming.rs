// floe-core/src/domain/enforcement/naming.rs

use regex::Regex;
use tracing::warn;

use super::violation::{ErrorCode, Violation};
use crate::domain::config::NamingConfig;
use crate::domain::project::Project;

/// Every model name must match at least one configured pattern.
pub fn check(project: &Project, config: &NamingConfig) -> Vec<Violation> {
    let patterns: Vec<Regex> = config
        .patterns
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(pattern = %p, error = %e, "skipping invalid naming pattern");
                None
            }
        })
        .collect();

    if patterns.is_empty() {
        return Vec::new();
    }

    project
        .models
        .iter()
        .filter(|m| !patterns.iter().any(|re| re.is_match(&m.name)))
        .map(|m| {
            Violation::new(
                ErrorCode::NamingPattern,
                &m.name,
                format!(
                    "Model '{}' does not follow the {} naming convention",
                    m.name, config.convention
                ),
            )
            .expected(config.patterns.join(" | "))
            .actual(&m.name)
            .suggestion("Rename the model with a layer prefix such as stg_, int_ or fct_")
        })
        .collect()
}
