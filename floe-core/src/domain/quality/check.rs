// floe-core/src/domain/quality/check.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Criticality class of a quality check. Drives its weight in the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckSeverity {
    Critical,
    #[default]
    Warning,
    Info,
}

impl fmt::Display for CheckSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        f.write_str(s)
    }
}

/// Outcome of one executed quality check (execution itself happens elsewhere).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    /// `completeness`, `accuracy`, `validity`, `consistency`, `timeliness`...
    pub dimension: String,
    #[serde(default)]
    pub severity: CheckSeverity,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl CheckResult {
    pub fn new(name: impl Into<String>, dimension: impl Into<String>, severity: CheckSeverity, passed: bool) -> Self {
        Self {
            name: name.into(),
            dimension: dimension.into(),
            severity,
            passed,
            model: None,
        }
    }
}
