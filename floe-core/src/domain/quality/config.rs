// floe-core/src/domain/quality/config.rs

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

use super::check::CheckSeverity;

const WEIGHT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SeverityWeights {
    #[validate(range(min = 0.0))]
    #[serde(default = "default_critical")]
    pub critical: f64,
    #[validate(range(min = 0.0))]
    #[serde(default = "default_warning")]
    pub warning: f64,
    #[validate(range(min = 0.0))]
    #[serde(default = "default_info")]
    pub info: f64,
}

impl SeverityWeights {
    pub fn weight(&self, severity: CheckSeverity) -> f64 {
        match severity {
            CheckSeverity::Critical => self.critical,
            CheckSeverity::Warning => self.warning,
            CheckSeverity::Info => self.info,
        }
    }
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            critical: default_critical(),
            warning: default_warning(),
            info: default_info(),
        }
    }
}

fn default_critical() -> f64 {
    3.0
}
fn default_warning() -> f64 {
    1.0
}
fn default_info() -> f64 {
    0.5
}

/// Parameters of the three-layer score. Weights must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_scoring"))]
pub struct ScoringConfig {
    #[validate(nested)]
    #[serde(default)]
    pub severity_weights: SeverityWeights,

    #[serde(default = "default_dimension_weights")]
    pub dimension_weights: BTreeMap<String, f64>,

    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default = "default_baseline")]
    pub baseline: f64,

    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default = "default_max_positive")]
    pub max_positive: f64,

    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default = "default_max_negative")]
    pub max_negative: f64,

    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default = "default_warn_score")]
    pub warn_score: f64,

    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            severity_weights: SeverityWeights::default(),
            dimension_weights: default_dimension_weights(),
            baseline: default_baseline(),
            max_positive: default_max_positive(),
            max_negative: default_max_negative(),
            warn_score: default_warn_score(),
            min_score: default_min_score(),
        }
    }
}

fn default_dimension_weights() -> BTreeMap<String, f64> {
    [
        ("completeness", 0.25),
        ("accuracy", 0.25),
        ("validity", 0.20),
        ("consistency", 0.15),
        ("timeliness", 0.15),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn default_baseline() -> f64 {
    70.0
}
fn default_max_positive() -> f64 {
    30.0
}
fn default_max_negative() -> f64 {
    50.0
}
fn default_warn_score() -> f64 {
    80.0
}
fn default_min_score() -> f64 {
    60.0
}

fn invalid(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

fn validate_scoring(config: &ScoringConfig) -> Result<(), ValidationError> {
    if config.dimension_weights.is_empty() {
        return Err(invalid("dimension_weights", "at least one dimension weight is required".into()));
    }
    if let Some((name, w)) = config.dimension_weights.iter().find(|(_, w)| **w < 0.0 || !w.is_finite()) {
        return Err(invalid(
            "dimension_weights",
            format!("weight for '{}' must be a non-negative number, got {}", name, w),
        ));
    }
    let sum: f64 = config.dimension_weights.values().sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(invalid(
            "dimension_weights",
            format!("dimension weights must sum to 1.0, got {}", sum),
        ));
    }
    if config.min_score > config.warn_score {
        return Err(invalid(
            "thresholds",
            format!(
                "min_score ({}) must not exceed warn_score ({})",
                config.min_score, config.warn_score
            ),
        ));
    }
    Ok(())
}
