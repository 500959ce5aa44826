// floe-core/src/domain/quality/scorer.rs

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;
use validator::Validate;

use super::check::CheckResult;
use super::config::ScoringConfig;
use crate::domain::enforcement::{ErrorCode, Violation};
use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityScore {
    /// Final score in `[0, 100]`.
    pub overall: f64,
    /// Aggregate delta in `[-1, 1]` before scaling.
    pub delta: f64,
    /// Severity-weighted pass rate per scored dimension, in `[0, 100]`.
    pub per_dimension: BTreeMap<String, f64>,
    pub checks: usize,
    pub warnings: Vec<String>,
}

#[derive(Default)]
struct Tally {
    signed: f64,
    passed: f64,
    total: f64,
}

/// Baseline ± capped-delta quality score over executed check results.
#[derive(Debug, Clone)]
pub struct QualityScorer {
    config: ScoringConfig,
}

impl QualityScorer {
    pub fn new(config: ScoringConfig) -> Result<Self, DomainError> {
        config
            .validate()
            .map_err(|e| DomainError::InvalidScoringConfig(e.to_string()))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, results: &[CheckResult]) -> QualityScore {
        let mut warnings = Vec::new();

        // Layer 1: severity-weighted pass/fail per dimension, pass = +1, fail = -1.
        let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
        for check in results {
            if !self.config.dimension_weights.contains_key(&check.dimension) {
                warn!(check = %check.name, dimension = %check.dimension, "check ignored: unknown dimension");
                warnings.push(format!(
                    "check '{}' ignored: dimension '{}' has no configured weight",
                    check.name, check.dimension
                ));
                continue;
            }
            let w = self.config.severity_weights.weight(check.severity);
            let tally = tallies.entry(check.dimension.as_str()).or_default();
            tally.total += w;
            if check.passed {
                tally.signed += w;
                tally.passed += w;
            } else {
                tally.signed -= w;
            }
        }

        // Dimensions without checks (or with zero total weight) are left out entirely.
        let scored: Vec<(&str, f64, f64)> = tallies
            .iter()
            .filter(|(_, t)| t.total > 0.0)
            .map(|(dim, t)| (*dim, t.signed / t.total, t.passed / t.total * 100.0))
            .collect();

        if scored.is_empty() {
            warnings.push("no scorable quality checks; score is the baseline".to_string());
            return QualityScore {
                overall: self.config.baseline,
                delta: 0.0,
                per_dimension: BTreeMap::new(),
                checks: results.len(),
                warnings,
            };
        }

        // Layer 2: weighted delta, renormalized over the scored dimensions.
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (dim, dim_score, _) in &scored {
            let weight = self.config.dimension_weights.get(*dim).copied().unwrap_or(0.0);
            numerator += weight * dim_score;
            denominator += weight;
        }
        let delta = if denominator > 0.0 {
            (numerator / denominator).clamp(-1.0, 1.0)
        } else {
            0.0
        };

        // Layer 3: baseline plus capped delta.
        let overall = self.scale(delta);

        if overall < self.config.warn_score && overall >= self.config.min_score {
            warnings.push(format!(
                "quality score {:.1} is below the warning threshold {}",
                overall, self.config.warn_score
            ));
        }

        QualityScore {
            overall,
            delta,
            per_dimension: scored
                .into_iter()
                .map(|(dim, _, pct)| (dim.to_string(), pct))
                .collect(),
            checks: results.len(),
            warnings,
        }
    }

    fn scale(&self, delta: f64) -> f64 {
        if delta >= 1.0 {
            return 100.0;
        }
        let range = if delta >= 0.0 {
            self.config.max_positive
        } else {
            self.config.max_negative
        };
        (self.config.baseline + delta * range).clamp(0.0, 100.0)
    }

    /// Turns a score into gate findings: below `min_score` is fatal, below `warn_score` is not.
    pub fn gate(&self, score: &QualityScore, subject: &str) -> Vec<Violation> {
        if score.overall < self.config.min_score {
            vec![
                Violation::new(
                    ErrorCode::QualityBelowMinimum,
                    subject,
                    format!(
                        "Quality score {:.1} is below the minimum {}",
                        score.overall, self.config.min_score
                    ),
                )
                .expected(format!(">= {}", self.config.min_score))
                .actual(format!("{:.1}", score.overall))
                .suggestion("Fix failing critical checks first; they carry the most weight"),
            ]
        } else if score.overall < self.config.warn_score {
            vec![
                Violation::new(
                    ErrorCode::QualityBelowWarning,
                    subject,
                    format!(
                        "Quality score {:.1} is below the warning threshold {}",
                        score.overall, self.config.warn_score
                    ),
                )
                .expected(format!(">= {}", self.config.warn_score))
                .actual(format!("{:.1}", score.overall)),
            ]
        } else {
            Vec::new()
        }
    }
}
