// floe-core/src/domain/quality/mod.rs

pub mod check;
pub mod config;
pub mod scorer;

pub use check::{CheckResult, CheckSeverity};
pub use config::{ScoringConfig, SeverityWeights};
pub use scorer::{QualityScore, QualityScorer};
