// floe-core/src/domain/config.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::domain::quality::ScoringConfig;

/// How findings of one governance area are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnforcementMode {
    /// Findings are logged and dropped.
    Off,
    /// Errors are downgraded to warnings.
    Warn,
    /// Severity is kept as emitted.
    Strict,
}

impl fmt::Display for EnforcementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Off => "off",
            Self::Warn => "warn",
            Self::Strict => "strict",
        };
        f.write_str(s)
    }
}

impl FromStr for EnforcementMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "warn" => Ok(Self::Warn),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown enforcement mode '{}' (off|warn|strict)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnforcementModes {
    #[serde(default = "strict")]
    pub policy: EnforcementMode,
    #[serde(default = "strict")]
    pub data_contracts: EnforcementMode,
    #[serde(default = "warn")]
    pub drift: EnforcementMode,
    #[serde(default = "strict")]
    pub quality: EnforcementMode,
    #[serde(default = "warn")]
    pub naming: EnforcementMode,
    #[serde(default = "warn")]
    pub coverage: EnforcementMode,
    #[serde(default = "warn")]
    pub documentation: EnforcementMode,
    #[serde(default = "warn")]
    pub semantic: EnforcementMode,
    #[serde(default = "warn")]
    pub custom: EnforcementMode,
}

fn strict() -> EnforcementMode {
    EnforcementMode::Strict
}
fn warn() -> EnforcementMode {
    EnforcementMode::Warn
}

impl Default for EnforcementModes {
    fn default() -> Self {
        Self {
            policy: strict(),
            data_contracts: strict(),
            drift: warn(),
            quality: strict(),
            naming: warn(),
            coverage: warn(),
            documentation: warn(),
            semantic: warn(),
            custom: warn(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NamingConfig {
    #[serde(default = "default_convention")]
    pub convention: String,
    /// A model name must match at least one pattern. Empty disables the check.
    #[validate(custom(function = "validate_patterns"))]
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            convention: default_convention(),
            patterns: default_patterns(),
        }
    }
}

fn default_convention() -> String {
    "medallion".to_string()
}

fn default_patterns() -> Vec<String> {
    vec![
        r"^(stg|bronze)_[a-z0-9_]+$".to_string(),
        r"^(int|silver)_[a-z0-9_]+$".to_string(),
        r"^(fct|dim|mart|gold)_[a-z0-9_]+$".to_string(),
    ]
}

fn validate_patterns(patterns: &[String]) -> Result<(), ValidationError> {
    for pattern in patterns {
        if let Err(e) = Regex::new(pattern) {
            return Err(ValidationError::new("invalid_regex")
                .with_message(Cow::Owned(format!("invalid naming pattern '{}': {}", pattern, e))));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CoverageConfig {
    /// Minimum share of columns with at least one test, in percent.
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default = "default_min_coverage")]
    pub min_test_coverage: f64,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            min_test_coverage: default_min_coverage(),
        }
    }
}

fn default_min_coverage() -> f64 {
    80.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationConfig {
    #[serde(default = "default_true")]
    pub require_model_descriptions: bool,
    #[serde(default = "default_true")]
    pub require_column_descriptions: bool,
}

impl Default for DocumentationConfig {
    fn default() -> Self {
        Self {
            require_model_descriptions: true,
            require_column_descriptions: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CustomRules {
    #[serde(default)]
    pub required_tags: Vec<String>,
    #[serde(default)]
    pub forbidden_name_substrings: Vec<String>,
    #[serde(default)]
    pub required_meta_keys: Vec<String>,
}

impl CustomRules {
    pub fn is_empty(&self) -> bool {
        self.required_tags.is_empty()
            && self.forbidden_name_substrings.is_empty()
            && self.required_meta_keys.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_retry"))]
pub struct RetryPolicy {
    #[validate(range(min = 1, max = 10))]
    #[serde(default = "default_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_attempts(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

fn validate_retry(policy: &RetryPolicy) -> Result<(), ValidationError> {
    if policy.initial_backoff_ms > policy.max_backoff_ms {
        return Err(ValidationError::new("backoff").with_message(Cow::Owned(format!(
            "initial_backoff_ms ({}) must not exceed max_backoff_ms ({})",
            policy.initial_backoff_ms, policy.max_backoff_ms
        ))));
    }
    Ok(())
}

fn default_attempts() -> u32 {
    3
}
fn default_initial_backoff() -> u64 {
    100
}
fn default_max_backoff() -> u64 {
    2_000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CatalogConfig {
    #[validate(length(min = 1, message = "Catalog namespace cannot be empty"))]
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Register validated contracts after a successful compile.
    #[serde(default = "default_true")]
    pub register: bool,
    #[validate(nested)]
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            register: true,
            retry: RetryPolicy::default(),
        }
    }
}

fn default_namespace() -> String {
    "default".to_string()
}

/// Root of `floe.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GovernanceConfig {
    #[validate(range(min = 1))]
    #[serde(default = "default_max_violations")]
    pub max_violations: usize,

    #[serde(default)]
    pub enforcement: EnforcementModes,

    #[validate(nested)]
    #[serde(default)]
    pub scoring: ScoringConfig,

    #[validate(nested)]
    #[serde(default)]
    pub naming: NamingConfig,

    #[validate(nested)]
    #[serde(default)]
    pub coverage: CoverageConfig,

    #[serde(default)]
    pub documentation: DocumentationConfig,

    #[serde(default)]
    pub custom_rules: CustomRules,

    #[validate(nested)]
    #[serde(default)]
    pub catalog: CatalogConfig,
}

fn default_max_violations() -> usize {
    1000
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            max_violations: default_max_violations(),
            enforcement: EnforcementModes::default(),
            scoring: ScoringConfig::default(),
            naming: NamingConfig::default(),
            coverage: CoverageConfig::default(),
            documentation: DocumentationConfig::default(),
            custom_rules: CustomRules::default(),
            catalog: CatalogConfig::default(),
        }
    }
}
