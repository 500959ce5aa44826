// floe-core/src/domain/policy/level.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Discriminants ascend with strictness, so `>=` on the derived Ord is the
// "at least as strict" relation. `ordinal()` exposes the same index.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationLevel {
    Public, // 0
    #[default]
    Internal, // 1
    Confidential, // 2
    Restricted, // 3
}

impl ClassificationLevel {
    pub const ALL: [Self; 4] = [
        Self::Public,
        Self::Internal,
        Self::Confidential,
        Self::Restricted,
    ];

    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Confidential => "confidential",
            Self::Restricted => "restricted",
        }
    }
}

impl fmt::Display for ClassificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClassificationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "internal" => Ok(Self::Internal),
            "confidential" => Ok(Self::Confidential),
            "restricted" => Ok(Self::Restricted),
            _ => Err(format!("Unknown classification level: {}", s)),
        }
    }
}

/// SQL linting strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LintLevel {
    Disabled,
    #[default]
    Warn,
    Error,
}

impl LintLevel {
    pub const ALL: [Self; 3] = [Self::Disabled, Self::Warn, Self::Error];

    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LintLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disabled" => Ok(Self::Disabled),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!("Unknown sql linting level: {}", s)),
        }
    }
}

/// How hard a data contract is enforced at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContractEnforcementLevel {
    Off,
    Warn,
    #[default]
    AlertOnly,
    Block,
}

impl ContractEnforcementLevel {
    pub const ALL: [Self; 4] = [Self::Off, Self::Warn, Self::AlertOnly, Self::Block];

    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Warn => "warn",
            Self::AlertOnly => "alert_only",
            Self::Block => "block",
        }
    }
}

impl fmt::Display for ContractEnforcementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContractEnforcementLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "off" => Ok(Self::Off),
            "warn" => Ok(Self::Warn),
            "alert_only" => Ok(Self::AlertOnly),
            "block" => Ok(Self::Block),
            _ => Err(format!("Unknown contract enforcement level: {}", s)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_ordering() {
        assert!(ClassificationLevel::Public < ClassificationLevel::Internal);
        assert!(ClassificationLevel::Internal < ClassificationLevel::Confidential);
        assert!(ClassificationLevel::Confidential < ClassificationLevel::Restricted);
        assert_eq!(ClassificationLevel::Restricted.ordinal(), 3);
    }

    #[test]
    fn test_classification_default() {
        assert_eq!(ClassificationLevel::default(), ClassificationLevel::Internal);
    }

    #[test]
    fn test_display_and_parsing_consistency() -> anyhow::Result<()> {
        let level = ClassificationLevel::Confidential;
        assert_eq!(level.to_string(), "confidential");

        assert_eq!(
            ClassificationLevel::from_str("PUBLIC").map_err(|e| anyhow::anyhow!(e))?,
            ClassificationLevel::Public
        );
        assert!(ClassificationLevel::from_str("secret").is_err());

        for level in ContractEnforcementLevel::ALL {
            let parsed =
                ContractEnforcementLevel::from_str(level.as_str()).map_err(|e| anyhow::anyhow!(e))?;
            assert_eq!(parsed, level);
        }
        assert_eq!(
            ContractEnforcementLevel::from_str("alert-only").map_err(|e| anyhow::anyhow!(e))?,
            ContractEnforcementLevel::AlertOnly
        );
        Ok(())
    }

    #[test]
    fn test_lint_and_enforcement_ordering() {
        assert!(LintLevel::Disabled < LintLevel::Warn && LintLevel::Warn < LintLevel::Error);
        assert!(ContractEnforcementLevel::Warn < ContractEnforcementLevel::AlertOnly);
        assert!(ContractEnforcementLevel::AlertOnly < ContractEnforcementLevel::Block);
    }
}
