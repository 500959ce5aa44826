// floe-core/src/domain/contract/semver.rs

use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use crate::domain::error::DomainError;

#[allow(clippy::expect_used)]
static RE_SEMVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-([0-9A-Za-z.-]+))?(?:\+[0-9A-Za-z.-]+)?$",
    )
    .expect("semver pattern is a valid literal")
});

/// MAJOR.MINOR.PATCH with an optional pre-release tag. Build metadata is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
}

impl SemVer {
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidVersion(input.to_string());
        let caps = RE_SEMVER.captures(input.trim()).ok_or_else(invalid)?;
        let part = |idx: usize| -> Result<u64, DomainError> {
            caps.get(idx)
                .ok_or_else(invalid)?
                .as_str()
                .parse()
                .map_err(|_| invalid())
        };
        Ok(Self {
            major: part(1)?,
            minor: part(2)?,
            patch: part(3)?,
            pre: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }

    /// Which component changed going from `baseline` to `self`.
    /// `None` when `self` is not strictly greater.
    pub fn bump_from(&self, baseline: &SemVer) -> Option<BumpKind> {
        if self <= baseline {
            return None;
        }
        if self.major != baseline.major {
            Some(BumpKind::Major)
        } else if self.minor != baseline.minor {
            Some(BumpKind::Minor)
        } else {
            Some(BumpKind::Patch)
        }
    }
}

impl PartialOrd for SemVer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemVer {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre, &other.pre) {
                // A release ranks above its pre-releases.
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BumpKind {
    Patch,
    Minor,
    Major,
}

impl BumpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patch => "PATCH",
            Self::Minor => "MINOR",
            Self::Major => "MAJOR",
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() -> anyhow::Result<()> {
        let v = SemVer::parse("1.4.2")?;
        assert_eq!((v.major, v.minor, v.patch), (1, 4, 2));
        assert_eq!(SemVer::parse("2.0.0-rc.1+build.7")?.to_string(), "2.0.0-rc.1");
        for bad in ["1.0", "v1.0.0", "01.0.0", "1.0.0.0", ""] {
            assert!(SemVer::parse(bad).is_err(), "{bad}");
        }
        Ok(())
    }

    #[test]
    fn test_bump_detection() -> anyhow::Result<()> {
        let base = SemVer::parse("1.2.3")?;
        assert_eq!(SemVer::parse("2.0.0")?.bump_from(&base), Some(BumpKind::Major));
        assert_eq!(SemVer::parse("1.3.0")?.bump_from(&base), Some(BumpKind::Minor));
        assert_eq!(SemVer::parse("1.2.4")?.bump_from(&base), Some(BumpKind::Patch));
        assert_eq!(SemVer::parse("1.2.3")?.bump_from(&base), None);
        assert_eq!(SemVer::parse("1.2.2")?.bump_from(&base), None);
        assert!(BumpKind::Major > BumpKind::Minor && BumpKind::Minor > BumpKind::Patch);
        Ok(())
    }

    #[test]
    fn test_prerelease_orders_below_release() -> anyhow::Result<()> {
        assert!(SemVer::parse("2.0.0-rc.1")? < SemVer::parse("2.0.0")?);
        Ok(())
    }
}
