// floe-core/src/domain/policy/duration.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::domain::error::DomainError;

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
// Calendar units are approximated; freshness SLAs only need an ordering.
const SECONDS_PER_WEEK: f64 = 7.0 * SECONDS_PER_DAY;
const SECONDS_PER_MONTH: f64 = 30.0 * SECONDS_PER_DAY;
const SECONDS_PER_YEAR: f64 = 365.0 * SECONDS_PER_DAY;

#[allow(clippy::expect_used)]
static RE_ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("duration pattern is a valid literal")
});

/// An ISO-8601 duration such as `PT6H` or `P1DT12H`.
///
/// Ordering compares the approximate total length in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IsoDuration {
    raw: String,
    seconds: f64,
}

impl IsoDuration {
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let raw = input.trim();
        let invalid = || DomainError::InvalidDuration(input.to_string());

        // "P" alone and a dangling "T" are syntactically empty.
        if raw.len() < 3 || raw.ends_with('T') {
            return Err(invalid());
        }

        let caps = RE_ISO_DURATION.captures(raw).ok_or_else(invalid)?;

        let units = [
            SECONDS_PER_YEAR,
            SECONDS_PER_MONTH,
            SECONDS_PER_WEEK,
            SECONDS_PER_DAY,
            SECONDS_PER_HOUR,
            SECONDS_PER_MINUTE,
            1.0,
        ];

        let mut seconds = 0.0;
        for (idx, unit) in units.iter().enumerate() {
            if let Some(m) = caps.get(idx + 1) {
                let value: f64 = m.as_str().parse().map_err(|_| invalid())?;
                seconds += value * unit;
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            seconds,
        })
    }

    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for IsoDuration {
    fn eq(&self, other: &Self) -> bool {
        self.seconds == other.seconds
    }
}

impl PartialOrd for IsoDuration {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.seconds.partial_cmp(&other.seconds)
    }
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for IsoDuration {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for IsoDuration {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IsoDuration> for String {
    fn from(value: IsoDuration) -> Self {
        value.raw
    }
}
