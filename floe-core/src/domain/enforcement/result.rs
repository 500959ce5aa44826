// floe-core/src/domain/enforcement/result.rs

use serde::Serialize;
use std::collections::BTreeMap;

use super::violation::{Severity, Violation, ViolationCategory};
use crate::domain::contract::ValidatedContract;
use crate::domain::manifest::Manifest;
use crate::domain::quality::QualityScore;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnforcementSummary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    /// Every category is present, zero-filled, so renderers get a stable shape.
    pub by_category: BTreeMap<ViolationCategory, usize>,
    /// Findings refused after `max_violations` was reached.
    pub dropped: usize,
    pub truncated: bool,
}

/// Collects violations up to a cap. Stages ask `is_full()` to short-circuit.
#[derive(Debug)]
pub struct ResultAggregator {
    max_violations: usize,
    violations: Vec<Violation>,
    dropped: usize,
    dropped_errors: usize,
}

impl ResultAggregator {
    pub fn new(max_violations: usize) -> Self {
        Self {
            max_violations: max_violations.max(1),
            violations: Vec::new(),
            dropped: 0,
            dropped_errors: 0,
        }
    }

    /// Returns `false` once the cap has been reached.
    pub fn push(&mut self, violation: Violation) -> bool {
        if self.is_full() {
            self.dropped += 1;
            if violation.is_error() {
                self.dropped_errors += 1;
            }
            return false;
        }
        self.violations.push(violation);
        true
    }

    /// Pushes every finding; the ones past the cap are counted as dropped.
    pub fn extend<I: IntoIterator<Item = Violation>>(&mut self, violations: I) -> bool {
        for v in violations {
            self.push(v);
        }
        !self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.violations.len() >= self.max_violations
    }

    pub fn remaining(&self) -> usize {
        self.max_violations.saturating_sub(self.violations.len())
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// True when anything accepted or dropped so far would fail the run.
    pub fn has_errors(&self) -> bool {
        self.dropped_errors > 0 || self.violations.iter().any(Violation::is_error)
    }

    /// Orders the collected findings (severity, code, subject) and builds the summary.
    pub fn finish(self) -> (Vec<Violation>, EnforcementSummary, bool) {
        let mut violations = self.violations;
        violations.sort_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then_with(|| a.code.cmp(&b.code))
                .then_with(|| a.subject.cmp(&b.subject))
        });

        let mut summary = EnforcementSummary {
            total: violations.len(),
            dropped: self.dropped,
            truncated: self.dropped > 0,
            by_category: ViolationCategory::ALL.iter().map(|c| (*c, 0)).collect(),
            ..Default::default()
        };

        for v in &violations {
            match v.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.info += 1,
            }
            *summary.by_category.entry(v.category).or_insert(0) += 1;
        }

        let passed = summary.errors == 0 && self.dropped_errors == 0;
        (violations, summary, passed)
    }
}

/// The outcome of one compile-time governance run. Owned by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct EnforcementResult {
    pub passed: bool,
    pub summary: EnforcementSummary,
    pub violations: Vec<Violation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Manifest>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contracts: Vec<ValidatedContract>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityScore>,
}

impl EnforcementResult {
    pub fn from_aggregator(aggregator: ResultAggregator) -> Self {
        let (violations, summary, passed) = aggregator.finish();
        Self {
            passed,
            summary,
            violations,
            manifest: None,
            contracts: Vec::new(),
            quality: None,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.is_error())
    }
}
