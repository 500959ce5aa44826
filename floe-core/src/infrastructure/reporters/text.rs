// floe-core/src/infrastructure/reporters/text.rs

use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use std::fmt::Write;

use crate::application::ports::ReportRenderer;
use crate::domain::enforcement::{EnforcementResult, Severity};
use crate::error::FloeError;

/// Human-readable report: one table of findings plus the summary.
#[derive(Debug, Default)]
pub struct TextRenderer;

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Info => Color::Blue,
    }
}

impl ReportRenderer for TextRenderer {
    fn format_name(&self) -> &'static str {
        "text"
    }

    fn render(&self, result: &EnforcementResult) -> Result<String, FloeError> {
        let mut out = String::new();
        let fmt_err = |e: std::fmt::Error| FloeError::InternalError(e.to_string());

        if !result.violations.is_empty() {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL_CONDENSED)
                .set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(
                ["Severity", "Code", "Subject", "Message", "Expected", "Actual"]
                    .iter()
                    .map(|h| Cell::new(h).fg(Color::Cyan))
                    .collect::<Vec<_>>(),
            );
            for v in &result.violations {
                table.add_row(vec![
                    Cell::new(v.severity).fg(severity_color(v.severity)),
                    Cell::new(v.code),
                    Cell::new(&v.subject),
                    Cell::new(&v.message),
                    Cell::new(v.expected.as_deref().unwrap_or("-")),
                    Cell::new(v.actual.as_deref().unwrap_or("-")),
                ]);
            }
            writeln!(out, "{}", table).map_err(fmt_err)?;

            let hints: Vec<String> = result
                .violations
                .iter()
                .filter_map(|v| v.suggestion.as_ref().map(|s| format!("  {} {}: {}", v.code, v.subject, s)))
                .collect();
            if !hints.is_empty() {
                writeln!(out, "Suggestions:").map_err(fmt_err)?;
                for hint in hints {
                    writeln!(out, "{}", hint).map_err(fmt_err)?;
                }
            }
        }

        if let Some(quality) = &result.quality {
            writeln!(out, "Quality score: {:.1}", quality.overall).map_err(fmt_err)?;
        }

        let s = &result.summary;
        let categories: Vec<String> = s
            .by_category
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(c, n)| format!("{}={}", c, n))
            .collect();
        writeln!(
            out,
            "{} violation(s): {} error(s), {} warning(s), {} info{}",
            s.total,
            s.errors,
            s.warnings,
            s.info,
            if categories.is_empty() {
                String::new()
            } else {
                format!(" [{}]", categories.join(", "))
            }
        )
        .map_err(fmt_err)?;
        if s.truncated {
            writeln!(out, "{} further finding(s) dropped after max_violations", s.dropped).map_err(fmt_err)?;
        }
        writeln!(out, "{}", if result.passed { "PASSED" } else { "FAILED" }).map_err(fmt_err)?;

        Ok(out)
    }
}
