// floe-core/src/infrastructure/reporters/mod.rs

pub mod json;
pub mod sarif;
pub mod text;

use crate::application::ports::ReportRenderer;

pub use json::JsonRenderer;
pub use sarif::SarifRenderer;
pub use text::TextRenderer;

/// Renderer for a format name, or `None` when the format is unknown.
pub fn create_renderer(format: &str) -> Option<Box<dyn ReportRenderer>> {
    match format {
        "text" => Some(Box::new(TextRenderer)),
        "json" => Some(Box::new(JsonRenderer)),
        "sarif" => Some(Box::new(SarifRenderer::default())),
        _ => None,
    }
}

pub fn available_formats() -> &'static [&'static str] {
    &["text", "json", "sarif"]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::enforcement::{EnforcementResult, ErrorCode, ResultAggregator, Violation};
    use anyhow::Result;

    fn result() -> EnforcementResult {
        let mut agg = ResultAggregator::new(10);
        agg.extend([
            Violation::new(ErrorCode::DriftTypeMismatch, "crm.customers.customer_id", "type differs")
                .expected("string")
                .actual("int"),
            Violation::new(ErrorCode::DriftUndeclaredColumn, "crm.customers.internal_notes", "extra column"),
            Violation::new(ErrorCode::PolicyWeakened, "finance", "quality_gate weakened")
                .suggestion("Use a value at least as strict as 80"),
        ]);
        EnforcementResult::from_aggregator(agg)
    }

    #[test]
    fn test_every_format_renders_the_same_result() -> Result<()> {
        let result = result();
        for format in available_formats() {
            let renderer = create_renderer(format).unwrap();
            assert_eq!(renderer.format_name(), *format);
            let out = renderer.render(&result)?;
            assert!(out.contains("FLOE-E530"), "{format}: {out}");
        }
        assert!(create_renderer("xml").is_none());
        Ok(())
    }

    #[test]
    fn test_sarif_shape() -> Result<()> {
        let out = SarifRenderer::default().render(&result())?;
        let sarif: serde_json::Value = serde_json::from_str(&out)?;
        assert_eq!(sarif["version"], "2.1.0");
        let run = &sarif["runs"][0];
        assert_eq!(run["tool"]["driver"]["rules"].as_array().unwrap().len(), 3);
        let results = run["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["level"], "error");
        assert_eq!(results[2]["level"], "note");
        assert_eq!(run["invocations"][0]["executionSuccessful"], false);
        Ok(())
    }

    #[test]
    fn test_json_carries_summary() -> Result<()> {
        let out = JsonRenderer.render(&result())?;
        let json: serde_json::Value = serde_json::from_str(&out)?;
        assert_eq!(json["passed"], false);
        assert_eq!(json["summary"]["errors"], 2);
        assert_eq!(json["summary"]["by_category"]["data_contract"], 2);
        assert_eq!(json["summary"]["by_category"]["manifest"], 1);
        Ok(())
    }

    #[test]
    fn test_text_summary_line() -> Result<()> {
        let out = TextRenderer.render(&result())?;
        assert!(out.contains("3 violation(s): 2 error(s), 0 warning(s), 1 info"));
        assert!(out.contains("Suggestions:"));
        assert!(out.trim_end().ends_with("FAILED"));
        Ok(())
    }
}
