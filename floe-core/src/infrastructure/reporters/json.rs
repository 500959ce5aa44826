// floe-core/src/infrastructure/reporters/json.rs

use crate::application::ports::ReportRenderer;
use crate::domain::enforcement::EnforcementResult;
use crate::error::FloeError;
use crate::infrastructure::error::InfrastructureError;

#[derive(Debug, Default)]
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn render(&self, result: &EnforcementResult) -> Result<String, FloeError> {
        serde_json::to_string_pretty(result)
            .map_err(|e| FloeError::Infrastructure(InfrastructureError::JsonError(e)))
    }
}
