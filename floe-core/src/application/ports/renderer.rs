// floe-core/src/application/ports/renderer.rs

use crate::domain::enforcement::EnforcementResult;
use crate::error::FloeError;

/// Turns an enforcement result into a report. The engine never knows which.
pub trait ReportRenderer: Send + Sync {
    fn format_name(&self) -> &'static str;

    fn render(&self, result: &EnforcementResult) -> Result<String, FloeError>;
}
