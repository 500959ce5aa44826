// floe-core/src/infrastructure/reporters/sarif.rs

use serde_json::{Value, json};
use std::collections::BTreeSet;

use crate::application::ports::ReportRenderer;
use crate::domain::enforcement::{EnforcementResult, ErrorCode, Severity, Violation};
use crate::error::FloeError;
use crate::infrastructure::error::InfrastructureError;

const SARIF_SCHEMA: &str = "https://json.schemastore.org/sarif-2.1.0.json";

/// SARIF 2.1.0, for code-scanning dashboards.
#[derive(Debug)]
pub struct SarifRenderer {
    pub tool_name: String,
    pub tool_version: String,
}

impl Default for SarifRenderer {
    fn default() -> Self {
        Self {
            tool_name: "floe".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl SarifRenderer {
    fn level(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "note",
        }
    }

    fn rules(violations: &[Violation]) -> Vec<Value> {
        let codes: BTreeSet<ErrorCode> = violations.iter().map(|v| v.code).collect();
        codes
            .into_iter()
            .map(|code| {
                json!({
                    "id": code.as_str(),
                    "name": format!("{:?}", code),
                    "shortDescription": { "text": code.title() },
                    "defaultConfiguration": { "level": Self::level(code.default_severity()) },
                    "properties": { "category": code.category().as_str() }
                })
            })
            .collect()
    }

    fn result(v: &Violation) -> Value {
        let mut result = json!({
            "ruleId": v.code.as_str(),
            "level": Self::level(v.severity),
            "message": { "text": v.message },
            "locations": [{
                "logicalLocations": [{ "fullyQualifiedName": v.subject }]
            }]
        });

        let mut properties = serde_json::Map::new();
        properties.insert("category".to_string(), json!(v.category.as_str()));
        if let Some(policy_type) = v.policy_type {
            properties.insert("policyType".to_string(), json!(policy_type.as_str()));
        }
        if let Some(expected) = &v.expected {
            properties.insert("expected".to_string(), json!(expected));
        }
        if let Some(actual) = &v.actual {
            properties.insert("actual".to_string(), json!(actual));
        }
        result["properties"] = Value::Object(properties);

        if let Some(suggestion) = &v.suggestion {
            result["fixes"] = json!([{ "description": { "text": suggestion } }]);
        }
        result
    }
}

impl ReportRenderer for SarifRenderer {
    fn format_name(&self) -> &'static str {
        "sarif"
    }

    fn render(&self, result: &EnforcementResult) -> Result<String, FloeError> {
        let sarif = json!({
            "$schema": SARIF_SCHEMA,
            "version": "2.1.0",
            "runs": [{
                "tool": {
                    "driver": {
                        "name": self.tool_name,
                        "version": self.tool_version,
                        "rules": Self::rules(&result.violations)
                    }
                },
                "results": result.violations.iter().map(Self::result).collect::<Vec<_>>(),
                "invocations": [{
                    "executionSuccessful": result.passed
                }]
            }]
        });
        serde_json::to_string_pretty(&sarif)
            .map_err(|e| FloeError::Infrastructure(InfrastructureError::JsonError(e)))
    }
}
