// floe-core/src/domain/contract/structural.rs

use std::collections::HashSet;

use super::model::DataContract;
use super::semver::SemVer;
use super::types::{ELEMENT_TYPES, is_valid_element_type};
use crate::domain::enforcement::{ErrorCode, Violation};
use crate::domain::policy::{IsoDuration, parse_percentage};

/// Structural completeness of a single contract. Every finding is fatal.
pub fn check(contract: &DataContract) -> Vec<Violation> {
    let subject = subject_of(contract);
    let mut violations = Vec::new();

    let required: [(&str, bool); 6] = [
        ("apiVersion", contract.api_version.trim().is_empty()),
        ("kind", contract.kind.trim().is_empty()),
        ("name", contract.name.trim().is_empty()),
        ("version", contract.version.trim().is_empty()),
        ("owner", contract.owner.trim().is_empty()),
        ("models", contract.models.is_empty()),
    ];
    for (field, missing) in required {
        if missing {
            violations.push(
                Violation::new(
                    ErrorCode::MissingRequiredField,
                    &subject,
                    format!("Required field '{}' is missing", field),
                )
                .expected(field)
                .suggestion(format!("Add a non-empty '{}' to the contract", field)),
            );
        }
    }

    if !contract.name.trim().is_empty() && !is_safe_name(&contract.name) {
        violations.push(
            Violation::new(
                ErrorCode::UnsafeName,
                &subject,
                format!("Contract name '{}' cannot be used as a catalog key", contract.name),
            )
            .expected("a name without path separators or '..'")
            .actual(&contract.name)
            .suggestion("Use letters, digits, '_', '-' or '.' in the contract name"),
        );
    }

    if !contract.version.trim().is_empty() && SemVer::parse(&contract.version).is_err() {
        violations.push(
            Violation::new(
                ErrorCode::InvalidVersion,
                &subject,
                format!("Version '{}' is not a semantic version", contract.version),
            )
            .expected("MAJOR.MINOR.PATCH")
            .actual(&contract.version),
        );
    }

    let mut model_names = HashSet::new();
    for model in &contract.models {
        let model_subject = format!("{}.{}", subject, model.name);
        if model.name.trim().is_empty() {
            violations.push(
                Violation::new(ErrorCode::MissingRequiredField, &subject, "Model without a name")
                    .expected("models[].name"),
            );
        } else if !model_names.insert(model.name.to_lowercase()) {
            violations.push(Violation::new(
                ErrorCode::DuplicateDefinition,
                &model_subject,
                format!("Model '{}' is declared more than once", model.name),
            ));
        }

        let mut element_names = HashSet::new();
        for element in &model.elements {
            let element_subject = format!("{}.{}", model_subject, element.name);
            if element.name.trim().is_empty() {
                violations.push(
                    Violation::new(
                        ErrorCode::MissingRequiredField,
                        &model_subject,
                        "Element without a name",
                    )
                    .expected("elements[].name"),
                );
                continue;
            }
            if !element_names.insert(element.name.to_lowercase()) {
                violations.push(Violation::new(
                    ErrorCode::DuplicateDefinition,
                    &element_subject,
                    format!("Element '{}' is declared more than once", element.name),
                ));
            }
            if !is_valid_element_type(&element.element_type) {
                violations.push(
                    Violation::new(
                        ErrorCode::InvalidElementType,
                        &element_subject,
                        format!("Element type '{}' is not supported", element.element_type),
                    )
                    .expected(ELEMENT_TYPES.join("|"))
                    .actual(&element.element_type),
                );
            }
        }
    }

    if let Some(freshness) = &contract.sla.freshness
        && !IsoDuration::is_valid(freshness)
    {
        violations.push(
            Violation::new(
                ErrorCode::InvalidDuration,
                &subject,
                "SLA freshness is not an ISO-8601 duration",
            )
            .expected("ISO-8601 duration (e.g. PT6H)")
            .actual(freshness),
        );
    }

    let percentages = contract
        .sla
        .availability
        .iter()
        .map(|v| ("availability".to_string(), v))
        .chain(
            contract
                .sla
                .quality
                .iter()
                .map(|(k, v)| (format!("quality.{}", k), v)),
        );
    for (field, value) in percentages {
        if parse_percentage(value).is_none() {
            violations.push(
                Violation::new(
                    ErrorCode::InvalidPercentage,
                    &subject,
                    format!("SLA {} is not a percentage", field),
                )
                .expected("\\d+(\\.\\d+)?%")
                .actual(value),
            );
        }
    }

    violations
}

/// True when `name` can be used as one path segment of a catalog key.
pub fn is_safe_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', ':', '\0'])
}

pub(crate) fn subject_of(contract: &DataContract) -> String {
    if contract.name.trim().is_empty() {
        "<unnamed contract>".to_string()
    } else {
        contract.name.clone()
    }
}
