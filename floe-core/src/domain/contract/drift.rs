// floe-core/src/domain/contract/drift.rs

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::model::ContractModel;
use super::types::types_compatible;
use crate::domain::enforcement::{ErrorCode, Violation};

/// A column as reported by the physical store, independent of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default = "default_nullable")]
    pub is_nullable: bool,
}

fn default_nullable() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TableSchema {
    pub identifier: String,
    #[serde(default)]
    pub columns: Vec<TableColumn>,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Compares a contract model with the live table backing it.
///
/// `table` is `None` when the table does not exist yet; that is a skip, not a
/// failure. Names are matched case-insensitively and types by family, so
/// `VARCHAR(255)` satisfies `string`.
pub fn check(contract_name: &str, model: &ContractModel, table: Option<&TableSchema>) -> Vec<Violation> {
    let subject = format!("{}.{}", contract_name, model.name);

    let Some(table) = table else {
        return vec![
            Violation::new(
                ErrorCode::DriftSkipped,
                &subject,
                format!(
                    "Drift check skipped: table '{}' not yet created",
                    model.table_identifier()
                ),
            ),
        ];
    };

    let mut violations = Vec::new();

    for element in &model.elements {
        let element_subject = format!("{}.{}", subject, element.name);
        match table.column(&element.name) {
            None => violations.push(
                Violation::new(
                    ErrorCode::DriftMissingColumn,
                    &element_subject,
                    format!(
                        "Element '{}' is declared in the contract but missing from table '{}'",
                        element.name, table.identifier
                    ),
                )
                .expected(&element.element_type)
                .actual("missing")
                .suggestion("Add the column to the table or remove the element in a MAJOR version"),
            ),
            Some(column) if !types_compatible(&element.element_type, &column.data_type) => {
                violations.push(
                    Violation::new(
                        ErrorCode::DriftTypeMismatch,
                        &element_subject,
                        format!(
                            "Column '{}' has type {} but the contract declares {}",
                            column.name, column.data_type, element.element_type
                        ),
                    )
                    .expected(&element.element_type)
                    .actual(&column.data_type),
                )
            }
            Some(_) => {}
        }
    }

    let declared: HashSet<String> = model
        .elements
        .iter()
        .map(|e| e.name.to_lowercase())
        .collect();
    for column in &table.columns {
        if !declared.contains(&column.name.to_lowercase()) {
            violations.push(
                Violation::new(
                    ErrorCode::DriftUndeclaredColumn,
                    format!("{}.{}", subject, column.name),
                    format!(
                        "Column '{}' ({}) exists in table '{}' but is not declared in the contract",
                        column.name, column.data_type, table.identifier
                    ),
                )
                .actual(&column.data_type),
            );
        }
    }

    violations
}
