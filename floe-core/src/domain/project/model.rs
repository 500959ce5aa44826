// floe-core/src/domain/project/model.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The compiled model graph the model validators run over.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub models: Vec<ModelNode>,
}

/// A single model of the graph.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ModelNode {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub columns: Vec<ColumnInfo>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Names of upstream models this one selects from.
    #[serde(default)]
    pub refs: Vec<String>,

    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ColumnInfo {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub tests: Vec<String>,
}

impl Project {
    pub fn model(&self, name: &str) -> Option<&ModelNode> {
        self.models.iter().find(|m| m.name == name)
    }
}

impl ModelNode {
    /// Share of columns with at least one test, in percent. A model with no
    /// columns counts as fully covered.
    pub fn test_coverage(&self) -> f64 {
        if self.columns.is_empty() {
            return 100.0;
        }
        let tested = self.columns.iter().filter(|c| !c.tests.is_empty()).count();
        tested as f64 / self.columns.len() as f64 * 100.0
    }
}

fn is_blank(text: &Option<String>) -> bool {
    text.as_deref().is_none_or(|t| t.trim().is_empty())
}

impl ModelNode {
    pub fn is_documented(&self) -> bool {
        !is_blank(&self.description)
    }
}

impl ColumnInfo {
    pub fn is_documented(&self) -> bool {
        !is_blank(&self.description)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_project_deserialization() {
        let yaml = r#"
name: shop
models:
  - name: stg_orders
    description: "Raw orders"
    refs: []
    columns:
      - name: id
        tests: [unique, not_null]
      - name: amount
  - name: fct_orders
    refs: [stg_orders]
    meta:
      owner: finance
"#;
        let project: Project = serde_yaml::from_str(yaml).expect("Should deserialize");
        assert_eq!(project.models.len(), 2);
        let stg = project.model("stg_orders").expect("model should exist");
        assert!(stg.is_documented());
        assert_eq!(stg.test_coverage(), 50.0);
        let fct = project.model("fct_orders").unwrap();
        assert!(!fct.is_documented());
        assert_eq!(fct.meta.get("owner").map(String::as_str), Some("finance"));
    }

    #[test]
    fn test_blank_description_is_undocumented() {
        let col = ColumnInfo {
            name: "id".into(),
            description: Some("   ".into()),
            tests: vec![],
        };
        assert!(!col.is_documented());
    }
}
