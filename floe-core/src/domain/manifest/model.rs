// floe-core/src/domain/manifest/model.rs

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::domain::policy::Policy;

/// Governance tier. Declaration order is inheritance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Enterprise,
    Domain,
    Product,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enterprise => "enterprise",
            Self::Domain => "domain",
            Self::Product => "product",
        }
    }

    /// Tier a manifest of this scope must inherit from.
    pub fn parent_scope(&self) -> Option<Scope> {
        match self {
            Self::Enterprise => None,
            Self::Domain => Some(Self::Enterprise),
            Self::Product => Some(Self::Domain),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed value of a manifest field.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestValue {
    Policy(Policy),
    Set(BTreeSet<String>),
    Text(String),
}

impl ManifestValue {
    pub fn set<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Set(items.into_iter().map(Into::into).collect())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Policy(_) => "policy",
            Self::Set(_) => "set",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for ManifestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Policy(p) => write!(f, "{}", p),
            Self::Set(items) => {
                let joined: Vec<&str> = items.iter().map(String::as_str).collect();
                write!(f, "{{{}}}", joined.join(", "))
            }
            Self::Text(t) => f.write_str(t),
        }
    }
}

// Written back out the way it is authored: policies as their scalar text, sets as lists.
impl Serialize for ManifestValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Policy(p) => serializer.serialize_str(&p.value.to_string()),
            Self::Text(t) => serializer.serialize_str(t),
            Self::Set(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// A configuration node in the enterprise → domain → product chain.
/// Merged manifests are new values; nothing here is mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    pub scope: Scope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub fields: BTreeMap<String, ManifestValue>,
}

impl Manifest {
    pub fn new(name: impl Into<String>, scope: Scope) -> Self {
        Self {
            name: name.into(),
            version: "1.0.0".to_string(),
            scope,
            parent: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: ManifestValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn field(&self, name: &str) -> Option<&ManifestValue> {
        self.fields.get(name)
    }
}
