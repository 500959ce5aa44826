// floe-core/src/domain/contract/types.rs

/// Element types accepted in a contract (ODCS logical types plus common aliases).
pub const ELEMENT_TYPES: &[&str] = &[
    "string", "text", "varchar", "uuid", "integer", "int", "long", "bigint", "number", "decimal",
    "float", "double", "boolean", "date", "timestamp", "timestamp_tz", "timestamp_ntz", "time",
    "bytes", "binary", "array", "object", "struct", "map",
];

pub fn is_valid_element_type(t: &str) -> bool {
    let t = t.trim().to_lowercase();
    ELEMENT_TYPES.contains(&t.as_str())
}

/// Broad type family used to compare contract types with warehouse column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    String,
    Integer,
    Numeric,
    Boolean,
    Date,
    Timestamp,
    Time,
    Binary,
    Complex,
}

/// Maps a contract or warehouse type name to its family. Parameters such as
/// `VARCHAR(255)` or `DECIMAL(10,2)` are ignored. Unknown names yield `None`.
pub fn type_family(raw: &str) -> Option<TypeFamily> {
    let lowered = raw.trim().to_lowercase();
    let base = lowered
        .split(['(', '<', ' '])
        .next()
        .unwrap_or_default();

    let family = match base {
        "string" | "text" | "varchar" | "char" | "character" | "nvarchar" | "uuid" => {
            TypeFamily::String
        }
        "integer" | "int" | "int4" | "int8" | "long" | "bigint" | "smallint" | "tinyint"
        | "int64" | "int32" => TypeFamily::Integer,
        "number" | "decimal" | "numeric" | "float" | "float4" | "float8" | "double" | "real"
        | "float64" => TypeFamily::Numeric,
        "boolean" | "bool" => TypeFamily::Boolean,
        "date" => TypeFamily::Date,
        "timestamp" | "timestamp_tz" | "timestamp_ntz" | "timestamptz" | "datetime" => {
            TypeFamily::Timestamp
        }
        "time" => TypeFamily::Time,
        "bytes" | "binary" | "blob" | "bytea" | "varbinary" => TypeFamily::Binary,
        "array" | "object" | "struct" | "map" | "list" | "record" | "variant" | "json" => {
            TypeFamily::Complex
        }
        _ => return None,
    };
    Some(family)
}

/// Lowercased, trimmed type name with exact aliases collapsed. Used where any
/// change of physical type matters, unlike the family check used for drift.
pub fn canonical_type(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let canonical = match lowered.as_str() {
        "int" | "integer" => "integer",
        "string" | "text" => "string",
        "long" | "bigint" => "bigint",
        "bool" | "boolean" => "boolean",
        "bytes" | "binary" => "binary",
        "decimal" | "numeric" => "decimal",
        other => other,
    };
    canonical.to_string()
}

/// Two type names are compatible when they share a family, or when neither
/// is recognised and the names match case-insensitively.
pub fn types_compatible(contract_type: &str, table_type: &str) -> bool {
    match (type_family(contract_type), type_family(table_type)) {
        (Some(a), Some(b)) => a == b,
        _ => contract_type.trim().eq_ignore_ascii_case(table_type.trim()),
    }
}
