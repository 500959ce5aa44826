// floe-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(floe::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- YAML / JSON ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(floe::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(floe::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse '{path}': {message}")]
    #[diagnostic(
        code(floe::infra::parse),
        help("Fix the document and run again; nothing was validated.")
    )]
    ParseError { path: String, message: String },

    // --- CONFIG ---
    #[error("Configuration Error: {0}")]
    #[diagnostic(code(floe::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(floe::infra::config_missing))]
    ConfigNotFound(String),

    #[error("Unsafe path segment '{0}'")]
    #[diagnostic(
        code(floe::infra::unsafe_path),
        help("Catalog keys must not contain path separators or '..'.")
    )]
    UnsafePath(String),

    // --- CATALOG ---
    #[error("Catalog Error: {0}")]
    #[diagnostic(
        code(floe::infra::catalog),
        help("The catalog could not be read or written. Registration is retried, then skipped.")
    )]
    CatalogError(String),
}
