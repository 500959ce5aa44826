// floe-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod config;
pub mod error;
pub mod fs;
pub mod reporters;

pub use adapters::{FileCatalog, InMemoryCatalog, StaticTableStore};
pub use config::{ProjectSources, load_governance_config, load_project_sources};
pub use reporters::{JsonRenderer, SarifRenderer, TextRenderer, create_renderer};
