pub mod governance;
pub mod sources;

pub use governance::{load_governance_config, load_governance_config_with};
pub use sources::{ProjectSources, load_project_sources, load_quality_results, load_tables};
