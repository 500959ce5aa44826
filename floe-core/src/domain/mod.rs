pub mod config;
pub mod contract;
pub mod enforcement;
pub mod error;
pub mod manifest;
pub mod policy;
pub mod project;
pub mod quality;
pub mod registry;

pub use config::GovernanceConfig;
pub use error::DomainError;
