// floe-core/src/ports/mod.rs

pub mod catalog;
pub mod storage;

pub use catalog::{ContractCatalog, ContractRegistration, RegistrationOutcome};
pub use storage::TableStore;
