// floe-core/src/infrastructure/adapters/mod.rs

pub mod file_catalog;
pub mod memory;

pub use file_catalog::FileCatalog;
pub use memory::{InMemoryCatalog, StaticTableStore};
