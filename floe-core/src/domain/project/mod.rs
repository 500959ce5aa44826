// floe-core/src/domain/project/mod.rs

pub mod model;

pub use model::{ColumnInfo, ModelNode, Project};
