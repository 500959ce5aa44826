// floe-core/src/domain/manifest/mod.rs

pub mod merger;
pub mod model;
pub mod strategy;

pub use merger::ManifestMerger;
pub use model::{Manifest, ManifestValue, Scope};
pub use strategy::{FieldKind, MergeStrategy, RawField, coerce, field_def, strategy_for};
