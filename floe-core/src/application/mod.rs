// floe-core/src/application/mod.rs

pub mod contracts;
pub mod governance;
pub mod manifests;
pub mod ports;
pub mod retry;

pub use governance::{CompileRequest, GovernanceEngine};
pub use manifests::resolve_manifests;
