// floe-core/src/domain/enforcement/mod.rs

pub mod coverage;
pub mod custom;
pub mod documentation;
pub mod naming;
pub mod result;
pub mod semantic;
pub mod validator;
pub mod violation;

pub use result::{EnforcementResult, EnforcementSummary, ResultAggregator};
pub use validator::{ValidationInput, Validator};
pub use violation::{ErrorCode, GovernanceArea, Severity, Violation, ViolationCategory};
