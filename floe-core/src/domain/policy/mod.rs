// floe-core/src/domain/policy/mod.rs

pub mod comparator;
pub mod duration;
pub mod level;
pub mod value;

pub use comparator::{Comparison, PolicyComparator};
pub use duration::IsoDuration;
pub use level::{ClassificationLevel, ContractEnforcementLevel, LintLevel};
pub use value::{PayloadKind, Policy, PolicyType, PolicyValue, Strictness, parse_percentage};
