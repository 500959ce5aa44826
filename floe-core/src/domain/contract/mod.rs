// floe-core/src/domain/contract/mod.rs

pub mod drift;
pub mod inheritance;
pub mod model;
pub mod semver;
pub mod structural;
pub mod types;
pub mod validator;
pub mod versioning;

pub use drift::{TableColumn, TableSchema};
pub use model::{ContractModel, DataContract, Element, SlaProperties, ValidatedContract};
pub use semver::{BumpKind, SemVer};
pub use structural::is_safe_name;
pub use validator::{ContractInputs, ContractValidator};
pub use versioning::{ChangeClass, ChangeKind, ChangeSet, SchemaChange};
