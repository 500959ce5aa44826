// floe-core/src/ports/storage.rs

use async_trait::async_trait;

use crate::domain::contract::TableColumn;
use crate::error::FloeError;

/// Read access to physical tables, independent of the warehouse.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn table_exists(&self, identifier: &str) -> Result<bool, FloeError>;

    async fn get_table_schema(&self, identifier: &str) -> Result<Vec<TableColumn>, FloeError>;
}
