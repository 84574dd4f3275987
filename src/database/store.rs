use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{ModuleCondition, ModuleRecord};

/// Repository operations over the module tree.
///
/// Reads never return soft-deleted records. Mutations report the number of
/// affected rows; a zero count is an expected outcome, not an error.
#[async_trait]
pub trait ModuleStore: Send + Sync {
    async fn find(&self, id: &str) -> Result<Option<ModuleRecord>, DatabaseError>;

    /// Direct children of `parent_id`, in sibling order
    async fn find_by_parent_id(&self, parent_id: i64) -> Result<Vec<ModuleRecord>, DatabaseError>;

    async fn find_by_condition(&self, condition: &ModuleCondition) -> Result<Vec<ModuleRecord>, DatabaseError>;

    /// Number of records matching `condition`, ignoring its paging
    async fn count_by_condition(&self, condition: &ModuleCondition) -> Result<i64, DatabaseError>;

    async fn add(&self, record: &ModuleRecord) -> Result<u64, DatabaseError>;

    async fn update(&self, record: &ModuleRecord) -> Result<u64, DatabaseError>;

    /// Soft delete by id
    async fn delete(&self, record: &ModuleRecord) -> Result<u64, DatabaseError>;

    /// Remove rows outright, whether or not they were soft-deleted
    async fn delete_physical_batch(&self, ids: &[String]) -> Result<u64, DatabaseError>;

    async fn delete_physical(&self, record: &ModuleRecord) -> Result<u64, DatabaseError> {
        let id = record.id.clone().ok_or(DatabaseError::MissingKey("id"))?;
        self.delete_physical_batch(&[id]).await
    }

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// Id of a record that is about to be written
pub(crate) fn require_id(record: &ModuleRecord) -> Result<&str, DatabaseError> {
    record.id.as_deref().ok_or(DatabaseError::MissingKey("id"))
}
