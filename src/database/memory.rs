use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::config::FilterConfig;
use crate::database::manager::DatabaseError;
use crate::database::models::{ModuleCondition, ModuleRecord};
use crate::database::store::{require_id, ModuleStore};

struct StoredModule {
    record: ModuleRecord,
    deleted_at: Option<DateTime<Utc>>,
}

/// In-memory [`ModuleStore`] for local development and tests.
///
/// Mirrors the SQL store: ids are a primary key across live and
/// soft-deleted rows, and paging is capped by the filter configuration.
pub struct MemoryStore {
    rows: RwLock<BTreeMap<String, StoredModule>>,
    filter_config: FilterConfig,
}

impl MemoryStore {
    pub fn new(filter_config: FilterConfig) -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            filter_config,
        }
    }

    fn page(&self, condition: &ModuleCondition, mut records: Vec<ModuleRecord>) -> Result<Vec<ModuleRecord>, DatabaseError> {
        condition.sort(&mut records);
        let start = match condition.start {
            Some(s) if s < 0 => return Err(DatabaseError::QueryError("Offset must be non-negative".to_string())),
            Some(s) => s as usize,
            None => 0,
        };
        let limit = match condition.limit {
            Some(l) if l < 0 => return Err(DatabaseError::QueryError("Limit must be non-negative".to_string())),
            Some(l) => Some(l.min(self.filter_config.max_limit.unwrap_or(i32::MAX)) as usize),
            None => None,
        };
        let paged = records.into_iter().skip(start);
        Ok(match limit {
            Some(l) => paged.take(l).collect(),
            None => paged.collect(),
        })
    }

    async fn live_matching(&self, condition: &ModuleCondition) -> Vec<ModuleRecord> {
        let rows = self.rows.read().await;
        rows.values()
            .filter(|row| row.deleted_at.is_none() && condition.matches(&row.record))
            .map(|row| row.record.clone())
            .collect()
    }
}

#[async_trait]
impl ModuleStore for MemoryStore {
    async fn find(&self, id: &str) -> Result<Option<ModuleRecord>, DatabaseError> {
        let rows = self.rows.read().await;
        Ok(rows
            .get(id)
            .filter(|row| row.deleted_at.is_none())
            .map(|row| row.record.clone()))
    }

    async fn find_by_parent_id(&self, parent_id: i64) -> Result<Vec<ModuleRecord>, DatabaseError> {
        let condition = ModuleCondition::new(ModuleRecord { parent_id: Some(parent_id), ..Default::default() });
        self.find_by_condition(&condition).await
    }

    async fn find_by_condition(&self, condition: &ModuleCondition) -> Result<Vec<ModuleRecord>, DatabaseError> {
        let records = self.live_matching(condition).await;
        self.page(condition, records)
    }

    async fn count_by_condition(&self, condition: &ModuleCondition) -> Result<i64, DatabaseError> {
        Ok(self.live_matching(condition).await.len() as i64)
    }

    async fn add(&self, record: &ModuleRecord) -> Result<u64, DatabaseError> {
        let id = require_id(record)?.to_string();
        let mut rows = self.rows.write().await;
        if rows.contains_key(&id) {
            return Err(DatabaseError::Conflict(format!("id {} already present", id)));
        }
        let now = Utc::now();
        let stored = ModuleRecord {
            create_time: Some(now),
            update_time: Some(now),
            ..record.editable()
        };
        rows.insert(id, StoredModule { record: stored, deleted_at: None });
        Ok(1)
    }

    async fn update(&self, record: &ModuleRecord) -> Result<u64, DatabaseError> {
        let id = require_id(record)?;
        let mut rows = self.rows.write().await;
        match rows.get_mut(id) {
            Some(row) if row.deleted_at.is_none() => {
                row.record = ModuleRecord {
                    create_time: row.record.create_time,
                    update_time: Some(Utc::now()),
                    ..record.editable()
                };
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete(&self, record: &ModuleRecord) -> Result<u64, DatabaseError> {
        let id = require_id(record)?;
        let mut rows = self.rows.write().await;
        match rows.get_mut(id) {
            Some(row) if row.deleted_at.is_none() => {
                let now = Utc::now();
                row.deleted_at = Some(now);
                row.record.update_time = Some(now);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_physical_batch(&self, ids: &[String]) -> Result<u64, DatabaseError> {
        let mut rows = self.rows.write().await;
        Ok(ids.iter().filter(|id| rows.remove(id.as_str()).is_some()).count() as u64)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterOrderInfo, SortDirection};

    fn store() -> MemoryStore {
        MemoryStore::new(FilterConfig { max_limit: Some(2), debug_logging: false })
    }

    fn module(id: &str, name: &str, order_no: i32, parent_id: i64, level: i32) -> ModuleRecord {
        ModuleRecord {
            id: Some(id.into()),
            name: Some(name.into()),
            order_no: Some(order_no),
            parent_id: Some(parent_id),
            level: Some(level),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn add_then_find_returns_input() {
        let store = store();
        let input = module("5", "Users", 1, 0, 1);
        assert_eq!(store.add(&input).await.unwrap(), 1);

        let found = store.find("5").await.unwrap().unwrap();
        assert_eq!(found.editable(), input);
        assert!(found.create_time.is_some());
    }

    #[tokio::test]
    async fn duplicate_add_is_a_conflict() {
        let store = store();
        store.add(&module("5", "Users", 1, 0, 1)).await.unwrap();
        let err = store.add(&module("5", "Again", 2, 0, 1)).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn soft_delete_hides_record_but_keeps_key() {
        let store = store();
        let record = module("5", "Users", 1, 0, 1);
        store.add(&record).await.unwrap();

        assert_eq!(store.delete(&record).await.unwrap(), 1);
        assert!(store.find("5").await.unwrap().is_none());
        assert_eq!(store.delete(&record).await.unwrap(), 0);
        assert_eq!(store.update(&record).await.unwrap(), 0);
        assert!(store.add(&record).await.is_err());

        assert_eq!(store.delete_physical(&record).await.unwrap(), 1);
        assert_eq!(store.add(&record).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn children_are_in_sibling_order() {
        let store = store();
        store.add(&module("2", "Roles", 2, 0, 1)).await.unwrap();
        store.add(&module("1", "Users", 1, 0, 1)).await.unwrap();
        store.add(&module("3", "Groups", 1, 1, 2)).await.unwrap();

        let roots = store.find_by_parent_id(0).await.unwrap();
        let ids: Vec<_> = roots.iter().map(|r| r.id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(store.find_by_parent_id(1).await.unwrap().len(), 1);
        assert!(store.find_by_parent_id(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn count_ignores_paging_and_limit_is_capped() {
        let store = store();
        for i in 0..5 {
            store.add(&module(&format!("m{}", i), &format!("Module {}", i), i, 0, 1)).await.unwrap();
        }
        let condition = ModuleCondition {
            template: ModuleRecord { level: Some(1), ..Default::default() },
            order: vec![FilterOrderInfo { column: "order_no".into(), sort: SortDirection::Desc }],
            start: Some(1),
            limit: Some(50),
            ..Default::default()
        };
        let page = store.find_by_condition(&condition).await.unwrap();
        let ids: Vec<_> = page.iter().map(|r| r.id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["m3", "m2"]);
        assert_eq!(store.count_by_condition(&condition).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn writes_without_id_are_rejected() {
        let store = store();
        let err = store.delete(&ModuleRecord::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "id must not be null");
    }

    #[tokio::test]
    async fn batch_physical_delete_counts_existing_rows() {
        let store = store();
        store.add(&module("a", "A", 1, 0, 1)).await.unwrap();
        store.add(&module("b", "B", 2, 0, 1)).await.unwrap();
        let removed = store
            .delete_physical_batch(&["a".to_string(), "b".to_string(), "zz".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(store.find("a").await.unwrap().is_none());
    }
}
