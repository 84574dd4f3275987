use tracing::warn;

use crate::cli::open_store;
use crate::config::AppConfig;
use crate::database::{DatabaseError, ModuleRecord, ModuleStore};

/// Remove rows outright; the HTTP surface only ever soft-deletes.
pub async fn handle(config: AppConfig, memory: bool, ids: Vec<String>) -> anyhow::Result<()> {
    if memory {
        warn!("Purging from an in-memory store has no lasting effect");
    }
    let store = open_store(&config, memory).await?;
    let removed = purge(store.as_ref(), &ids).await?;
    println!("Purged {} of {} module(s)", removed, ids.len());
    Ok(())
}

/// A single id goes through the per-record delete, several through one batch.
pub async fn purge(store: &dyn ModuleStore, ids: &[String]) -> Result<u64, DatabaseError> {
    match ids {
        [id] => {
            let record = ModuleRecord { id: Some(id.clone()), ..Default::default() };
            store.delete_physical(&record).await
        }
        _ => store.delete_physical_batch(ids).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use crate::database::MemoryStore;

    async fn seeded(ids: &[&str]) -> MemoryStore {
        let store = MemoryStore::new(FilterConfig { max_limit: None, debug_logging: false });
        for (i, id) in ids.iter().enumerate() {
            let record = ModuleRecord {
                id: Some(id.to_string()),
                name: Some(format!("Module {}", id)),
                order_no: Some(i as i32),
                parent_id: Some(0),
                ..Default::default()
            };
            store.add(&record).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn single_id_removes_soft_deleted_row() {
        let store = seeded(&["5"]).await;
        let record = ModuleRecord { id: Some("5".into()), ..Default::default() };
        store.delete(&record).await.unwrap();

        assert_eq!(purge(&store, &["5".to_string()]).await.unwrap(), 1);
        assert_eq!(purge(&store, &["5".to_string()]).await.unwrap(), 0);
        assert_eq!(store.add(&record).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn several_ids_count_existing_rows() {
        let store = seeded(&["a", "b", "c"]).await;
        let ids = vec!["a".to_string(), "c".to_string(), "zz".to_string()];
        assert_eq!(purge(&store, &ids).await.unwrap(), 2);
        assert!(store.find("b").await.unwrap().is_some());
        assert!(store.find("a").await.unwrap().is_none());
    }
}
