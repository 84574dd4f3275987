use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;

use crate::config::FilterConfig;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{ModuleCondition, ModuleRecord};
use crate::database::query_builder::QueryBuilder;
use crate::database::store::{require_id, ModuleStore};
use crate::filter::{Filter, FilterData};

/// PostgreSQL-backed [`ModuleStore`].
pub struct Repository {
    table_name: String,
    manager: DatabaseManager,
    pool: PgPool,
    filter_config: FilterConfig,
}

impl Repository {
    pub fn new(
        table_name: impl Into<String>,
        manager: &DatabaseManager,
        filter_config: FilterConfig,
    ) -> Result<Self, DatabaseError> {
        let table_name = table_name.into();
        // Reuse Filter table name validation
        Filter::new(&table_name, &filter_config)?;
        Ok(Self {
            table_name,
            manager: manager.clone(),
            pool: manager.pool().clone(),
            filter_config,
        })
    }

    fn query(&self) -> Result<QueryBuilder<ModuleRecord>, DatabaseError> {
        QueryBuilder::new(&self.table_name, &self.filter_config)
    }

    fn table(&self) -> String {
        format!("\"{}\"", self.table_name)
    }

    fn by_id(id: &str) -> FilterData {
        FilterData {
            select: Some(ModuleRecord::COLUMNS.iter().map(|c| c.to_string()).collect()),
            where_clause: Some(json!({ "id": id })),
            limit: Some(1),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ModuleStore for Repository {
    async fn find(&self, id: &str) -> Result<Option<ModuleRecord>, DatabaseError> {
        self.query()?.filter(Self::by_id(id))?.select_optional(&self.pool).await
    }

    async fn find_by_parent_id(&self, parent_id: i64) -> Result<Vec<ModuleRecord>, DatabaseError> {
        let condition = ModuleCondition::new(ModuleRecord { parent_id: Some(parent_id), ..Default::default() });
        self.query()?.filter(condition.to_filter_data())?.select_all(&self.pool).await
    }

    async fn find_by_condition(&self, condition: &ModuleCondition) -> Result<Vec<ModuleRecord>, DatabaseError> {
        self.query()?.filter(condition.to_filter_data())?.select_all(&self.pool).await
    }

    async fn count_by_condition(&self, condition: &ModuleCondition) -> Result<i64, DatabaseError> {
        let filter_data = FilterData {
            where_clause: Some(condition.where_data()),
            ..Default::default()
        };
        self.query()?.filter(filter_data)?.count(&self.pool).await
    }

    async fn add(&self, record: &ModuleRecord) -> Result<u64, DatabaseError> {
        let id = require_id(record)?;
        let sql = format!(
            "INSERT INTO {} (\"id\", \"name\", \"order_no\", \"parent_id\", \"level\", \"url\", \"icon\", \"create_time\", \"update_time\") \
             VALUES ($1, $2, $3, $4, $5, $6, $7, now(), now())",
            self.table()
        );
        let done = sqlx::query(&sql)
            .bind(id)
            .bind(&record.name)
            .bind(record.order_no)
            .bind(record.parent_id)
            .bind(record.level)
            .bind(&record.url)
            .bind(&record.icon)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected())
    }

    async fn update(&self, record: &ModuleRecord) -> Result<u64, DatabaseError> {
        let id = require_id(record)?;
        let sql = format!(
            "UPDATE {} SET \"name\" = $2, \"order_no\" = $3, \"parent_id\" = $4, \"level\" = $5, \
             \"url\" = $6, \"icon\" = $7, \"update_time\" = now() \
             WHERE \"id\" = $1 AND \"deleted_at\" IS NULL",
            self.table()
        );
        let done = sqlx::query(&sql)
            .bind(id)
            .bind(&record.name)
            .bind(record.order_no)
            .bind(record.parent_id)
            .bind(record.level)
            .bind(&record.url)
            .bind(&record.icon)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected())
    }

    async fn delete(&self, record: &ModuleRecord) -> Result<u64, DatabaseError> {
        let id = require_id(record)?;
        let sql = format!(
            "UPDATE {} SET \"deleted_at\" = now(), \"update_time\" = now() WHERE \"id\" = $1 AND \"deleted_at\" IS NULL",
            self.table()
        );
        let done = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(done.rows_affected())
    }

    async fn delete_physical_batch(&self, ids: &[String]) -> Result<u64, DatabaseError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let filter_data = FilterData {
            where_clause: Some(json!({ "id": { "$in": ids } })),
            ..Default::default()
        };
        self.query()?.filter(filter_data)?.include_deleted(true).delete(&self.pool).await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.manager.health_check().await
    }
}
