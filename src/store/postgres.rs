// src/store/postgres.rs

use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{queries, StoreResult};
use crate::error::StoreError;

/// Task store backed by a PostgreSQL connection pool.
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(StoreError::Connect)?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> StoreResult<()> {
        sqlx::query(queries::SCHEMA_TASKS_POSTGRES)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Migrate)?;
        Ok(())
    }
}

super::sql_task_store!(PgTaskStore);
