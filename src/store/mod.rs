// src/store/mod.rs

//! Data access for the `tasks` table.
//!
//! Every statement the service runs lives in [`queries`]; handlers and jobs only
//! see the [`TaskStore`] trait. Lookups by id return `Ok(None)` when no row
//! matched so callers can tell a missing task apart from a failed statement.

mod postgres;
mod queries;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;

use crate::error::StoreError;
use crate::models::Task;

pub use postgres::PgTaskStore;
pub use sqlite::SqliteTaskStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks, ordered by ascending id.
    async fn list_tasks(&self) -> StoreResult<Vec<Task>>;

    /// Inserts a new, not yet completed task.
    async fn create_task(&self, text: &str, due_date: Option<DateTime<Utc>>) -> StoreResult<Task>;

    /// Overwrites text and due date. A `None` due date clears the stored one.
    async fn update_task_fields(
        &self,
        id: i64,
        text: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> StoreResult<Option<Task>>;

    async fn update_task_completion(&self, id: i64, completed: bool) -> StoreResult<Option<Task>>;

    /// Removes one task, returning the row as it was before deletion.
    async fn delete_task(&self, id: i64) -> StoreResult<Option<Task>>;

    async fn delete_completed_tasks(&self) -> StoreResult<Vec<Task>>;

    /// Removes every task regardless of state.
    async fn clear_all_tasks(&self) -> StoreResult<Vec<Task>>;

    async fn close(&self);
}

/// Opens the store named by a connection string and makes sure the schema exists.
///
/// `postgres://` and `postgresql://` urls select PostgreSQL, `sqlite:` urls SQLite.
pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Arc<dyn TaskStore>> {
    let scheme = url.split(':').next().unwrap_or_default();
    match scheme {
        "postgres" | "postgresql" => {
            let store = PgTaskStore::connect(url, max_connections).await?;
            info!("Connected to PostgreSQL task store");
            Ok(Arc::new(store))
        }
        "sqlite" => {
            let store = SqliteTaskStore::connect(url).await?;
            info!("Connected to SQLite task store");
            Ok(Arc::new(store))
        }
        other => Err(StoreError::UnsupportedUrl(other.to_string())),
    }
}

/// Implements [`TaskStore`] for a store struct holding a sqlx `pool`.
macro_rules! sql_task_store {
    ($store:ty) => {
        #[async_trait::async_trait]
        impl $crate::store::TaskStore for $store {
            async fn list_tasks(&self) -> $crate::store::StoreResult<Vec<$crate::models::Task>> {
                sqlx::query_as::<_, $crate::models::Task>($crate::store::queries::SELECT_TASKS)
                    .fetch_all(&self.pool)
                    .await
                    .map_err($crate::error::StoreError::query("fetch tasks"))
            }

            async fn create_task(
                &self,
                text: &str,
                due_date: Option<chrono::DateTime<chrono::Utc>>,
            ) -> $crate::store::StoreResult<$crate::models::Task> {
                sqlx::query_as::<_, $crate::models::Task>($crate::store::queries::INSERT_TASK)
                    .bind(text)
                    .bind(due_date)
                    .fetch_one(&self.pool)
                    .await
                    .map_err($crate::error::StoreError::query("create task"))
            }

            async fn update_task_fields(
                &self,
                id: i64,
                text: &str,
                due_date: Option<chrono::DateTime<chrono::Utc>>,
            ) -> $crate::store::StoreResult<Option<$crate::models::Task>> {
                sqlx::query_as::<_, $crate::models::Task>($crate::store::queries::UPDATE_TASK_FIELDS)
                    .bind(text)
                    .bind(due_date)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err($crate::error::StoreError::query("update task"))
            }

            async fn update_task_completion(
                &self,
                id: i64,
                completed: bool,
            ) -> $crate::store::StoreResult<Option<$crate::models::Task>> {
                sqlx::query_as::<_, $crate::models::Task>(
                    $crate::store::queries::UPDATE_TASK_COMPLETION,
                )
                .bind(completed)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err($crate::error::StoreError::query("update task completion"))
            }

            async fn delete_task(
                &self,
                id: i64,
            ) -> $crate::store::StoreResult<Option<$crate::models::Task>> {
                sqlx::query_as::<_, $crate::models::Task>($crate::store::queries::DELETE_TASK)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err($crate::error::StoreError::query("delete task"))
            }

            async fn delete_completed_tasks(
                &self,
            ) -> $crate::store::StoreResult<Vec<$crate::models::Task>> {
                sqlx::query_as::<_, $crate::models::Task>(
                    $crate::store::queries::DELETE_COMPLETED_TASKS,
                )
                .fetch_all(&self.pool)
                .await
                .map_err($crate::error::StoreError::query("delete completed tasks"))
            }

            async fn clear_all_tasks(&self) -> $crate::store::StoreResult<Vec<$crate::models::Task>> {
                sqlx::query_as::<_, $crate::models::Task>($crate::store::queries::DELETE_ALL_TASKS)
                    .fetch_all(&self.pool)
                    .await
                    .map_err($crate::error::StoreError::query("clear all tasks"))
            }

            async fn close(&self) {
                self.pool.close().await;
            }
        }
    };
}

pub(crate) use sql_task_store;
