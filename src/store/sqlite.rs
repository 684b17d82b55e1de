// src/store/sqlite.rs

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::{queries, StoreResult};
use crate::error::StoreError;

/// Task store backed by SQLite, for local runs and tests.
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    /// Opens (creating if needed) the database named by a `sqlite:` url.
    ///
    /// The pool holds a single long-lived connection: SQLite serializes writers
    /// anyway, and an in-memory database only lives as long as its connection.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(StoreError::Connect)?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> StoreResult<()> {
        sqlx::query(queries::SCHEMA_TASKS_SQLITE)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Migrate)?;
        Ok(())
    }
}

super::sql_task_store!(SqliteTaskStore);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskStore;
    use chrono::{TimeZone, Utc};

    async fn memory_store() -> SqliteTaskStore {
        SqliteTaskStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn created_tasks_start_incomplete_with_fresh_ids() {
        let store = memory_store().await;

        let first = store.create_task("Buy milk", None).await.unwrap();
        let second = store.create_task("Call mom", None).await.unwrap();
        assert!(!first.completed);
        assert!(!second.completed);
        assert_ne!(first.id, second.id);

        // Deleting the newest row must not free its id for reuse.
        store.delete_task(second.id).await.unwrap();
        let third = store.create_task("Pay rent", None).await.unwrap();
        assert!(third.id > second.id);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = memory_store().await;
        let due = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        store.create_task("a", Some(due)).await.unwrap();
        store.create_task("b", None).await.unwrap();
        store.create_task("c", None).await.unwrap();

        let tasks = store.list_tasks().await.unwrap();
        let texts: Vec<&str> = tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(tasks[0].due_date, Some(due));
    }

    #[tokio::test]
    async fn updating_fields_without_due_date_clears_it() {
        let store = memory_store().await;
        let due = Utc.with_ymd_and_hms(2024, 6, 30, 17, 0, 0).unwrap();
        let task = store.create_task("Submit report", Some(due)).await.unwrap();
        assert_eq!(task.due_date, Some(due));

        let updated = store
            .update_task_fields(task.id, "Submit final report", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.text, "Submit final report");
        assert_eq!(updated.due_date, None);
        assert!(!updated.completed);
    }

    #[tokio::test]
    async fn completion_toggle_leaves_other_fields_alone() {
        let store = memory_store().await;
        let due = Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap();
        let task = store.create_task("Renew passport", Some(due)).await.unwrap();

        let done = store.update_task_completion(task.id, true).await.unwrap().unwrap();
        assert!(done.completed);

        let undone = store.update_task_completion(task.id, false).await.unwrap().unwrap();
        assert_eq!(undone, task);
    }

    #[tokio::test]
    async fn missing_ids_come_back_as_none() {
        let store = memory_store().await;
        assert!(store.update_task_fields(999, "x", None).await.unwrap().is_none());
        assert!(store.update_task_completion(999, true).await.unwrap().is_none());
        assert!(store.delete_task(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_returns_prior_state() {
        let store = memory_store().await;
        let task = store.create_task("Clean garage", None).await.unwrap();
        store.update_task_completion(task.id, true).await.unwrap();

        let removed = store.delete_task(task.id).await.unwrap().unwrap();
        assert_eq!(removed.text, "Clean garage");
        assert!(removed.completed);
        assert!(store.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_completed_removes_exactly_the_completed_tasks() {
        let store = memory_store().await;
        let a = store.create_task("a", None).await.unwrap();
        let b = store.create_task("b", None).await.unwrap();
        let c = store.create_task("c", None).await.unwrap();
        store.update_task_completion(a.id, true).await.unwrap();
        store.update_task_completion(c.id, true).await.unwrap();

        let mut removed: Vec<i64> = store
            .delete_completed_tasks()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        removed.sort();
        assert_eq!(removed, vec![a.id, c.id]);

        let remaining = store.list_tasks().await.unwrap();
        assert_eq!(remaining, vec![b]);

        assert!(store.delete_completed_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_all_removes_everything() {
        let store = memory_store().await;
        let a = store.create_task("a", None).await.unwrap();
        store.create_task("b", None).await.unwrap();
        store.update_task_completion(a.id, true).await.unwrap();

        assert_eq!(store.clear_all_tasks().await.unwrap().len(), 2);
        assert!(store.list_tasks().await.unwrap().is_empty());
        assert!(store.clear_all_tasks().await.unwrap().is_empty());
    }
}
