//! Domain record store backed by SQLite.
//!
//! This module initializes and configures the SQLite connection pool with:
//! - WAL mode enabled so concurrent per-domain saves don't serialize on a
//!   single writer lock
//! - Automatic database file creation
//! - Runtime migrations from the `migrations/` directory
//!
//! [`DomainStore`] is the pipeline's only shared resource: the Scheduler
//! reads due records at batch start and each worker writes its own record
//! exactly once at task end.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::{error, info};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite, SqlitePool};

use crate::error_handling::StoreError;
use crate::record::{DomainRecord, DomainStatus, RetryPolicy};

/// Initializes a database connection pool with an explicit path.
///
/// Creates the database file if it doesn't exist and enables WAL mode
/// for better concurrent access.
pub async fn init_db_pool_with_path(db_path: &Path) -> Result<Pool<Sqlite>, StoreError> {
    let db_path_str = db_path.to_string_lossy().to_string();
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&db_path_str)
    {
        Ok(_) => info!("Database file created successfully."),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Database file already exists.")
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(StoreError::FileCreation(e.to_string()));
        }
    }

    let pool = SqlitePool::connect(&format!("sqlite:{db_path_str}"))
        .await
        .map_err(StoreError::Sql)?;

    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .map_err(StoreError::Sql)?;

    Ok(pool)
}

/// Runs SQLx migrations located in the `migrations/` directory.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), StoreError> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir.as_path()).await?;
    migrator.run(pool).await?;
    Ok(())
}

/// Handle to the domain registry table.
#[derive(Clone)]
pub struct DomainStore {
    pool: SqlitePool,
}

impl DomainStore {
    pub fn new(pool: SqlitePool) -> Self {
        DomainStore { pool }
    }

    /// The underlying pool, for callers that need raw queries (tests).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Inserts a new `pending` record. Returns `false` when the domain is
    /// already tracked; existing rows are left untouched.
    pub async fn add(&self, domain: &str, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO domains (domain, status, attempt_count, created_at, updated_at)
             VALUES (?, ?, 0, ?, ?)",
        )
        .bind(domain)
        .bind(DomainStatus::Pending.to_string())
        .bind(now.timestamp_millis())
        .bind(now.timestamp_millis())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get(&self, domain: &str) -> Result<Option<DomainRecord>, StoreError> {
        let row = sqlx::query("SELECT * FROM domains WHERE domain = ?")
            .bind(domain)
            .fetch_optional(&self.pool)
            .await?;
        row.map(record_from_row).transpose()
    }

    pub async fn list_all(&self) -> Result<Vec<DomainRecord>, StoreError> {
        let rows = sqlx::query("SELECT * FROM domains ORDER BY domain")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(record_from_row).collect()
    }

    /// Removes a domain. Returns `false` if it was not tracked.
    pub async fn remove(&self, domain: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM domains WHERE domain = ?")
            .bind(domain)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Selects every record eligible for (re)processing at `now`.
    ///
    /// The backoff windows depend on per-record `attempt_count`, so the
    /// filtering happens in Rust over the full table; the registry is small
    /// by design (thousands of rows, not millions).
    pub async fn list_due(
        &self,
        now: DateTime<Utc>,
        policy: &RetryPolicy,
    ) -> Result<Vec<DomainRecord>, StoreError> {
        let all = self.list_all().await?;
        Ok(all
            .into_iter()
            .filter(|record| policy.is_due(record, now))
            .collect())
    }

    /// Claims a batch: flips each listed domain to `processing`.
    pub async fn mark_processing(
        &self,
        domains: &[String],
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        for domain in domains {
            sqlx::query("UPDATE domains SET status = ?, updated_at = ? WHERE domain = ?")
                .bind(DomainStatus::Processing.to_string())
                .bind(now.timestamp_millis())
                .bind(domain)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    /// Writes a processed record back. Single-row UPDATE keyed on the
    /// domain, so concurrent saves for distinct domains never conflict.
    pub async fn save(&self, record: &DomainRecord) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE domains SET
                status = ?,
                company_name = ?,
                contact_url = ?,
                source_url = ?,
                last_checked_at = ?,
                attempt_count = ?,
                updated_at = ?
             WHERE domain = ?",
        )
        .bind(record.status.to_string())
        .bind(&record.company_name)
        .bind(&record.contact_url)
        .bind(&record.source_url)
        .bind(record.last_checked_at.map(|t| t.timestamp_millis()))
        .bind(record.attempt_count as i64)
        .bind(record.updated_at.timestamp_millis())
        .bind(&record.domain)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_db_pool_creates_file_and_accepts_writes() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("policyscout.db");

        let pool = init_db_pool_with_path(&path).await.expect("pool");
        assert!(path.exists());
        run_migrations(&pool).await.expect("migrations");

        let store = DomainStore::new(pool);
        assert!(store.add("example.com", Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_init_db_pool_reuses_existing_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("policyscout.db");

        {
            let pool = init_db_pool_with_path(&path).await.expect("first open");
            run_migrations(&pool).await.expect("migrations");
            DomainStore::new(pool)
                .add("persisted.com", Utc::now())
                .await
                .unwrap();
        }

        let pool = init_db_pool_with_path(&path).await.expect("reopen");
        // Re-running migrations against an up-to-date database is a no-op.
        run_migrations(&pool).await.expect("migrations are idempotent");

        let store = DomainStore::new(pool);
        assert!(store.get("persisted.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_wal_mode_enabled() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("policyscout.db");
        let pool = init_db_pool_with_path(&path).await.expect("pool");

        let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }
}

fn record_from_row(row: SqliteRow) -> Result<DomainRecord, StoreError> {
    let status_text: String = row.try_get("status")?;
    let status = DomainStatus::from_str(&status_text)
        .map_err(|_| StoreError::InvalidStatus(status_text))?;

    let attempt_count: i64 = row.try_get("attempt_count")?;
    let last_checked_at: Option<i64> = row.try_get("last_checked_at")?;
    let created_at: i64 = row.try_get("created_at")?;
    let updated_at: i64 = row.try_get("updated_at")?;

    Ok(DomainRecord {
        domain: row.try_get("domain")?,
        status,
        company_name: row.try_get("company_name")?,
        contact_url: row.try_get("contact_url")?,
        source_url: row.try_get("source_url")?,
        last_checked_at: last_checked_at.and_then(DateTime::from_timestamp_millis),
        attempt_count: attempt_count.max(0) as u32,
        created_at: DateTime::from_timestamp_millis(created_at).unwrap_or_else(Utc::now),
        updated_at: DateTime::from_timestamp_millis(updated_at).unwrap_or_else(Utc::now),
    })
}
