// Shared test helpers for database setup and test data creation.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use policyscout::{run_migrations, DomainRecord, DomainStatus, DomainStore, RetryPolicy};

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Creates a store over a fresh in-memory database.
#[allow(dead_code)]
pub async fn create_test_store() -> DomainStore {
    DomainStore::new(create_test_pool().await)
}

/// Inserts a domain and overwrites its record with the given state.
/// Returns the record as written.
#[allow(dead_code)]
pub async fn seed_domain(
    store: &DomainStore,
    domain: &str,
    status: DomainStatus,
    attempt_count: u32,
    last_checked_at: Option<DateTime<Utc>>,
) -> DomainRecord {
    let now = Utc::now();
    store
        .add(domain, now)
        .await
        .expect("Failed to add test domain");

    let mut record = store
        .get(domain)
        .await
        .expect("Failed to read back test domain")
        .expect("Test domain should exist after add");
    record.status = status;
    record.attempt_count = attempt_count;
    record.last_checked_at = last_checked_at;
    record.updated_at = last_checked_at.unwrap_or(now);

    store.save(&record).await.expect("Failed to seed record");
    record
}

/// A retry policy with windows small enough to reason about in tests.
#[allow(dead_code)]
pub fn short_policy() -> RetryPolicy {
    RetryPolicy {
        failed_backoff_secs: 60,
        not_found_backoff_secs: 600,
        backoff_cap_secs: 3600,
        reverify_after_secs: 86400,
        stale_processing_secs: 300,
    }
}
