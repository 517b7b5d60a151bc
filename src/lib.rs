//! policyscout library: domain ownership discovery.
//!
//! This library maintains a registry of domains and periodically discovers,
//! for each one, the name of the company that operates it and a contact URL.
//! It does so by probing well-known privacy-policy and terms-of-service
//! paths, fetching the first page that resolves, and running a set of
//! extraction heuristics over the HTML. Results and per-domain retry state
//! are persisted in a SQLite database.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use policyscout::{
//!     init_client, init_db_pool_with_path, run_batch, run_migrations, Config,
//!     DomainStore, ProcessingContext,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let pool = init_db_pool_with_path(&config.db_path).await?;
//! run_migrations(&pool).await?;
//!
//! let store = DomainStore::new(pool);
//! store.add("example.com", chrono::Utc::now()).await?;
//!
//! let client = init_client(&config)?;
//! let ctx = Arc::new(ProcessingContext::new(client, store, config.retry_policy()));
//! let report = run_batch(ctx, config.max_concurrency).await?;
//! println!("{} of {} domains resolved", report.succeeded, report.selected);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

pub mod config;
pub mod error_handling;
pub mod extract;
pub mod fetch;
pub mod initialization;
pub mod locate;
pub mod process;
pub mod record;
pub mod scheduler;
pub mod storage;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{FetchError, OutcomeKind, PipelineStats, StoreError};
pub use extract::{extract, Extraction};
pub use fetch::{fetch_html, RawHtml};
pub use initialization::{init_client, init_logger_with};
pub use locate::{Located, Locator};
pub use process::{process_domain, ProcessingContext};
pub use record::{normalize_domain, DomainRecord, DomainStatus, RetryPolicy};
pub use scheduler::{run_batch, run_periodic, BatchReport};
pub use storage::{init_db_pool_with_path, run_migrations, DomainStore};
