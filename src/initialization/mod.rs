//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - The logger
//! - The HTTP client (timeouts, redirect cap, user agent)
//! - The concurrency semaphore
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

use std::sync::Arc;

use tokio::sync::Semaphore;

pub use client::init_client;
pub use logger::init_logger_with;

/// Initializes a semaphore for controlling concurrency.
///
/// The returned semaphore caps the number of domains processed at once; one
/// permit is held for the lifetime of each worker task.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}
