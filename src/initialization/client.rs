//! HTTP client initialization.
//!
//! This module provides functions to initialize the HTTP client with proper
//! configuration for timeouts and redirect handling.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::ClientBuilder;

use crate::config::{Config, MAX_REDIRECT_HOPS, TCP_CONNECT_TIMEOUT_SECS};
use crate::error_handling::InitializationError;

/// Initializes the HTTP client shared by every worker task.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the configuration
/// - Per-request timeout from the configuration
/// - A separate TCP connect timeout, so dead hosts fail fast
/// - Redirect following capped at [`MAX_REDIRECT_HOPS`] hops
/// - Rustls TLS backend (no native TLS)
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &Config) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .redirect(Policy::limited(MAX_REDIRECT_HOPS))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}
