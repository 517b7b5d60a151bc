//! Error type definitions.
//!
//! This module defines the error taxonomy used throughout the pipeline.
//! Fetch failures are split into transient conditions (worth a fast retry)
//! and definitive HTTP answers (the page simply is not there), because the
//! Domain Processor maps the two onto different statuses.

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

/// Error types for domain store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreation(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A persisted status value that does not map to a known `DomainStatus`.
    #[error("Invalid status value in store: {0}")]
    InvalidStatus(String),
}

/// A single fetch attempt failure.
///
/// No retries happen at this layer; the retry policy lives with the Domain
/// Processor and Scheduler, driven by which variant came back.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Network-level failure: DNS resolution, connection refused/reset, TLS.
    #[error("host unreachable: {0}")]
    Unreachable(String),

    /// The server answered with a non-2xx status.
    #[error("unexpected HTTP status {0}")]
    BadStatus(u16),

    /// The redirect hop limit was exceeded.
    #[error("too many redirects")]
    TooManyRedirects,

    /// A 2xx response whose content type is not HTML.
    #[error("response is not HTML: {0}")]
    NotHtml(String),
}

impl FetchError {
    /// Whether this failure is transient and warrants a faster retry.
    ///
    /// `BadStatus` and `NotHtml` are definitive answers from the server: the
    /// candidate page is not there, which is a normal locator outcome rather
    /// than an error condition.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Timeout | FetchError::Unreachable(_) | FetchError::TooManyRedirects
        )
    }

    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_redirect() {
            FetchError::TooManyRedirects
        } else {
            // DNS failures, refused/reset connections and TLS errors all
            // surface as connect or request errors in reqwest.
            FetchError::Unreachable(e.to_string())
        }
    }
}

/// Per-domain pipeline outcomes tracked for end-of-batch statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum OutcomeKind {
    /// Page located and at least one field extracted.
    Success,
    /// No candidate page resolved.
    PageNotFound,
    /// Page fetched but no heuristic matched.
    ExtractionEmpty,
    /// All candidates failed transiently (timeout, unreachable).
    Unreachable,
    /// The whole per-domain task exceeded its processing timeout.
    ProcessingTimeout,
    /// The final record could not be written back to the store.
    StoreWriteFailed,
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::PageNotFound => "page not found",
            OutcomeKind::ExtractionEmpty => "extraction empty",
            OutcomeKind::Unreachable => "unreachable",
            OutcomeKind::ProcessingTimeout => "processing timeout",
            OutcomeKind::StoreWriteFailed => "store write failed",
        }
    }
}
