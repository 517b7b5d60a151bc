//! Configuration types and CLI options.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::config::constants::{
    DB_PATH, DEFAULT_BACKOFF_CAP_SECS, DEFAULT_FAILED_BACKOFF_SECS, DEFAULT_INTERVAL_SECS,
    DEFAULT_MAX_CONCURRENCY, DEFAULT_NOT_FOUND_BACKOFF_SECS, DEFAULT_REVERIFY_AFTER_SECS,
    DEFAULT_STALE_PROCESSING_SECS, DEFAULT_USER_AGENT, FETCH_TIMEOUT_SECS,
};
use crate::record::RetryPolicy;

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Pipeline configuration.
///
/// Doubles as the shared CLI option block (flattened into the binary's
/// argument parser) and the programmatic configuration for library callers.
///
/// # Examples
///
/// ```no_run
/// use policyscout::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("./domains.db"),
///     max_concurrency: 4,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// SQLite database path
    #[arg(long, default_value = DB_PATH, global = true)]
    pub db_path: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// Maximum number of domains processed concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY, global = true)]
    pub max_concurrency: usize,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = FETCH_TIMEOUT_SECS, global = true)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    pub user_agent: String,

    /// Scheduler period for watch mode, in seconds
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS, global = true)]
    pub interval_secs: u64,

    /// Base re-check delay after a transient failure, in seconds
    #[arg(long, default_value_t = DEFAULT_FAILED_BACKOFF_SECS, global = true)]
    pub failed_backoff_secs: u64,

    /// Base re-check delay after a not-found outcome, in seconds
    #[arg(long, default_value_t = DEFAULT_NOT_FOUND_BACKOFF_SECS, global = true)]
    pub not_found_backoff_secs: u64,

    /// Cap on any computed backoff window, in seconds
    #[arg(long, default_value_t = DEFAULT_BACKOFF_CAP_SECS, global = true)]
    pub backoff_cap_secs: u64,

    /// Re-verification interval for successfully resolved domains, in seconds
    #[arg(long, default_value_t = DEFAULT_REVERIFY_AFTER_SECS, global = true)]
    pub reverify_after_secs: u64,

    /// Window after which a record stuck in processing is selected again, in seconds
    #[arg(long, default_value_t = DEFAULT_STALE_PROCESSING_SECS, global = true)]
    pub stale_processing_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_PATH),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            timeout_seconds: FETCH_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            failed_backoff_secs: DEFAULT_FAILED_BACKOFF_SECS,
            not_found_backoff_secs: DEFAULT_NOT_FOUND_BACKOFF_SECS,
            backoff_cap_secs: DEFAULT_BACKOFF_CAP_SECS,
            reverify_after_secs: DEFAULT_REVERIFY_AFTER_SECS,
            stale_processing_secs: DEFAULT_STALE_PROCESSING_SECS,
        }
    }
}

impl Config {
    /// Builds the retry policy derived from the configured backoff knobs.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            failed_backoff_secs: self.failed_backoff_secs,
            not_found_backoff_secs: self.not_found_backoff_secs,
            backoff_cap_secs: self.backoff_cap_secs,
            reverify_after_secs: self.reverify_after_secs,
            stale_processing_secs: self.stale_processing_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert_eq!(config.timeout_seconds, FETCH_TIMEOUT_SECS);
        assert_eq!(config.db_path, PathBuf::from(DB_PATH));
        assert_eq!(config.failed_backoff_secs, DEFAULT_FAILED_BACKOFF_SECS);
    }

    #[test]
    fn test_retry_policy_mirrors_config() {
        let config = Config {
            failed_backoff_secs: 60,
            not_found_backoff_secs: 120,
            backoff_cap_secs: 600,
            reverify_after_secs: 3600,
            stale_processing_secs: 90,
            ..Default::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.failed_backoff_secs, 60);
        assert_eq!(policy.not_found_backoff_secs, 120);
        assert_eq!(policy.backoff_cap_secs, 600);
        assert_eq!(policy.reverify_after_secs, 3600);
        assert_eq!(policy.stale_processing_secs, 90);
    }
}
