//! Configuration constants.
//!
//! Timeouts, size limits, and default backoff parameters used across the
//! pipeline. Values that a deployment is likely to tune are surfaced on
//! [`Config`](super::Config) instead; these are the fixed operational knobs.

use std::time::Duration;

/// Default per-request HTTP timeout in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 10;

/// TCP connection timeout in seconds.
/// Kept separate from the global timeout so a black-holed host fails fast
/// during connect instead of consuming the full request budget.
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Maximum number of redirect hops to follow before the fetch is abandoned
/// with `FetchError::TooManyRedirects`.
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Maximum response body size in bytes (2MB).
/// Policy pages beyond this are truncated before extraction to prevent
/// memory exhaustion on pathological responses.
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Per-domain processing timeout.
/// Covers the whole Locator -> Fetcher -> Extractor chain for one domain.
/// Budget: up to 20 candidate URLs, but the common case resolves within the
/// first few; 60s keeps a slow domain from stalling its worker slot for long.
pub const DOMAIN_PROCESSING_TIMEOUT: Duration = Duration::from_secs(60);

/// Upper bound on the politeness jitter applied before each domain task, in
/// milliseconds. Staggers outbound bursts at batch start.
pub const POLITENESS_JITTER_MAX_MS: u64 = 500;

/// Maximum number of policy-looking homepage links followed per domain.
/// Footers on large sites link dozens of legal pages; five covers the
/// privacy/terms/imprint links that matter.
pub const MAX_DISCOVERED_LINKS: usize = 5;

/// Default maximum number of domains processed concurrently per batch.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Default scheduler period for `watch` mode, in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 900;

/// Default SQLite database path.
pub const DB_PATH: &str = "./policyscout.db";

/// Default User-Agent string for outbound HTTP requests.
///
/// Overridable via the `--user-agent` CLI flag. Presenting a mainstream
/// browser UA avoids trivial bot rejections on policy pages.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Backoff defaults (seconds). All are overridable on Config; the exponential
// window doubles per attempt and is clamped at the cap.
/// Base re-check delay after a transient `failed` outcome (15 minutes).
pub const DEFAULT_FAILED_BACKOFF_SECS: u64 = 15 * 60;
/// Base re-check delay after a `not_found` outcome (6 hours). Slower than
/// `failed` because a missing page is unlikely to appear quickly.
pub const DEFAULT_NOT_FOUND_BACKOFF_SECS: u64 = 6 * 60 * 60;
/// Cap on any computed backoff window (7 days).
pub const DEFAULT_BACKOFF_CAP_SECS: u64 = 7 * 24 * 60 * 60;
/// Re-verification interval for `success` records (7 days), to catch rebrands.
pub const DEFAULT_REVERIFY_AFTER_SECS: u64 = 7 * 24 * 60 * 60;
/// Window after which a record stuck in `processing` (e.g. because a store
/// write failed mid-batch) becomes eligible for selection again (1 hour).
pub const DEFAULT_STALE_PROCESSING_SECS: u64 = 60 * 60;
