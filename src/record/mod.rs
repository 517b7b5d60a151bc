//! Domain records, status state machine and retry policy.
//!
//! A [`DomainRecord`] is the unit of work for the whole pipeline: one row per
//! tracked domain. Status transitions happen only in the Domain Processor;
//! eligibility for (re)processing is recomputed from the persisted
//! `attempt_count` and `last_checked_at` fields by [`RetryPolicy`], so no
//! scheduler state needs to survive a restart.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

/// Processing status of a tracked domain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DomainStatus {
    /// Created but never processed, or re-eligible after a backoff window.
    Pending,
    /// Claimed by a scheduler batch; a worker owns it.
    Processing,
    /// A policy page was located and at least one field extracted.
    Success,
    /// The last attempt hit a transient error (timeout, unreachable).
    Failed,
    /// No candidate page resolved, or the page yielded nothing.
    NotFound,
}

/// One entry per tracked domain.
///
/// `company_name`/`contact_url` hold the last successful extraction and are
/// never cleared by a later failed or not-found attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainRecord {
    /// Normalized hostname (lowercase, no scheme or path). Unique key.
    pub domain: String,
    pub status: DomainStatus,
    pub company_name: Option<String>,
    pub contact_url: Option<String>,
    /// The policy page URL that yielded the stored `company_name`, or the
    /// last successful page when no name has ever been extracted.
    pub source_url: Option<String>,
    /// Timestamp of the most recent processing attempt.
    pub last_checked_at: Option<DateTime<Utc>>,
    /// Number of processing attempts so far.
    pub attempt_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DomainRecord {
    /// Creates a fresh `pending` record for a normalized domain.
    pub fn new(domain: impl Into<String>, now: DateTime<Utc>) -> Self {
        DomainRecord {
            domain: domain.into(),
            status: DomainStatus::Pending,
            company_name: None,
            contact_url: None,
            source_url: None,
            last_checked_at: None,
            attempt_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Backoff and re-verification policy.
///
/// All windows are in seconds. `failed` and `not_found` grow exponentially
/// with `attempt_count` (doubling per attempt) up to `backoff_cap_secs`;
/// `success` records re-enter the queue after the flat `reverify_after_secs`
/// interval. Records stuck in `processing` (a store write failed mid-batch)
/// become eligible again after `stale_processing_secs`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub failed_backoff_secs: u64,
    pub not_found_backoff_secs: u64,
    pub backoff_cap_secs: u64,
    pub reverify_after_secs: u64,
    pub stale_processing_secs: u64,
}

impl RetryPolicy {
    /// The minimum delay before a record with the given status and attempt
    /// count becomes eligible again. `None` means immediately eligible.
    pub fn backoff_window_secs(&self, status: DomainStatus, attempt_count: u32) -> Option<u64> {
        match status {
            DomainStatus::Pending => None,
            DomainStatus::Processing => Some(self.stale_processing_secs),
            DomainStatus::Failed => {
                Some(exponential(self.failed_backoff_secs, attempt_count).min(self.backoff_cap_secs))
            }
            DomainStatus::NotFound => Some(
                exponential(self.not_found_backoff_secs, attempt_count).min(self.backoff_cap_secs),
            ),
            DomainStatus::Success => Some(self.reverify_after_secs),
        }
    }

    /// Whether a record is eligible for (re)processing at `now`.
    pub fn is_due(&self, record: &DomainRecord, now: DateTime<Utc>) -> bool {
        let Some(window) = self.backoff_window_secs(record.status, record.attempt_count) else {
            return true;
        };
        // For in-flight records the claim time is what matters; for finished
        // ones, the last attempt.
        let anchor = match record.status {
            DomainStatus::Processing => record.updated_at,
            _ => record.last_checked_at.unwrap_or(record.updated_at),
        };
        let window = Duration::seconds(window.min(i64::MAX as u64) as i64);
        now >= anchor + window
    }
}

/// `base * 2^(attempt_count - 1)`, saturating. The shift is clamped so large
/// attempt counts cannot overflow before the cap is applied.
fn exponential(base: u64, attempt_count: u32) -> u64 {
    let shift = attempt_count.saturating_sub(1).min(20);
    base.saturating_mul(1u64 << shift)
}

/// Normalizes user input to a bare hostname: lowercase, scheme, path, query
/// and port stripped. Returns `None` for input that cannot name a host.
pub fn normalize_domain(input: &str) -> Option<String> {
    let mut s = input.trim().to_lowercase();
    for scheme in ["https://", "http://"] {
        if let Some(rest) = s.strip_prefix(scheme) {
            s = rest.to_string();
            break;
        }
    }
    if let Some(idx) = s.find(['/', '?', '#']) {
        s.truncate(idx);
    }
    if let Some(idx) = s.find(':') {
        s.truncate(idx);
    }
    let s = s.trim_end_matches('.').to_string();
    if s.is_empty() || !s.contains('.') || s.contains(char::is_whitespace) {
        return None;
    }
    Some(s)
}
