//! Per-domain processing.
//!
//! Orchestrates Locator and Extractor for one domain and maps the outcome
//! onto the record's status. This is the only place status transitions
//! happen; everything downstream (backoff, re-verification) is derived from
//! the fields written here.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info};

use crate::error_handling::{OutcomeKind, PipelineStats};
use crate::extract::extract;
use crate::locate::{Located, Locator};
use crate::record::{DomainRecord, DomainStatus, RetryPolicy};
use crate::storage::DomainStore;

/// Shared state for a batch run, cloned into every worker task via `Arc`.
pub struct ProcessingContext {
    pub client: reqwest::Client,
    pub store: DomainStore,
    pub policy: RetryPolicy,
    pub stats: Arc<PipelineStats>,
    pub locator: Locator,
}

impl ProcessingContext {
    pub fn new(client: reqwest::Client, store: DomainStore, policy: RetryPolicy) -> Self {
        ProcessingContext {
            client,
            store,
            policy,
            stats: Arc::new(PipelineStats::new()),
            locator: Locator::new(),
        }
    }
}

/// Processes one domain: locate a policy page, extract, update the record.
///
/// Every run increments `attempt_count` and stamps `last_checked_at`. On
/// success the newly extracted fields overwrite the previous result, and
/// `source_url` follows the stored company name: it is replaced only when the
/// new page yielded a name (or none was stored yet), so the provenance of a
/// kept name stays intact. On any other outcome the previously stored
/// `company_name`/`contact_url`/`source_url` are left untouched, so a later
/// failure never erases a good result.
pub async fn process_domain(ctx: &ProcessingContext, mut record: DomainRecord) -> DomainRecord {
    let domain = record.domain.clone();
    debug!("Processing domain {domain} (attempt {})", record.attempt_count + 1);

    let located = ctx.locator.locate(&ctx.client, &domain).await;

    let now = Utc::now();
    record.attempt_count = record.attempt_count.saturating_add(1);
    record.last_checked_at = Some(now);
    record.updated_at = now;

    match located {
        Located::Found { url, html } => {
            let extraction = extract(&html, &url);
            if extraction.is_empty() {
                // Page fetched but no heuristic matched. Same retry cadence
                // as a missing page; kept distinct in the statistics.
                debug!("No extractable content on {url} for {domain}");
                record.status = DomainStatus::NotFound;
                ctx.stats.record(OutcomeKind::ExtractionEmpty);
            } else {
                info!(
                    "Resolved {domain}: company={:?} contact={:?} (via {url})",
                    extraction.company_name, extraction.contact_url
                );
                record.status = DomainStatus::Success;
                if extraction.company_name.is_some() {
                    record.company_name = extraction.company_name;
                    record.source_url = Some(url.to_string());
                } else if record.company_name.is_none() {
                    // No name from anywhere yet: the contact-only page is the
                    // best provenance we have.
                    record.source_url = Some(url.to_string());
                }
                if extraction.contact_url.is_some() {
                    record.contact_url = extraction.contact_url;
                }
                ctx.stats.record(OutcomeKind::Success);
            }
        }
        Located::NotFound => {
            debug!("No policy page found for {domain}");
            record.status = DomainStatus::NotFound;
            ctx.stats.record(OutcomeKind::PageNotFound);
        }
        Located::Unreachable => {
            debug!("Domain {domain} unreachable on all candidates");
            record.status = DomainStatus::Failed;
            ctx.stats.record(OutcomeKind::Unreachable);
        }
    }

    record
}
