//! Batch scheduling.
//!
//! A batch run selects every due record, claims it, and fans the work out to
//! a bounded pool of Tokio tasks. Failures are isolated per domain: one bad
//! domain updates its own record and nothing else. Only store unavailability
//! aborts a batch, and the periodic loop simply retries on the next tick.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{info, warn};
use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::config::{DOMAIN_PROCESSING_TIMEOUT, POLITENESS_JITTER_MAX_MS};
use crate::error_handling::OutcomeKind;
use crate::initialization::init_semaphore;
use crate::process::{process_domain, ProcessingContext};
use crate::record::{DomainRecord, DomainStatus};

/// Results of one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Number of due records selected into the batch.
    pub selected: usize,
    /// Domains that ended the batch in `success`.
    pub succeeded: usize,
    /// Domains that ended in `failed` (including processing timeouts).
    pub failed: usize,
    /// Domains that ended in `not_found`.
    pub not_found: usize,
}

/// Runs one scheduling batch: select due domains, process them through the
/// worker pool, write results back.
///
/// # Errors
///
/// Returns an error only when the store itself is unavailable (the due
/// selection or the batch claim fails). Per-domain failures never propagate.
pub async fn run_batch(ctx: Arc<ProcessingContext>, max_concurrency: usize) -> Result<BatchReport> {
    let now = Utc::now();
    let due = ctx
        .store
        .list_due(now, &ctx.policy)
        .await
        .context("Failed to select due domains from store")?;

    // The domain column is the primary key, so duplicates can't come from
    // the store; the set guards against future multi-source selection.
    let mut seen = HashSet::new();
    let batch: Vec<DomainRecord> = due
        .into_iter()
        .filter(|record| seen.insert(record.domain.clone()))
        .collect();

    let mut report = BatchReport {
        selected: batch.len(),
        ..Default::default()
    };
    if batch.is_empty() {
        info!("No domains due for processing");
        return Ok(report);
    }
    info!("Selected {} due domain(s)", batch.len());

    let domains: Vec<String> = batch.iter().map(|r| r.domain.clone()).collect();
    ctx.store
        .mark_processing(&domains, now)
        .await
        .context("Failed to claim batch in store")?;

    let semaphore = init_semaphore(max_concurrency);
    let mut tasks = FuturesUnordered::new();

    for mut record in batch {
        record.status = DomainStatus::Processing;

        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Semaphore closed, skipping domain {}", record.domain);
                continue;
            }
        };

        let ctx = Arc::clone(&ctx);
        tasks.push(tokio::spawn(async move {
            let _permit = permit;
            run_domain_task(&ctx, record).await
        }));
    }

    while let Some(task_result) = tasks.next().await {
        match task_result {
            Ok(Some(status)) => match status {
                DomainStatus::Success => report.succeeded += 1,
                DomainStatus::Failed => report.failed += 1,
                DomainStatus::NotFound => report.not_found += 1,
                // A task never reports pending/processing as final.
                DomainStatus::Pending | DomainStatus::Processing => {}
            },
            // Save failed; the record stays `processing` until the stale
            // window re-admits it. Already logged in the task.
            Ok(None) => {}
            Err(join_error) => {
                warn!("Domain task panicked: {join_error:?}");
                report.failed += 1;
            }
        }
    }

    info!(
        "Batch complete: {} selected, {} succeeded, {} not found, {} failed",
        report.selected, report.succeeded, report.not_found, report.failed
    );
    ctx.stats.log_summary();

    Ok(report)
}

/// Processes one claimed record and writes it back.
///
/// Returns the final status, or `None` when the store write failed and the
/// record was intentionally left in `processing`.
async fn run_domain_task(ctx: &ProcessingContext, record: DomainRecord) -> Option<DomainStatus> {
    // Stagger outbound requests a little at batch start.
    let jitter = rand::rng().random_range(0..POLITENESS_JITTER_MAX_MS);
    tokio::time::sleep(Duration::from_millis(jitter)).await;

    let domain = record.domain.clone();
    let prior = record.clone();

    let processed =
        match tokio::time::timeout(DOMAIN_PROCESSING_TIMEOUT, process_domain(ctx, record)).await {
            Ok(processed) => processed,
            Err(_) => {
                warn!(
                    "Processing {domain} timed out after {}s",
                    DOMAIN_PROCESSING_TIMEOUT.as_secs()
                );
                ctx.stats.record(OutcomeKind::ProcessingTimeout);
                timed_out_record(prior)
            }
        };

    if let Err(e) = ctx.store.save(&processed).await {
        warn!("Failed to save record for {domain}: {e}");
        ctx.stats.record(OutcomeKind::StoreWriteFailed);
        return None;
    }
    Some(processed.status)
}

/// The record written when a whole per-domain task exceeds its budget:
/// counted as a transient failure, previous results untouched.
fn timed_out_record(mut record: DomainRecord) -> DomainRecord {
    let now = Utc::now();
    record.status = DomainStatus::Failed;
    record.attempt_count = record.attempt_count.saturating_add(1);
    record.last_checked_at = Some(now);
    record.updated_at = now;
    record
}

/// Runs batches on a fixed period until cancelled.
///
/// A failed batch (store unavailable) is logged and retried on the next
/// tick; it never tears the loop down.
pub async fn run_periodic(
    ctx: Arc<ProcessingContext>,
    max_concurrency: usize,
    interval: Duration,
    cancel: CancellationToken,
) {
    info!(
        "Scheduler started (period: {}s, concurrency: {})",
        interval.as_secs(),
        max_concurrency
    );
    loop {
        if let Err(e) = run_batch(Arc::clone(&ctx), max_concurrency).await {
            warn!("Batch run failed, will retry on next tick: {e:#}");
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel.cancelled() => {
                info!("Scheduler shutting down");
                break;
            }
        }
    }
}
