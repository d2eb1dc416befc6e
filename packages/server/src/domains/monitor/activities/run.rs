//! One monitor cycle: fetch, extract, filter, notify, persist.

use chrono::Utc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::domains::monitor::activities::fetch_source;
use crate::domains::monitor::data::{ExecutionLog, StatsStore};
use crate::domains::monitor::formatter::format_record;
use crate::domains::monitor::models::{RunState, RunSummary};
use crate::kernel::{is_rate_limited, retry_after, ServerDeps};

/// Run one cycle. Never fails: problems end up in the returned summary.
///
/// A fetch failure (outside development mode) stops the run before anything
/// is written. Only records whose notification was delivered are committed
/// to the seen-set.
pub async fn run_monitor(deps: &ServerDeps) -> RunSummary {
    let mut summary = RunSummary::start(Utc::now());
    info!(run_id = %summary.run_id, url = %deps.settings.source_url, "Starting monitor run");

    let fetched = match fetch_source(deps).await {
        Ok(fetched) => fetched,
        Err(e) => {
            error!(run_id = %summary.run_id, error = %e, "Fetch failed, aborting run");
            summary.fail(format!("{:#}", e));
            return summary;
        }
    };

    summary.advance(RunState::Extracting);
    let records = fetched.into_records(deps);
    summary.extracted = records.len();

    summary.advance(RunState::Filtering);
    let fresh = deps.dedup.partition_new(records).await;
    summary.new = fresh.len();

    summary.advance(RunState::Notifying);
    if fresh.is_empty() {
        info!(run_id = %summary.run_id, "No new tokens found");
    }

    // Set after a rate limit: the longer of our own floor and the server's hint
    let mut backoff: Option<Duration> = None;
    for (index, record) in fresh.into_iter().enumerate() {
        if index > 0 {
            let pause = match backoff {
                Some(backoff) => backoff.max(deps.settings.send_delay),
                None => deps.settings.send_delay,
            };
            tokio::time::sleep(pause).await;
        }

        let message = format_record(&record, Utc::now());
        match deps.notifier.send(&message).await {
            Ok(()) => {
                backoff = None;
                if !deps.dedup.commit(&record).await {
                    warn!(key = %record.identity_key(), "Sent but could not mark as seen");
                }
                info!(symbol = %record.symbol, confidence = record.confidence, "Notification sent");
                summary.sent += 1;
                summary.records.push(record);
            }
            Err(e) => {
                let rate_limited = is_rate_limited(&e);
                backoff = rate_limited.then(|| {
                    let floor = deps.settings.rate_limit_delay;
                    retry_after(&e).map_or(floor, |hint| hint.max(floor))
                });
                warn!(
                    symbol = %record.symbol,
                    rate_limited,
                    backoff_ms = backoff.map(|b| b.as_millis() as u64),
                    error = %e,
                    "Notification failed, record stays eligible"
                );
            }
        }
    }

    summary.advance(RunState::Persisting);
    let log = ExecutionLog {
        timestamp: summary.started_at,
        tokens_sent: summary.sent,
        success: true,
    };
    if let Err(e) = StatsStore::new(deps.kv.clone()).record_run(&log).await {
        error!(run_id = %summary.run_id, error = %e, "Failed to persist run stats");
    }

    summary.advance(RunState::Done);
    info!(
        run_id = %summary.run_id,
        extracted = summary.extracted,
        new = summary.new,
        sent = summary.sent,
        "Monitor run finished"
    );
    summary
}
