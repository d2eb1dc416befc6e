//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! One job: a full monitor run on the configured cron expression. Runs
//! triggered over HTTP go through the same orchestrator.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::monitor::run_monitor;
use crate::kernel::ServerDeps;

/// Start the scheduler with the monitor job on `schedule` (6-field cron).
pub async fn start_scheduler(deps: Arc<ServerDeps>, schedule: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let monitor_deps = deps.clone();
    let monitor_job = Job::new_async(schedule, move |_uuid, _lock| {
        let deps = monitor_deps.clone();
        Box::pin(async move {
            let summary = run_monitor(&deps).await;
            if let Some(error) = &summary.error {
                tracing::error!(run_id = %summary.run_id, "Scheduled run failed: {}", error);
            }
        })
    })
    .with_context(|| format!("Invalid CRON_SCHEDULE: {}", schedule))?;

    scheduler.add(monitor_job).await?;
    scheduler.start().await?;

    tracing::info!(schedule = %schedule, "Scheduled tasks started (monitor run)");
    Ok(scheduler)
}
