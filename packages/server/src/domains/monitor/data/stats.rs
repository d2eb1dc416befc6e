//! Persisted run aggregates: a counter hash plus a bounded log of recent runs.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use extraction::KvStore;

pub const STATS_KEY: &str = "execution:stats";
pub const LOGS_KEY: &str = "execution:logs";

/// Runs kept in the log, newest first.
pub const MAX_LOGS: usize = 100;

const STATS_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// One entry in the recent-runs log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionLog {
    pub timestamp: DateTime<Utc>,
    pub tokens_sent: usize,
    pub success: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsSnapshot {
    pub total_checks: u64,
    pub total_tokens_sent: u64,
    pub last_execution: Option<DateTime<Utc>>,
    pub recent_executions: Vec<ExecutionLog>,
}

pub struct StatsStore {
    kv: Arc<dyn KvStore>,
}

impl StatsStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Fold one finished run into the aggregates.
    pub async fn record_run(&self, log: &ExecutionLog) -> Result<()> {
        let entry = serde_json::to_string(log).context("Failed to encode execution log")?;

        self.kv
            .list_push(LOGS_KEY, &entry)
            .await
            .context("Failed to append execution log")?;
        self.kv
            .list_trim(LOGS_KEY, 0, MAX_LOGS as isize - 1)
            .await
            .context("Failed to trim execution log")?;

        self.kv
            .hash_increment_by(STATS_KEY, "total_checks", 1)
            .await
            .context("Failed to bump total_checks")?;
        self.kv
            .hash_increment_by(STATS_KEY, "total_tokens_sent", log.tokens_sent as i64)
            .await
            .context("Failed to bump total_tokens_sent")?;
        self.kv
            .hash_set(STATS_KEY, "last_execution", &log.timestamp.to_rfc3339())
            .await
            .context("Failed to set last_execution")?;
        self.kv
            .expire(STATS_KEY, STATS_TTL)
            .await
            .context("Failed to refresh stats expiry")?;

        Ok(())
    }

    /// Counters plus the newest `recent` log entries.
    pub async fn read(&self, recent: usize) -> Result<StatsSnapshot> {
        let fields = self
            .kv
            .hash_get_all(STATS_KEY)
            .await
            .context("Failed to read execution stats")?;

        let counter = |name: &str| {
            fields
                .get(name)
                .and_then(|raw| raw.parse::<u64>().ok())
                .unwrap_or(0)
        };

        let last_execution = fields
            .get("last_execution")
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|at| at.with_timezone(&Utc));

        let recent_executions = if recent == 0 {
            Vec::new()
        } else {
            self.kv
                .list_range(LOGS_KEY, 0, recent as isize - 1)
                .await
                .context("Failed to read execution logs")?
                .into_iter()
                .filter_map(|raw| match serde_json::from_str::<ExecutionLog>(&raw) {
                    Ok(log) => Some(log),
                    Err(e) => {
                        warn!(error = %e, "Skipping unreadable execution log entry");
                        None
                    }
                })
                .collect()
        };

        Ok(StatsSnapshot {
            total_checks: counter("total_checks"),
            total_tokens_sent: counter("total_tokens_sent"),
            last_execution,
            recent_executions,
        })
    }
}
