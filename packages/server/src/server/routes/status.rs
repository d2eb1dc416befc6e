use axum::{extract::Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domains::monitor::{ExecutionLog, StatsStore};
use crate::server::app::{AppState, EnvironmentInfo};

const SERVICE_NAME: &str = "Launch Monitor";
const RECENT_RUNS: usize = 10;

#[derive(Serialize)]
pub struct StatusResponse {
    service: &'static str,
    status: &'static str,
    timestamp: DateTime<Utc>,
    version: &'static str,
    environment: EnvironmentInfo,
    endpoints: Endpoints,
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<Statistics>,
    seen_set: SeenSetInfo,
    recent_executions: Vec<ExecutionLog>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
pub struct Statistics {
    total_checks: u64,
    total_tokens_sent: u64,
    /// RFC 3339, or "Never"
    last_execution: String,
    uptime_seconds: u64,
}

#[derive(Serialize)]
pub struct SeenSetInfo {
    backend: &'static str,
    members: usize,
}

#[derive(Serialize)]
pub struct Endpoints {
    cron: &'static str,
    check: &'static str,
    status: &'static str,
    clear_seen: &'static str,
    health: &'static str,
}

const ENDPOINTS: Endpoints = Endpoints {
    cron: "/api/cron - Full run (also scheduled)",
    check: "/api/check - Manual check",
    status: "/api/status - This status page",
    clear_seen: "/api/seen/clear - Forget notified tokens",
    health: "/health - Liveness",
};

/// Read-only view over stored aggregates (`GET /api/status`).
///
/// Always 200; a storage failure shows up as `status: "error"`.
pub async fn status_handler(Extension(state): Extension<AppState>) -> Json<StatusResponse> {
    let seen = state.deps.seen_set();
    let seen_set = SeenSetInfo {
        backend: seen.backend(),
        members: seen.count_members().await,
    };

    let (status, statistics, recent_executions, error) =
        match StatsStore::new(state.deps.kv.clone()).read(RECENT_RUNS).await {
            Ok(snapshot) => {
                let statistics = Statistics {
                    total_checks: snapshot.total_checks,
                    total_tokens_sent: snapshot.total_tokens_sent,
                    last_execution: snapshot
                        .last_execution
                        .map(|at| at.to_rfc3339())
                        .unwrap_or_else(|| "Never".to_string()),
                    uptime_seconds: state.started_at.elapsed().as_secs(),
                };
                ("operational", Some(statistics), snapshot.recent_executions, None)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stats");
                ("error", None, Vec::new(), Some(format!("{:#}", e)))
            }
        };

    Json(StatusResponse {
        service: SERVICE_NAME,
        status,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        environment: state.environment.clone(),
        endpoints: ENDPOINTS,
        statistics,
        seen_set,
        recent_executions,
        error,
    })
}
