use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use extraction::Record;

use super::{unauthorized, SecretQuery};
use crate::domains::monitor::{run_monitor, RunState};
use crate::server::app::AppState;

/// Dispatched records echoed back in the response.
const ECHOED_RECORDS: usize = 3;

#[derive(Serialize)]
pub struct CronResponse {
    success: bool,
    run_id: Uuid,
    timestamp: DateTime<Utc>,
    state: RunState,
    tokens_scraped: usize,
    tokens_new: usize,
    tokens_sent: usize,
    tokens: Vec<Record>,
    message: String,
}

#[derive(Serialize)]
pub struct CronErrorResponse {
    success: bool,
    run_id: Uuid,
    state: RunState,
    error: String,
    timestamp: DateTime<Utc>,
}

/// Full monitor run (`GET|POST /api/cron`)
pub async fn cron_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<SecretQuery>,
) -> Response {
    if !state.authorized(query.secret.as_deref()) {
        tracing::warn!("Rejected /api/cron call with bad secret");
        return unauthorized();
    }

    let summary = run_monitor(&state.deps).await;

    if !summary.is_success() {
        let body = CronErrorResponse {
            success: false,
            run_id: summary.run_id,
            state: summary.state,
            error: summary
                .error
                .unwrap_or_else(|| "Run did not complete".to_string()),
            timestamp: summary.started_at,
        };
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
    }

    let message = format!(
        "Checked {} tokens, sent {} new ones",
        summary.extracted, summary.sent
    );
    let body = CronResponse {
        success: true,
        run_id: summary.run_id,
        timestamp: summary.started_at,
        state: summary.state,
        tokens_scraped: summary.extracted,
        tokens_new: summary.new,
        tokens_sent: summary.sent,
        tokens: summary.records.into_iter().take(ECHOED_RECORDS).collect(),
        message,
    };
    (StatusCode::OK, Json(body)).into_response()
}
