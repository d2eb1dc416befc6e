use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use extraction::Record;

use super::{unauthorized, SecretQuery};
use crate::domains::monitor::run_manual_check;
use crate::server::app::AppState;

const ECHOED_RECORDS: usize = 5;

#[derive(Serialize)]
pub struct CheckResponse {
    success: bool,
    manual_check: bool,
    tokens_found: usize,
    tokens: Vec<Record>,
    notified: bool,
    timestamp: DateTime<Utc>,
}

/// Manual check (`GET|POST /api/check`): no dedup, no stats
pub async fn check_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<SecretQuery>,
) -> Response {
    if !state.authorized(query.secret.as_deref()) {
        return unauthorized();
    }

    match run_manual_check(&state.deps).await {
        Ok(check) => {
            let body = CheckResponse {
                success: true,
                manual_check: true,
                tokens_found: check.records.len(),
                tokens: check.records.into_iter().take(ECHOED_RECORDS).collect(),
                notified: check.notified,
                timestamp: check.checked_at,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Manual check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "manual_check": true,
                    "error": format!("{:#}", e),
                    "timestamp": Utc::now(),
                })),
            )
                .into_response()
        }
    }
}
