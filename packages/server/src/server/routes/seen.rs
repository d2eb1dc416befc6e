use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

use super::{unauthorized, SecretQuery};
use crate::server::app::AppState;

/// Forget every notified record (`POST /api/seen/clear`)
pub async fn clear_seen_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<SecretQuery>,
) -> Response {
    if !state.authorized(query.secret.as_deref()) {
        return unauthorized();
    }

    let seen = state.deps.seen_set();
    let cleared = seen.clear().await;
    tracing::info!(backend = seen.backend(), cleared, "Seen-set cleared");

    let status = if cleared {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (
        status,
        Json(json!({
            "success": cleared,
            "backend": seen.backend(),
            "timestamp": Utc::now(),
        })),
    )
        .into_response()
}
