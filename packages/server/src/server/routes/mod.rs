// HTTP routes
pub mod check;
pub mod cron;
pub mod health;
pub mod seen;
pub mod status;

pub use check::*;
pub use cron::*;
pub use health::*;
pub use seen::*;
pub use status::*;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Deserialize;
use serde_json::json;

/// `?secret=` on trigger routes
#[derive(Debug, Default, Deserialize)]
pub struct SecretQuery {
    pub secret: Option<String>,
}

pub(crate) fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
    )
        .into_response()
}
