//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::kernel::ServerDeps;
use crate::server::routes::{
    check_handler, clear_seen_handler, cron_handler, health_handler, status_handler,
};

/// Which collaborators are configured, as reported by `/api/status`.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentInfo {
    pub bot_configured: bool,
    pub chat_configured: bool,
    pub redis_configured: bool,
    pub app_env: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    /// Required as `?secret=` on trigger routes when set
    pub cron_secret: Option<String>,
    pub environment: EnvironmentInfo,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(deps: Arc<ServerDeps>, cron_secret: Option<String>) -> Self {
        let redis_configured = deps.kv.backend() != "memory";
        Self {
            deps,
            cron_secret,
            environment: EnvironmentInfo {
                bot_configured: true,
                chat_configured: true,
                redis_configured,
                app_env: "production".to_string(),
            },
            started_at: Instant::now(),
        }
    }

    pub fn from_config(config: &Config, deps: Arc<ServerDeps>) -> Self {
        let mut state = Self::new(deps, config.cron_secret.clone());
        state.environment = EnvironmentInfo {
            bot_configured: !config.bot_token.is_empty(),
            chat_configured: !config.chat_id.is_empty(),
            redis_configured: config.redis_credentials().is_some(),
            app_env: config.environment.as_str().to_string(),
        };
        state
    }

    /// Whether a request carrying `provided` may trigger work.
    pub fn authorized(&self, provided: Option<&str>) -> bool {
        match &self.cron_secret {
            Some(secret) => provided == Some(secret.as_str()),
            None => true,
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    // CORS configuration - triggers are called from anywhere (cron services, dashboards)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .route("/api/cron", get(cron_handler).post(cron_handler))
        .route("/api/check", get(check_handler).post(check_handler))
        .route("/api/status", get(status_handler))
        .route("/api/seen/clear", post(clear_seen_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::TestDependencies;

    fn state(secret: Option<&str>) -> AppState {
        let deps = Arc::new(TestDependencies::new().server_deps());
        AppState::new(deps, secret.map(str::to_string))
    }

    #[test]
    fn test_no_secret_allows_everything() {
        let state = state(None);
        assert!(state.authorized(None));
        assert!(state.authorized(Some("anything")));
    }

    #[test]
    fn test_secret_must_match() {
        let state = state(Some("s3cret"));
        assert!(state.authorized(Some("s3cret")));
        assert!(!state.authorized(Some("wrong")));
        assert!(!state.authorized(None));
    }

    #[test]
    fn test_memory_backend_is_not_redis() {
        assert!(!state(None).environment.redis_configured);
    }
}
