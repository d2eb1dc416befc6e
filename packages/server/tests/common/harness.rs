//! Test harness for HTTP surface and orchestrator tests.
//!
//! Everything runs in-process: mock fetcher and notifier, memory KV and
//! seen-set. No containers or network.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use test_context::AsyncTestContext;
use tower::ServiceExt;

use launch_monitor::kernel::{ServerDeps, TestDependencies};
use launch_monitor::server::{build_app, AppState};

/// Install a test-writer subscriber once; later calls are no-ops.
pub fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Test harness that wires mocks into ServerDeps and the router.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let (status, body) = ctx.get("/health").await;
/// }
/// ```
pub struct TestHarness {
    /// The mocks, for assertions
    pub mocks: TestDependencies,
    pub deps: Arc<ServerDeps>,
    pub secret: Option<String>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::with_mocks(TestDependencies::new(), None)
    }

    async fn teardown(self) {
        // Everything is in memory and dropped with the harness
    }
}

impl TestHarness {
    pub fn with_mocks(mocks: TestDependencies, secret: Option<&str>) -> Self {
        init_tracing();
        let deps = Arc::new(mocks.server_deps());
        Self {
            mocks,
            deps,
            secret: secret.map(str::to_string),
        }
    }

    pub fn app(&self) -> Router {
        build_app(AppState::new(self.deps.clone(), self.secret.clone()))
    }

    /// Send one request through the router, returning status and JSON body.
    pub async fn request(&self, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .app()
            .oneshot(request)
            .await
            .expect("Router should not fail");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response should be JSON")
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri).await
    }

    pub async fn post(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::POST, uri).await
    }
}
