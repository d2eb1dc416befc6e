//! HTTP surface tests through the router with tower's `oneshot`.

mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use test_context::test_context;

use extraction::SeenSet;
use launch_monitor::kernel::{MockPageFetcher, TestDependencies};

use crate::common::{TestHarness, THREE_TOKEN_KEYS, THREE_TOKEN_PAGE};

fn harness(page_runs: usize, secret: Option<&str>) -> TestHarness {
    let mut fetcher = MockPageFetcher::new();
    for _ in 0..page_runs {
        fetcher = fetcher.with_page(THREE_TOKEN_PAGE);
    }
    TestHarness::with_mocks(TestDependencies::new().mock_fetcher(fetcher), secret)
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_health(ctx: &TestHarness) {
    let (status, body) = ctx.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_status_before_any_run(ctx: &TestHarness) {
    let (status, body) = ctx.get("/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "operational");
    assert_eq!(body["statistics"]["total_checks"], 0);
    assert_eq!(body["statistics"]["last_execution"], "Never");
    assert_eq!(body["seen_set"]["backend"], "memory");
    assert_eq!(body["seen_set"]["members"], 0);
    assert_eq!(body["environment"]["redis_configured"], false);
    assert!(body["recent_executions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cron_rejects_bad_secret() {
    let ctx = harness(1, Some("s3cret"));

    let (status, body) = ctx.get("/api/cron").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = ctx.post("/api/cron?secret=wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert!(ctx.mocks.fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_cron_runs_with_secret() {
    let ctx = harness(1, Some("s3cret"));

    let (status, body) = ctx.post("/api/cron?secret=s3cret").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["state"], "DONE");
    assert_eq!(body["tokens_scraped"], 3);
    assert_eq!(body["tokens_new"], 3);
    assert_eq!(body["tokens_sent"], 3);
    assert_eq!(body["tokens"].as_array().unwrap().len(), 3);
    assert_eq!(body["tokens"][0]["symbol"], "AAA");
    assert_eq!(body["tokens"][0]["status"], "NEW");
    assert_eq!(body["tokens"][0]["source"], "line_pattern");
    assert_eq!(body["message"], "Checked 3 tokens, sent 3 new ones");
    assert!(body["run_id"].is_string());
}

#[tokio::test]
async fn test_cron_without_configured_secret_is_open() {
    let ctx = harness(1, None);
    let (status, body) = ctx.get("/api/cron").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokens_sent"], 3);
}

#[tokio::test]
async fn test_cron_fetch_failure_is_500() {
    let ctx = TestHarness::with_mocks(
        TestDependencies::new().mock_fetcher(MockPageFetcher::new().with_error("timed out")),
        None,
    );

    let (status, body) = ctx.get("/api/cron").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["state"], "FAILED");
    assert!(body["error"].as_str().unwrap().contains("timed out"));

    let stamped: DateTime<Utc> = body["timestamp"].as_str().unwrap().parse().unwrap();
    assert!(stamped <= Utc::now());
}

#[tokio::test]
async fn test_cron_timestamp_is_the_run_start() {
    let ctx = harness(1, None);
    let before = Utc::now();

    let (_, body) = ctx.get("/api/cron").await;
    let (_, status) = ctx.get("/api/status").await;

    let stamped: DateTime<Utc> = body["timestamp"].as_str().unwrap().parse().unwrap();
    assert!(stamped >= before);
    assert_eq!(body["timestamp"], status["recent_executions"][0]["timestamp"]);
}

#[tokio::test]
async fn test_status_reflects_runs() {
    let ctx = harness(2, None);
    ctx.get("/api/cron").await;
    ctx.get("/api/cron").await;

    let (status, body) = ctx.get("/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statistics"]["total_checks"], 2);
    assert_eq!(body["statistics"]["total_tokens_sent"], 3);
    assert_ne!(body["statistics"]["last_execution"], "Never");
    assert_eq!(body["seen_set"]["members"], 3);

    let recent = body["recent_executions"].as_array().unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["tokens_sent"], 0);
    assert_eq!(recent[1]["tokens_sent"], 3);
}

#[tokio::test]
async fn test_manual_check_reports_without_committing() {
    let ctx = harness(1, None);

    let (status, body) = ctx.post("/api/check").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["manual_check"], true);
    assert_eq!(body["tokens_found"], 3);
    assert_eq!(body["notified"], true);
    assert_eq!(ctx.mocks.seen.count_members().await, 0);
}

#[tokio::test]
async fn test_clear_seen() {
    let ctx = harness(2, Some("s3cret"));
    ctx.get("/api/cron?secret=s3cret").await;
    assert!(ctx.mocks.seen.is_member(THREE_TOKEN_KEYS[0]).await);

    let (status, _) = ctx.post("/api/seen/clear").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = ctx.post("/api/seen/clear?secret=s3cret").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(ctx.mocks.seen.count_members().await, 0);

    // Everything is announced again
    let (_, body) = ctx.get("/api/cron?secret=s3cret").await;
    assert_eq!(body["tokens_sent"], 3);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_clear_seen_is_post_only(ctx: &TestHarness) {
    let (status, _) = ctx.get("/api/seen/clear").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
