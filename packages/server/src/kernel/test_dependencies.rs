// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use telegram::TelegramError;
use tokio::time::Instant;

use extraction::{KvStore, MemoryKv, MemorySeenSet, SeenSet};

use super::{BaseNotifier, BasePageFetcher, ServerDeps};
use crate::domains::monitor::RunSettings;

// =============================================================================
// Mock Page Fetcher
// =============================================================================

pub struct MockPageFetcher {
    responses: Arc<Mutex<Vec<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a page body
    pub fn with_page(self, html: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Ok(html.into()));
        self
    }

    /// Queue a fetch failure
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Err(message.into()));
        self
    }

    /// URLs that were fetched
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // An empty page yields no records
            return Ok("<html><body></body></html>".to_string());
        }
        responses.remove(0).map_err(|message| anyhow::anyhow!(message))
    }
}

// =============================================================================
// Mock Notifier
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Failure {
    Generic,
    /// 429 carrying a retry-after hint in seconds
    RateLimited(u64),
}

/// A delivered message and when (tokio clock) it went out.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub text: String,
    pub at: Instant,
}

pub struct MockNotifier {
    failures: Arc<Mutex<HashMap<usize, Failure>>>,
    attempts: Arc<Mutex<Vec<Instant>>>,
    sent: Arc<Mutex<Vec<SentMessage>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            failures: Arc::new(Mutex::new(HashMap::new())),
            attempts: Arc::new(Mutex::new(Vec::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail the `index`-th send attempt (0-based)
    pub fn failing_on(self, index: usize) -> Self {
        self.failures.lock().unwrap().insert(index, Failure::Generic);
        self
    }

    /// Answer the `index`-th send attempt with a 429
    pub fn rate_limited_on(self, index: usize) -> Self {
        self.retry_after_on(index, 5)
    }

    /// Like [`MockNotifier::rate_limited_on`], asking for `secs` of backoff
    pub fn retry_after_on(self, index: usize, secs: u64) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(index, Failure::RateLimited(secs));
        self
    }

    /// Messages that were delivered
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.text).collect()
    }

    /// When each send attempt started, failed ones included
    pub fn attempts(&self) -> Vec<Instant> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseNotifier for MockNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        let now = Instant::now();
        let index = {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(now);
            attempts.len() - 1
        };

        match self.failures.lock().unwrap().get(&index).copied() {
            Some(Failure::Generic) => anyhow::bail!("Mock notifier failure on attempt {}", index),
            Some(Failure::RateLimited(secs)) => Err(anyhow::Error::new(TelegramError::Api {
                code: 429,
                description: format!("Too Many Requests: retry after {}", secs),
                retry_after: Some(secs),
            })),
            None => {
                self.sent.lock().unwrap().push(SentMessage {
                    text: message.to_string(),
                    at: now,
                });
                Ok(())
            }
        }
    }

    async fn verify(&self) -> Result<String> {
        Ok("@mock_bot".to_string())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub fetcher: Arc<MockPageFetcher>,
    pub notifier: Arc<MockNotifier>,
    pub kv: Arc<MemoryKv>,
    pub seen: Arc<dyn SeenSet>,
    pub settings: RunSettings,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            fetcher: Arc::new(MockPageFetcher::new()),
            notifier: Arc::new(MockNotifier::new()),
            kv: Arc::new(MemoryKv::new()),
            seen: Arc::new(MemorySeenSet::new()),
            settings: RunSettings::immediate(),
        }
    }

    /// Set a mock page fetcher
    pub fn mock_fetcher(mut self, fetcher: MockPageFetcher) -> Self {
        self.fetcher = Arc::new(fetcher);
        self
    }

    /// Set a mock notifier
    pub fn mock_notifier(mut self, notifier: MockNotifier) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Use a specific seen-set backend
    pub fn seen_set(mut self, seen: Arc<dyn SeenSet>) -> Self {
        self.seen = seen;
        self
    }

    pub fn settings(mut self, settings: RunSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build ServerDeps sharing these mocks
    pub fn server_deps(&self) -> ServerDeps {
        let kv: Arc<dyn KvStore> = self.kv.clone();
        ServerDeps::new(
            self.fetcher.clone(),
            self.notifier.clone(),
            kv,
            self.seen.clone(),
            self.settings.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
