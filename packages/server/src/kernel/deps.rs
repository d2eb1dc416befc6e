//! Server dependencies for the monitor (using traits for testability)
//!
//! This module provides the central dependency container used by the run
//! orchestrator, the scheduler and the HTTP routes. All external services
//! sit behind trait abstractions so tests can swap them out.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use telegram::{
    models::{ParseMode, SendMessageOptions},
    TelegramOptions, TelegramService,
};
use tracing::info;

use extraction::{
    DedupFilter, Extractor, KvCredentials, KvSeenSet, KvStore, MemoryKv, MemorySeenSet, SeenSet,
    UpstashKv,
};

use crate::config::Config;
use crate::domains::monitor::RunSettings;
use crate::kernel::{page_fetcher::PageFetcher, BaseNotifier, BasePageFetcher};

// =============================================================================
// TelegramService Adapter (implements BaseNotifier trait)
// =============================================================================

/// Wrapper around TelegramService that implements BaseNotifier for one chat
pub struct TelegramAdapter {
    service: Arc<TelegramService>,
    chat_id: String,
}

impl TelegramAdapter {
    pub fn new(service: Arc<TelegramService>, chat_id: impl Into<String>) -> Self {
        Self {
            service,
            chat_id: chat_id.into(),
        }
    }
}

#[async_trait]
impl BaseNotifier for TelegramAdapter {
    async fn send(&self, message: &str) -> Result<()> {
        let options = SendMessageOptions {
            parse_mode: Some(ParseMode::Markdown),
            disable_web_page_preview: true,
            disable_notification: false,
        };
        self.service
            .send_message(&self.chat_id, message, &options)
            .await
            .map(|_| ())
            .map_err(anyhow::Error::new)
    }

    async fn verify(&self) -> Result<String> {
        let me = self.service.get_me().await.map_err(anyhow::Error::new)?;
        Ok(me
            .username
            .map(|username| format!("@{}", username))
            .unwrap_or(me.first_name))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies shared by every run (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub fetcher: Arc<dyn BasePageFetcher>,
    pub notifier: Arc<dyn BaseNotifier>,
    /// Backing store for execution stats (and the seen-set when remote)
    pub kv: Arc<dyn KvStore>,
    pub dedup: DedupFilter,
    pub extractor: Extractor,
    pub settings: RunSettings,
}

impl ServerDeps {
    pub fn new(
        fetcher: Arc<dyn BasePageFetcher>,
        notifier: Arc<dyn BaseNotifier>,
        kv: Arc<dyn KvStore>,
        seen: Arc<dyn SeenSet>,
        settings: RunSettings,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            kv,
            dedup: DedupFilter::new(seen).with_retention(settings.retention),
            extractor: Extractor::default(),
            settings,
        }
    }

    /// Production wiring: real fetcher and Telegram, Upstash when configured,
    /// otherwise in-process stores.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = Arc::new(PageFetcher::new(config.fetch_timeout)?);

        let telegram = Arc::new(TelegramService::new(TelegramOptions::new(
            config.bot_token.clone(),
        )));
        let notifier = Arc::new(TelegramAdapter::new(telegram, config.chat_id.clone()));

        let (kv, seen): (Arc<dyn KvStore>, Arc<dyn SeenSet>) = match config.redis_credentials() {
            Some((url, token)) => {
                let kv: Arc<dyn KvStore> = Arc::new(
                    UpstashKv::new(KvCredentials::new(url, token))
                        .context("Failed to create Upstash client")?,
                );
                info!("Using Redis for persistent storage");
                (kv.clone(), Arc::new(KvSeenSet::new(kv)))
            }
            None => {
                info!("Using in-memory storage (set REDIS_URL and REDIS_TOKEN to persist)");
                (Arc::new(MemoryKv::new()), Arc::new(MemorySeenSet::new()))
            }
        };

        Ok(Self::new(
            fetcher,
            notifier,
            kv,
            seen,
            RunSettings::from_config(config),
        ))
    }

    pub fn seen_set(&self) -> &Arc<dyn SeenSet> {
        self.dedup.seen_set()
    }
}
