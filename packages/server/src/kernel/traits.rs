// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The run orchestrator in domains/monitor is written against these.
//
// Naming convention: Base* for trait names (e.g., BasePageFetcher, BaseNotifier)

use anyhow::Result;
use std::time::Duration;
use async_trait::async_trait;
use telegram::TelegramError;

// =============================================================================
// Page Fetcher Trait (Infrastructure - source page download)
// =============================================================================

#[async_trait]
pub trait BasePageFetcher: Send + Sync {
    /// Fetch the raw body of `url`. Non-2xx responses are errors.
    async fn fetch(&self, url: &str) -> Result<String>;
}

// =============================================================================
// Notifier Trait (Infrastructure - chat delivery)
// =============================================================================

#[async_trait]
pub trait BaseNotifier: Send + Sync {
    /// Deliver one pre-formatted message to the configured chat
    async fn send(&self, message: &str) -> Result<()>;

    /// Check credentials before the first run; returns a display name
    async fn verify(&self) -> Result<String> {
        Ok("unverified".to_string())
    }
}

/// Whether a delivery error is the chat service throttling us.
pub fn is_rate_limited(error: &anyhow::Error) -> bool {
    if let Some(telegram) = error.downcast_ref::<TelegramError>() {
        return telegram.is_rate_limited();
    }
    let error_str = error.to_string();
    error_str.contains("Too Many Requests") || error_str.contains("429")
}

/// How long the chat service asked us to back off, when it said so.
pub fn retry_after(error: &anyhow::Error) -> Option<Duration> {
    error
        .downcast_ref::<TelegramError>()
        .and_then(TelegramError::retry_after)
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_detection() {
        assert!(is_rate_limited(&anyhow::anyhow!(
            "Telegram API error 429: Too Many Requests: retry after 3"
        )));
        assert!(is_rate_limited(&anyhow::anyhow!("Too Many Requests")));
        assert!(!is_rate_limited(&anyhow::anyhow!("chat not found")));

        let typed = anyhow::Error::new(TelegramError::Api {
            code: 429,
            description: "Too Many Requests: retry after 3".to_string(),
            retry_after: Some(3),
        });
        assert!(is_rate_limited(&typed));
    }

    #[test]
    fn test_retry_after_only_from_typed_errors() {
        let typed = anyhow::Error::new(TelegramError::Api {
            code: 429,
            description: "Too Many Requests: retry after 12".to_string(),
            retry_after: Some(12),
        });
        assert_eq!(retry_after(&typed), Some(Duration::from_secs(12)));
        assert_eq!(retry_after(&anyhow::anyhow!("Too Many Requests: retry after 12")), None);
    }
}
