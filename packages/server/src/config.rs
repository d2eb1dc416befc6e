use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Deployment mode. Development falls back to a built-in fixture page when
/// the source cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            other => anyhow::bail!("unknown APP_ENV: {}", other),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub chat_id: String,
    pub cron_secret: Option<String>,
    pub redis_url: Option<String>,
    pub redis_token: Option<String>,
    pub source_url: String,
    pub port: u16,
    pub environment: Environment,
    pub cron_schedule: String,
    pub scheduler_enabled: bool,
    pub fetch_timeout: Duration,
    pub retention: Duration,
    pub send_delay: Duration,
    pub rate_limit_delay: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            bot_token: env::var("BOT_TOKEN").context("BOT_TOKEN must be set")?,
            chat_id: env::var("CHAT_ID").context("CHAT_ID must be set")?,
            cron_secret: optional("CRON_SECRET"),
            redis_url: optional("REDIS_URL"),
            redis_token: optional("REDIS_TOKEN"),
            source_url: optional("SOURCE_URL").unwrap_or_else(|| "https://cookin.fun".to_string()),
            port: parse_or("PORT", 8080).context("PORT must be a valid number")?,
            environment: parse_or("APP_ENV", Environment::Production)
                .context("APP_ENV must be production or development")?,
            cron_schedule: optional("CRON_SCHEDULE").unwrap_or_else(|| "0 */5 * * * *".to_string()),
            scheduler_enabled: parse_or("SCHEDULER_ENABLED", true)
                .context("SCHEDULER_ENABLED must be true or false")?,
            fetch_timeout: Duration::from_secs(
                parse_or("FETCH_TIMEOUT_SECS", 15).context("FETCH_TIMEOUT_SECS must be a number")?,
            ),
            retention: Duration::from_secs(
                parse_or("RETENTION_SECS", 86_400).context("RETENTION_SECS must be a number")?,
            ),
            send_delay: Duration::from_millis(
                parse_or("SEND_DELAY_MS", 1_000).context("SEND_DELAY_MS must be a number")?,
            ),
            rate_limit_delay: Duration::from_millis(
                parse_or("RATE_LIMIT_DELAY_MS", 5_000)
                    .context("RATE_LIMIT_DELAY_MS must be a number")?,
            ),
        })
    }

    /// Upstash REST endpoint and token, when both are configured.
    pub fn redis_credentials(&self) -> Option<(&str, &str)> {
        match (&self.redis_url, &self.redis_token) {
            (Some(url), Some(token)) => Some((url.as_str(), token.as_str())),
            _ => None,
        }
    }
}

/// Unset and blank are the same thing.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{}={}: {}", name, raw, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_parse_or_default_when_unset() {
        let value: u64 = parse_or("LAUNCH_MONITOR_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
