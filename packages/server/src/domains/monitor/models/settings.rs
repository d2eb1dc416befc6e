use std::time::Duration;

use extraction::DEFAULT_RETENTION;

use tracing::warn;

use crate::config::Config;

/// Floor for the pause between two notifications.
pub const MIN_SEND_DELAY: Duration = Duration::from_secs(1);

/// Floor for the pause after a rate limit.
pub const MIN_RATE_LIMIT_DELAY: Duration = Duration::from_secs(5);

/// Knobs for a single run, split out of [`Config`] so tests can build them
/// without touching the environment.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub source_url: String,
    /// Extract the built-in fixture page when the fetch fails
    pub development: bool,
    pub retention: Duration,
    /// Pause between two notifications
    pub send_delay: Duration,
    /// Pause after the transport reported a rate limit
    pub rate_limit_delay: Duration,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            source_url: "https://cookin.fun".to_string(),
            development: false,
            retention: DEFAULT_RETENTION,
            send_delay: MIN_SEND_DELAY,
            rate_limit_delay: MIN_RATE_LIMIT_DELAY,
        }
    }
}

impl RunSettings {
    /// Configured delays below the floors are raised to them.
    pub fn from_config(config: &Config) -> Self {
        Self {
            source_url: config.source_url.clone(),
            development: config.environment.is_development(),
            retention: config.retention,
            send_delay: at_least(config.send_delay, MIN_SEND_DELAY, "SEND_DELAY_MS"),
            rate_limit_delay: at_least(
                config.rate_limit_delay,
                MIN_RATE_LIMIT_DELAY,
                "RATE_LIMIT_DELAY_MS",
            ),
        }
    }

    /// Zero delays. Only for tests; [`RunSettings::from_config`] never
    /// produces these.
    pub fn immediate() -> Self {
        Self {
            send_delay: Duration::ZERO,
            rate_limit_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn at_least(configured: Duration, floor: Duration, name: &str) -> Duration {
    if configured < floor {
        warn!(
            setting = name,
            configured_ms = configured.as_millis() as u64,
            floor_ms = floor.as_millis() as u64,
            "Delay below minimum, using minimum"
        );
        floor
    } else {
        configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    fn config_with_delays(send_ms: u64, rate_limit_ms: u64) -> Config {
        Config {
            bot_token: "123:abc".to_string(),
            chat_id: "-100".to_string(),
            cron_secret: None,
            redis_url: None,
            redis_token: None,
            source_url: "https://launches.example".to_string(),
            port: 8080,
            environment: Environment::Development,
            cron_schedule: "0 */5 * * * *".to_string(),
            scheduler_enabled: false,
            fetch_timeout: Duration::from_secs(15),
            retention: Duration::from_secs(3_600),
            send_delay: Duration::from_millis(send_ms),
            rate_limit_delay: Duration::from_millis(rate_limit_ms),
        }
    }

    #[test]
    fn test_zero_delays_are_raised_to_minimums() {
        let settings = RunSettings::from_config(&config_with_delays(0, 0));

        assert_eq!(settings.send_delay, MIN_SEND_DELAY);
        assert_eq!(settings.rate_limit_delay, MIN_RATE_LIMIT_DELAY);
        assert_eq!(settings.source_url, "https://launches.example");
        assert!(settings.development);
    }

    #[test]
    fn test_longer_delays_are_kept() {
        let settings = RunSettings::from_config(&config_with_delays(2_500, 30_000));

        assert_eq!(settings.send_delay, Duration::from_millis(2_500));
        assert_eq!(settings.rate_limit_delay, Duration::from_secs(30));
    }
}
