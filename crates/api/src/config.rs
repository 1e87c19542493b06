use std::time::Duration;

use vidgen_core::lifecycle::poller::{
    recency_window_minutes, DEFAULT_CONCURRENCY, DEFAULT_RECENCY_WINDOW_MINS,
    MAX_RECENCY_WINDOW_MINS,
};
use vidgen_core::lifecycle::PollOptions;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Append the user's preferred style to generator prompts (default: `false`).
    pub prompt_style_enhancement: bool,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Status poller settings.
    pub poller: PollerConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `60`                    |
    /// | `PROMPT_STYLE_ENHANCEMENT` | `false`                 |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let prompt_style_enhancement: bool = std::env::var("PROMPT_STYLE_ENHANCEMENT")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("PROMPT_STYLE_ENHANCEMENT must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            prompt_style_enhancement,
            jwt: JwtConfig::from_env(),
            poller: PollerConfig::from_env(),
        }
    }

    /// Check that a request outlives one submission: a pool acquire plus
    /// the generator start call. A shorter HTTP timeout would answer 408
    /// while the job is still being started.
    pub fn check_request_timeout(
        &self,
        generator_timeout: Duration,
        db_acquire_timeout: Duration,
    ) -> Result<(), String> {
        let needed = generator_timeout + db_acquire_timeout;
        let request = Duration::from_secs(self.request_timeout_secs);
        if request > needed {
            Ok(())
        } else {
            Err(format!(
                "REQUEST_TIMEOUT_SECS ({}s) must exceed the generator timeout plus \
                 the database acquire timeout ({}s)",
                request.as_secs(),
                needed.as_secs()
            ))
        }
    }
}

/// Settings for the in-process status poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Seconds between passes; `0` disables the background loop (default: `30`).
    pub interval_secs: u64,
    /// Only jobs created within this many minutes are polled (default: `120`).
    pub recency_window_mins: i64,
    /// Maximum concurrent status checks per pass (default: `8`).
    pub concurrency: usize,
}

impl PollerConfig {
    /// | Env Var                    | Default |
    /// |----------------------------|---------|
    /// | `POLL_INTERVAL_SECS`       | `30`    |
    /// | `POLL_RECENCY_WINDOW_MINS` | `120`   |
    /// | `POLL_CONCURRENCY`         | `8`     |
    pub fn from_env() -> Self {
        let interval_secs: u64 = std::env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("POLL_INTERVAL_SECS must be a valid u64");

        let recency_window_mins: i64 = std::env::var("POLL_RECENCY_WINDOW_MINS")
            .unwrap_or_else(|_| DEFAULT_RECENCY_WINDOW_MINS.to_string())
            .parse()
            .expect("POLL_RECENCY_WINDOW_MINS must be a valid i64");
        assert!(
            recency_window_minutes(recency_window_mins).is_some(),
            "POLL_RECENCY_WINDOW_MINS must be between 1 and {MAX_RECENCY_WINDOW_MINS}"
        );

        let concurrency: usize = std::env::var("POLL_CONCURRENCY")
            .unwrap_or_else(|_| DEFAULT_CONCURRENCY.to_string())
            .parse()
            .expect("POLL_CONCURRENCY must be a valid usize");

        Self {
            interval_secs,
            recency_window_mins,
            concurrency,
        }
    }

    /// Interval of the background loop, or `None` when it is disabled.
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_secs > 0).then(|| Duration::from_secs(self.interval_secs))
    }

    /// Out-of-range windows (only reachable by building the struct by
    /// hand) fall back to the default.
    pub fn poll_options(&self) -> PollOptions {
        let defaults = PollOptions::default();
        PollOptions {
            recency_window: recency_window_minutes(self.recency_window_mins)
                .unwrap_or(defaults.recency_window),
            concurrency: self.concurrency,
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            recency_window_mins: DEFAULT_RECENCY_WINDOW_MINS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_timeout(request_timeout_secs: u64) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: Vec::new(),
            request_timeout_secs,
            prompt_style_enhancement: false,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                access_token_expiry_mins: 60,
            },
            poller: PollerConfig::default(),
        }
    }

    #[test]
    fn request_timeout_must_cover_a_submission() {
        let generator = Duration::from_secs(30);
        let acquire = Duration::from_secs(5);

        assert!(config_with_timeout(60)
            .check_request_timeout(generator, acquire)
            .is_ok());
        assert!(config_with_timeout(35)
            .check_request_timeout(generator, acquire)
            .is_err());

        let err = config_with_timeout(30)
            .check_request_timeout(generator, acquire)
            .unwrap_err();
        assert!(err.contains("REQUEST_TIMEOUT_SECS (30s)"));
    }

    #[test]
    fn out_of_range_window_falls_back_to_default() {
        let config = PollerConfig {
            recency_window_mins: i64::MAX,
            ..PollerConfig::default()
        };
        assert_eq!(
            config.poll_options().recency_window,
            chrono::Duration::minutes(DEFAULT_RECENCY_WINDOW_MINS)
        );

        let config = PollerConfig {
            recency_window_mins: 15,
            ..PollerConfig::default()
        };
        assert_eq!(
            config.poll_options().recency_window,
            chrono::Duration::minutes(15)
        );
    }
}
