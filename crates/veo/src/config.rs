//! Generator client configuration loaded from environment variables.

use std::time::Duration;

use serde::Serialize;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "veo-3.0-generate-001";

/// Connection settings for the remote video generator.
#[derive(Clone)]
pub struct GeneratorConfig {
    /// API base URL without a trailing slash.
    pub base_url: String,
    /// Model name used in `models/{model}:predictLongRunning`.
    pub model: String,
    /// Sent in the `x-goog-api-key` header.
    pub api_key: String,
    /// Per-request timeout (default: 30).
    pub timeout_secs: u64,
    /// TCP connect timeout (default: 10).
    pub connect_timeout_secs: u64,
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &mask_secret(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// Non-secret view of a [`GeneratorConfig`], safe to log or return to admins.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorInfo {
    pub base_url: String,
    pub model: String,
    pub api_key_configured: bool,
    pub api_key_masked: String,
    pub api_key_length: usize,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl GeneratorConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env var                          | Default                                          |
    /// |----------------------------------|--------------------------------------------------|
    /// | `GEMINI_API_KEY`                 | **required**                                     |
    /// | `VEO_BASE_URL`                   | https://generativelanguage.googleapis.com/v1beta |
    /// | `VEO_MODEL`                      | veo-3.0-generate-001                             |
    /// | `GENERATOR_TIMEOUT_SECS`         | `30`                                             |
    /// | `GENERATOR_CONNECT_TIMEOUT_SECS` | `10`                                             |
    ///
    /// # Panics
    ///
    /// Panics if `GEMINI_API_KEY` is unset or a numeric variable does not
    /// parse. Misconfiguration should fail fast at startup.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");

        let base_url = std::env::var("VEO_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let model = std::env::var("VEO_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let timeout_secs: u64 = std::env::var("GENERATOR_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("GENERATOR_TIMEOUT_SECS must be a valid u64");

        let connect_timeout_secs: u64 = std::env::var("GENERATOR_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("GENERATOR_CONNECT_TIMEOUT_SECS must be a valid u64");

        Self {
            base_url,
            model,
            api_key,
            timeout_secs,
            connect_timeout_secs,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Masked summary for diagnostics.
    pub fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key_configured: !self.api_key.is_empty(),
            api_key_masked: mask_secret(&self.api_key),
            api_key_length: self.api_key.chars().count(),
            timeout_secs: self.timeout_secs,
            connect_timeout_secs: self.connect_timeout_secs,
        }
    }
}

/// Reveal only the first and last five characters of a secret.
///
/// Secrets of ten characters or fewer are fully hidden.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 10 {
        return "***".to_string();
    }
    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 5..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> GeneratorConfig {
        GeneratorConfig {
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            api_key: api_key.into(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }

    #[test]
    fn masks_long_secret() {
        assert_eq!(mask_secret("abcdefghijklmnopqrstuvwxyz"), "abcde...vwxyz");
    }

    #[test]
    fn hides_short_secret() {
        assert_eq!(mask_secret("abcdefghij"), "***");
        assert_eq!(mask_secret(""), "***");
    }

    #[test]
    fn debug_output_never_contains_key() {
        let rendered = format!("{:?}", config("AIzaSyVerySecretKey123456"));
        assert!(!rendered.contains("VerySecret"));
        assert!(rendered.contains("AIzaS...23456"));
    }

    #[test]
    fn info_reports_masked_key() {
        let info = config("AIzaSyVerySecretKey123456").info();
        assert!(info.api_key_configured);
        assert_eq!(info.api_key_masked, "AIzaS...23456");
        assert_eq!(info.api_key_length, 25);
    }
}
