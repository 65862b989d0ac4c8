use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

const DEFAULT_RENTCAST_BASE_URL: &str = "https://api.rentcast.io/v1";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENCAGE_BASE_URL: &str = "https://api.opencagedata.com";

/// Application configuration loaded from environment variables.
///
/// Provider keys are optional: a missing key degrades the matching feature
/// (warning logged, calls skipped) instead of preventing startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub rentcast_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub opencage_api_key: Option<String>,
    pub rentcast_base_url: String,
    pub openai_base_url: String,
    pub opencage_base_url: String,
    pub upstream_timeout_secs: u64,
    pub static_dir: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            rentcast_api_key: optional_env("RENTCAST_API_KEY"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            opencage_api_key: optional_env("OPENCAGE_API_KEY"),
            rentcast_base_url: env_or("RENTCAST_BASE_URL", DEFAULT_RENTCAST_BASE_URL),
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            opencage_base_url: env_or("OPENCAGE_BASE_URL", DEFAULT_OPENCAGE_BASE_URL),
            upstream_timeout_secs: env_or("UPSTREAM_TIMEOUT_SECS", "60")
                .parse::<u64>()
                .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
            static_dir: optional_env("STATIC_DIR").map(PathBuf::from),
            port: env_or("PORT", "5001")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Logs one warning per provider key that is not configured.
    pub fn warn_missing_keys(&self) {
        let keys = [
            ("RENTCAST_API_KEY", &self.rentcast_api_key),
            ("OPENAI_API_KEY", &self.openai_api_key),
            ("OPENCAGE_API_KEY", &self.opencage_api_key),
        ];
        for (name, value) in keys {
            if value.is_none() {
                warn!("{name} is not set; the features that depend on it are disabled");
            }
        }
    }
}

/// Blank values count as missing.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
impl Config {
    /// Config with no provider keys and every base URL pointing at `base_url`.
    pub fn for_tests(base_url: &str) -> Self {
        Config {
            rentcast_api_key: None,
            openai_api_key: None,
            opencage_api_key: None,
            rentcast_base_url: base_url.to_string(),
            openai_base_url: base_url.to_string(),
            opencage_base_url: base_url.to_string(),
            upstream_timeout_secs: 5,
            static_dir: None,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }

    pub fn with_all_keys(mut self) -> Self {
        self.rentcast_api_key = Some("rentcast-test-key".to_string());
        self.openai_api_key = Some("openai-test-key".to_string());
        self.opencage_api_key = Some("opencage-test-key".to_string());
        self
    }
}
