use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_SECONDS: f64 = 8.0;
/// Anything longer is treated as a typo
pub const MAX_TIMEOUT_SECONDS: f64 = 3600.0;

fn default_timeout_seconds() -> f64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "zh-CN,zh;q=0.9,en;q=0.8".to_string()
}

/// Outbound HTTP settings shared by every translation backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-request timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: f64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

impl NetworkConfig {
    /// Apply `TIMEOUT_SECONDS` from the environment if it parses
    pub fn apply_env(&mut self) {
        if let Some(seconds) = env::var("TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
        {
            self.timeout_seconds = seconds;
        }
    }

    /// Reset values that cannot be used as-is
    pub(crate) fn normalize(&mut self) {
        if !valid_timeout(self.timeout_seconds) {
            tracing::warn!(
                timeout_seconds = self.timeout_seconds,
                "invalid timeout, using default"
            );
            self.timeout_seconds = DEFAULT_TIMEOUT_SECONDS;
        }

        if self.user_agent.trim().is_empty() {
            self.user_agent = default_user_agent();
        }
    }

    /// Falls back to the default for values `normalize` would have rejected
    pub fn timeout(&self) -> Duration {
        if valid_timeout(self.timeout_seconds)
            && let Ok(timeout) = Duration::try_from_secs_f64(self.timeout_seconds)
        {
            return timeout;
        }
        Duration::from_secs_f64(DEFAULT_TIMEOUT_SECONDS)
    }
}

fn valid_timeout(seconds: f64) -> bool {
    seconds.is_finite() && seconds > 0.0 && seconds <= MAX_TIMEOUT_SECONDS
}
