//! Config - TOML 設定ファイル
//!
//! すべての項目に既定値がある。ファイル指定なしなら既定値のみで起動する。

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DEFAULT_HISTORY_CAPACITY, DayOfMonthTrigger, RetryPolicy};
use crate::impls::RouterConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub router: RouterSection,

    #[serde(default)]
    pub orchestrator: OrchestratorSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterSection {
    #[serde(default = "default_router_host")]
    pub host: String,

    #[serde(default = "default_router_port")]
    pub port: u16,

    #[serde(default = "default_router_username")]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    #[serde(default = "default_retry_multiplier")]
    pub retry_multiplier: f64,
}

fn default_router_host() -> String {
    "192.168.88.1".to_string()
}

fn default_router_port() -> u16 {
    8728
}

fn default_router_username() -> String {
    "admin".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    500
}

fn default_retry_multiplier() -> f64 {
    2.0
}

impl Default for RouterSection {
    fn default() -> Self {
        Self {
            host: default_router_host(),
            port: default_router_port(),
            username: default_router_username(),
            password: String::new(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_multiplier: default_retry_multiplier(),
        }
    }
}

impl RouterSection {
    pub fn to_router_config(&self) -> RouterConfig {
        RouterConfig {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
            retry: RetryPolicy {
                max_retries: self.max_retries,
                base_delay: Duration::from_millis(self.retry_base_delay_ms),
                multiplier: self.retry_multiplier,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorSection {
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Day of month the unpaid-client block runs on.
    #[serde(default = "default_billing_day")]
    pub billing_day: u32,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_billing_day() -> u32 {
    DayOfMonthTrigger::BILLING_DAY.day()
}

fn default_poll_interval_secs() -> u64 {
    60
}

impl Default for OrchestratorSection {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            billing_day: default_billing_day(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl OrchestratorSection {
    pub fn trigger(&self) -> Result<DayOfMonthTrigger, ConfigError> {
        DayOfMonthTrigger::new(self.billing_day).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "orchestrator.billing_day must be between 1 and 31 (got {})",
                self.billing_day
            ))
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    /// EnvFilter string, e.g. "info" or "netbill_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_logging_level(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or defaults when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.orchestrator.history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "orchestrator.history_capacity must be at least 1".into(),
            ));
        }
        if self.orchestrator.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "orchestrator.poll_interval_secs must be at least 1".into(),
            ));
        }
        if !(self.router.retry_multiplier.is_finite() && self.router.retry_multiplier >= 1.0) {
            return Err(ConfigError::Invalid(
                "router.retry_multiplier must be a finite number >= 1.0".into(),
            ));
        }
        self.orchestrator.trigger()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.orchestrator.history_capacity, 20);
        assert_eq!(config.orchestrator.billing_day, 20);
        assert_eq!(config.router.port, 8728);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [router]
            host = "hotspot.example.net"
            max_retries = 5

            [orchestrator]
            billing_day = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.router.host, "hotspot.example.net");
        assert_eq!(config.router.max_retries, 5);
        assert_eq!(config.router.timeout_ms, 5000);
        assert_eq!(config.orchestrator.trigger().unwrap().day(), 5);
        assert_eq!(config.orchestrator.history_capacity, 20);

        let router = config.router.to_router_config();
        assert_eq!(router.retry.max_retries, 5);
        assert_eq!(router.timeout, Duration::from_secs(5));
        assert_eq!(router.retry.base_delay, Duration::from_millis(500));
    }

    #[rstest]
    #[case("[orchestrator]\nhistory_capacity = 0")]
    #[case("[orchestrator]\nbilling_day = 32")]
    #[case("[orchestrator]\npoll_interval_secs = 0")]
    #[case("[router]\nretry_multiplier = 0.5")]
    fn rejects_invalid_values(#[case] raw: &str) {
        assert!(matches!(
            AppConfig::from_toml_str(raw),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn reports_parse_errors() {
        assert!(matches!(
            AppConfig::from_toml_str("[router]\nport = \"eighty\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_path_means_defaults() {
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
        let err = AppConfig::load(Some(Path::new("/nonexistent/netbill.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/netbill.toml"));
    }
}
