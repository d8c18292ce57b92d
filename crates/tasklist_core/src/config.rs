//! Store configuration.
//!
//! # Responsibility
//! - Hold the tunables of the dispatcher and banner timer.
//! - Read overrides from process environment for hosts without a config UI.
//!
//! # Invariants
//! - Blank environment values fall back to defaults.
//! - Malformed values are rejected, never silently coerced.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Default delay before the "task added" banner hides.
pub const DEFAULT_BANNER_DELAY: Duration = Duration::from_millis(2000);

pub const ENV_BANNER_DELAY_MS: &str = "TASKLIST_BANNER_DELAY_MS";
pub const ENV_BANNER_POLICY: &str = "TASKLIST_BANNER_POLICY";
pub const ENV_DARK_MODE: &str = "TASKLIST_DARK_MODE";

/// How overlapping "task added" banner timers interact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BannerPolicy {
    /// Only the most recently scheduled hide applies.
    #[default]
    Debounce,
    /// Every scheduled hide applies when it fires, so an older timer can
    /// hide a banner shown by a newer add.
    Legacy,
}

impl BannerPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debounce => "debounce",
            Self::Legacy => "legacy",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "debounce" => Some(Self::Debounce),
            "legacy" => Some(Self::Legacy),
            _ => None,
        }
    }
}

/// Configuration errors from environment parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "invalid `{key}` value `{value}`; expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

/// Dispatcher and timer tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub banner_delay: Duration,
    pub banner_policy: BannerPolicy,
    pub initial_dark_mode: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            banner_delay: DEFAULT_BANNER_DELAY,
            banner_policy: BannerPolicy::default(),
            initial_dark_mode: false,
        }
    }
}

impl StoreConfig {
    /// Reads overrides from the process environment.
    ///
    /// # Errors
    /// - Returns `ConfigError::InvalidValue` for any malformed variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`, starting from defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = non_blank(lookup(ENV_BANNER_DELAY_MS)) {
            let millis = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_BANNER_DELAY_MS,
                value: raw.clone(),
                expected: "a non-negative integer of milliseconds",
            })?;
            config.banner_delay = Duration::from_millis(millis);
        }

        if let Some(raw) = non_blank(lookup(ENV_BANNER_POLICY)) {
            config.banner_policy =
                BannerPolicy::parse(&raw).ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_BANNER_POLICY,
                    value: raw.clone(),
                    expected: "debounce|legacy",
                })?;
        }

        if let Some(raw) = non_blank(lookup(ENV_DARK_MODE)) {
            config.initial_dark_mode = match raw.to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_DARK_MODE,
                        value: raw,
                        expected: "true|false|1|0",
                    })
                }
            };
        }

        Ok(config)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{
        BannerPolicy, ConfigError, StoreConfig, DEFAULT_BANNER_DELAY, ENV_BANNER_DELAY_MS,
        ENV_BANNER_POLICY, ENV_DARK_MODE,
    };
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.banner_delay, DEFAULT_BANNER_DELAY);
        assert_eq!(config.banner_policy, BannerPolicy::Debounce);
    }

    #[test]
    fn overrides_are_applied() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (ENV_BANNER_DELAY_MS, " 500 "),
            (ENV_BANNER_POLICY, "LEGACY"),
            (ENV_DARK_MODE, "1"),
        ]))
        .unwrap();
        assert_eq!(config.banner_delay, Duration::from_millis(500));
        assert_eq!(config.banner_policy, BannerPolicy::Legacy);
        assert!(config.initial_dark_mode);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[(ENV_BANNER_POLICY, "   ")])).unwrap();
        assert_eq!(config.banner_policy, BannerPolicy::Debounce);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = StoreConfig::from_lookup(lookup_from(&[(ENV_BANNER_DELAY_MS, "-3")]))
            .expect_err("negative delay must be rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: ENV_BANNER_DELAY_MS,
                ..
            }
        ));
        assert!(err.to_string().contains("-3"));

        let err = StoreConfig::from_lookup(lookup_from(&[(ENV_DARK_MODE, "yes")])).unwrap_err();
        assert!(err.to_string().contains("true|false"));
    }
}
