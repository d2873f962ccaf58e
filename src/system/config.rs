//! Centralized configuration management
//!
//! Timing lives in [`AlarmConfig`] and has sane defaults. Credentials and the
//! webhook endpoint live in [`NetworkConfig`] and are baked in at build time
//! from `PUMP_ALARM_*` environment variables.

use crate::types::{
    DEFAULT_BLINK_INTERVAL_MS, DEFAULT_CYCLE_INTERVAL_MS, DEFAULT_TURN_OFF_DELAY_MS,
    DEFAULT_TURN_ON_DELAY_MS,
};
use embassy_time::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    pub turn_on_delay_ms: u64,
    pub turn_off_delay_ms: u64,
    pub cycle_interval_ms: u64,
    pub blink_interval_ms: u64,
    /// Whether a high level on the input pin means "contact open".
    pub input_active_high: bool,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            turn_on_delay_ms: DEFAULT_TURN_ON_DELAY_MS,
            turn_off_delay_ms: DEFAULT_TURN_OFF_DELAY_MS,
            cycle_interval_ms: DEFAULT_CYCLE_INTERVAL_MS,
            blink_interval_ms: DEFAULT_BLINK_INTERVAL_MS,
            input_active_high: true,
        }
    }
}

impl AlarmConfig {
    pub fn turn_on_delay(&self) -> Duration {
        Duration::from_millis(self.turn_on_delay_ms)
    }

    pub fn turn_off_delay(&self) -> Duration {
        Duration::from_millis(self.turn_off_delay_ms)
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_interval_ms)
    }

    pub fn blink_interval(&self) -> Duration {
        Duration::from_millis(self.blink_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cycle_interval_ms",
                reason: "must be greater than zero",
            });
        }
        if self.blink_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "blink_interval_ms",
                reason: "must be greater than zero",
            });
        }
        // Timestamps are u32 milliseconds; longer delays could never expire
        for (field, value) in [
            ("turn_on_delay_ms", self.turn_on_delay_ms),
            ("turn_off_delay_ms", self.turn_off_delay_ms),
        ] {
            if value > u64::from(u32::MAX / 2) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "exceeds the clock wraparound window",
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub wifi_ssid: String,
    pub wifi_password: String,
    pub webhook_base_url: String,
    pub webhook_event: String,
    pub webhook_key: String,
}

pub const DEFAULT_WEBHOOK_BASE_URL: &str = "https://maker.ifttt.com";
pub const DEFAULT_WEBHOOK_EVENT: &str = "pump_alarm";

impl NetworkConfig {
    /// Read the values compiled in via `PUMP_ALARM_*` environment variables.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let config = Self {
            wifi_ssid: option_env!("PUMP_ALARM_WIFI_SSID").unwrap_or_default().to_string(),
            wifi_password: option_env!("PUMP_ALARM_WIFI_PASSWORD")
                .unwrap_or_default()
                .to_string(),
            webhook_base_url: option_env!("PUMP_ALARM_WEBHOOK_URL")
                .unwrap_or(DEFAULT_WEBHOOK_BASE_URL)
                .to_string(),
            webhook_event: option_env!("PUMP_ALARM_WEBHOOK_EVENT")
                .unwrap_or(DEFAULT_WEBHOOK_EVENT)
                .to_string(),
            webhook_key: option_env!("PUMP_ALARM_WEBHOOK_KEY")
                .unwrap_or_default()
                .to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wifi_ssid.is_empty() {
            return Err(ConfigError::MissingValue("PUMP_ALARM_WIFI_SSID"));
        }
        if self.webhook_key.is_empty() {
            return Err(ConfigError::MissingValue("PUMP_ALARM_WEBHOOK_KEY"));
        }
        if self.webhook_event.is_empty() {
            return Err(ConfigError::MissingValue("PUMP_ALARM_WEBHOOK_EVENT"));
        }
        if !(self.webhook_base_url.starts_with("http://")
            || self.webhook_base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue {
                field: "webhook_base_url",
                reason: "must start with http:// or https://",
            });
        }
        Ok(())
    }
}

// Keep secrets out of the serial log
impl std::fmt::Debug for NetworkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkConfig")
            .field("wifi_ssid", &self.wifi_ssid)
            .field("wifi_password", &"***")
            .field("webhook_base_url", &self.webhook_base_url)
            .field("webhook_event", &self.webhook_event)
            .field("webhook_key", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingValue(&'static str),
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingValue(name) => write!(f, "missing configuration value {}", name),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid configuration value {}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> NetworkConfig {
        NetworkConfig {
            wifi_ssid: "pumphouse".to_string(),
            wifi_password: "hunter22".to_string(),
            webhook_base_url: DEFAULT_WEBHOOK_BASE_URL.to_string(),
            webhook_event: DEFAULT_WEBHOOK_EVENT.to_string(),
            webhook_key: "abc123".to_string(),
        }
    }

    #[test]
    fn test_default_timings() {
        let config = AlarmConfig::default();
        assert_eq!(config.turn_on_delay().as_millis(), 1800);
        assert_eq!(config.turn_off_delay().as_millis(), 1600);
        assert_eq!(config.cycle_interval().as_millis(), 100);
        assert_eq!(config.blink_interval().as_millis(), 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_cycle_interval_rejected() {
        let config = AlarmConfig {
            cycle_interval_ms: 0,
            ..AlarmConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "cycle_interval_ms", .. })
        ));
    }

    #[test]
    fn test_oversized_delay_rejected() {
        let config = AlarmConfig {
            turn_off_delay_ms: u64::from(u32::MAX),
            ..AlarmConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "turn_off_delay_ms", .. })
        ));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AlarmConfig = serde_json::from_str(r#"{"turn_on_delay_ms": 500}"#).unwrap();
        assert_eq!(config.turn_on_delay_ms, 500);
        assert_eq!(config.turn_off_delay_ms, DEFAULT_TURN_OFF_DELAY_MS);
        assert!(config.input_active_high);
    }

    #[test]
    fn test_network_validation() {
        assert!(network().validate().is_ok());

        let mut missing_key = network();
        missing_key.webhook_key.clear();
        assert_eq!(
            missing_key.validate(),
            Err(ConfigError::MissingValue("PUMP_ALARM_WEBHOOK_KEY"))
        );

        let mut bad_url = network();
        bad_url.webhook_base_url = "maker.ifttt.com".to_string();
        assert!(bad_url.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", network());
        assert!(rendered.contains("pumphouse"));
        assert!(!rendered.contains("hunter22"));
        assert!(!rendered.contains("abc123"));
    }
}
