//! Switch platform configuration.
//!
//! Mirrors the classic `localtuya` switch entry:
//!
//! ```json
//! {
//!   "host": "192.168.0.1",
//!   "device_id": "12345678912345671234",
//!   "local_key": "1234567891234567",
//!   "name": "tuya_01",
//!   "protocol_version": 3.3,
//!   "interval": 1
//! }
//! ```

use crate::cache::{CacheConfig, DEFAULT_INTERVAL};
use crate::error::{Result, TuyaError};
use crate::switch::SwitchKeys;
use crate::version::Version;
use serde::{Deserialize, Deserializer, Serialize};
use tokio::time::Duration;

const LOCAL_KEY_LEN: usize = 16;

/// Configuration of one switch entity and its device link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchConfig {
    pub host: String,
    pub device_id: String,
    pub local_key: String,
    pub name: String,
    #[serde(default)]
    pub protocol_version: Version,
    /// DP index of the relay.
    #[serde(default = "default_switch_id")]
    pub id: String,
    #[serde(default = "default_current")]
    pub current: String,
    #[serde(default = "default_current_consumption")]
    pub current_consumption: String,
    #[serde(default = "default_voltage")]
    pub voltage: String,
    /// Polling and memoization interval, in seconds.
    #[serde(default = "default_interval", deserialize_with = "seconds")]
    pub interval: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

fn default_switch_id() -> String {
    SwitchKeys::default().switch
}

fn default_current() -> String {
    SwitchKeys::default().current
}

fn default_current_consumption() -> String {
    SwitchKeys::default().current_consumption
}

fn default_voltage() -> String {
    SwitchKeys::default().voltage
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL.as_secs()
}

/// Accepts `5` as well as `"5"`.
fn seconds<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid interval '{s}'"))),
    }
}

impl SwitchConfig {
    /// Parses a JSON configuration entry. The result is not validated yet.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("host", &self.host),
            ("device_id", &self.device_id),
            ("name", &self.name),
            ("id", &self.id),
            ("current", &self.current),
            ("current_consumption", &self.current_consumption),
            ("voltage", &self.voltage),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(TuyaError::InvalidConfig(format!("'{field}' must not be empty")));
        }
        if self.local_key.len() != LOCAL_KEY_LEN {
            return Err(TuyaError::InvalidConfig(format!(
                "'local_key' must be {LOCAL_KEY_LEN} bytes, got {}",
                self.local_key.len()
            )));
        }
        if self.interval == 0 {
            return Err(TuyaError::InvalidConfig(
                "'interval' must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::default().with_interval(self.interval())
    }

    pub fn keys(&self) -> SwitchKeys {
        SwitchKeys {
            switch: self.id.clone(),
            current: self.current.clone(),
            current_consumption: self.current_consumption.clone(),
            voltage: self.voltage.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{SETTLE_DELAY, UPDATE_RETRY_LIMIT};

    const MINIMAL: &str = r#"{
        "host": "192.168.0.1",
        "device_id": "12345678912345671234",
        "local_key": "1234567891234567",
        "name": "tuya_01"
    }"#;

    #[test]
    fn applies_defaults() {
        let config = SwitchConfig::from_json(MINIMAL).unwrap();
        assert_eq!(config.protocol_version, Version::V3_3);
        assert_eq!(config.keys(), SwitchKeys::default());
        assert_eq!(config.interval, 5);
        assert_eq!(config.icon, None);
        assert!(config.validate().is_ok());

        let cache = config.cache_config();
        assert_eq!(cache.interval, Duration::from_secs(5));
        assert_eq!(cache.retry_limit, UPDATE_RETRY_LIMIT);
        assert_eq!(cache.settle_delay, SETTLE_DELAY);
    }

    #[test]
    fn accepts_loose_types() {
        let config = SwitchConfig::from_json(
            r#"{
                "host": "10.0.0.7",
                "device_id": "dev",
                "local_key": "abcdefghijklmnop",
                "name": "plug",
                "protocol_version": "3.4",
                "id": "20",
                "voltage": "22",
                "interval": "2",
                "icon": "mdi:power-socket"
            }"#,
        )
        .unwrap();

        assert_eq!(config.protocol_version, Version::V3_4);
        assert_eq!(config.interval(), Duration::from_secs(2));
        assert_eq!(config.keys().switch, "20");
        assert_eq!(config.keys().voltage, "22");
        assert_eq!(config.icon.as_deref(), Some("mdi:power-socket"));
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = SwitchConfig::from_json(MINIMAL).unwrap();
        config.local_key = "short".to_string();
        assert!(matches!(config.validate(), Err(TuyaError::InvalidConfig(_))));

        let mut config = SwitchConfig::from_json(MINIMAL).unwrap();
        config.interval = 0;
        assert!(matches!(config.validate(), Err(TuyaError::InvalidConfig(_))));

        let mut config = SwitchConfig::from_json(MINIMAL).unwrap();
        config.id = " ".to_string();
        assert!(matches!(config.validate(), Err(TuyaError::InvalidConfig(_))));

        assert!(matches!(
            SwitchConfig::from_json(r#"{"host": "x"}"#),
            Err(TuyaError::Json(_))
        ));
        assert!(SwitchConfig::from_json(&MINIMAL.replace("\"name\"", "\"interval\": \"soon\", \"name\"")).is_err());
    }
}
