//! On/off switch entity backed by a [`StatusCache`].
//!
//! The switch reads its state from configurable Data Point indices, so plugs
//! that expose the relay or the power meter at different DPs only need a
//! different [`SwitchKeys`].

use crate::cache::StatusCache;
use crate::config::SwitchConfig;
use crate::error::Result;
use crate::state::StateMap;
use crate::transport::DeviceTransport;
use log::{debug, info};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const ATTR_CURRENT: &str = "current";
pub const ATTR_CURRENT_CONSUMPTION: &str = "current_consumption";
pub const ATTR_VOLTAGE: &str = "voltage";

/// Data Point indices the switch reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchKeys {
    pub switch: String,
    pub current: String,
    pub current_consumption: String,
    pub voltage: String,
}

impl Default for SwitchKeys {
    fn default() -> Self {
        Self {
            switch: "1".to_string(),
            current: "4".to_string(),
            current_consumption: "5".to_string(),
            voltage: "6".to_string(),
        }
    }
}

/// State derived from the last refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchState {
    /// Last successfully read relay state. Kept through failed refreshes.
    pub is_on: bool,
    /// Last status returned by the cache.
    pub raw_status: Option<StateMap>,
    /// Whether the last refresh could extract the relay state.
    pub available: bool,
}

/// A Tuya switch entity.
pub struct Switch<T> {
    name: String,
    icon: Option<String>,
    keys: SwitchKeys,
    cache: Arc<StatusCache<T>>,
    state: RwLock<SwitchState>,
}

impl<T: DeviceTransport> Switch<T> {
    pub fn new<N: Into<String>>(name: N, keys: SwitchKeys, cache: Arc<StatusCache<T>>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            keys,
            cache,
            state: RwLock::new(SwitchState::default()),
        }
    }

    /// Validates `config`, configures the transport's protocol version and
    /// wires a fresh cache in front of it.
    pub fn from_config(transport: T, config: &SwitchConfig) -> Result<Self> {
        config.validate()?;
        transport.set_version(config.protocol_version);

        let cache = Arc::new(StatusCache::new(transport, config.cache_config()));
        let mut switch = Self::new(config.name.clone(), config.keys(), cache);
        switch.icon = config.icon.clone();
        Ok(switch)
    }

    pub fn with_icon<I: Into<String>>(mut self, icon: I) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn keys(&self) -> &SwitchKeys {
        &self.keys
    }

    pub fn cache(&self) -> &Arc<StatusCache<T>> {
        &self.cache
    }

    /// First read at registration time.
    pub async fn initialize(&self) {
        self.refresh().await;
        let state = self.state();
        info!(
            "Initialized tuya switch [{}] with status {:?} and state [{}]",
            self.name, state.raw_status, state.is_on
        );
    }

    /// Pulls the status through the cache and re-derives the relay state.
    ///
    /// On failure the previous on/off value is kept and only availability drops.
    pub async fn refresh(&self) {
        let status = self.cache.status().await;

        let mut state = self.state.write();
        let Some(status) = status else {
            debug!("No status available for switch [{}]", self.name);
            state.available = false;
            return;
        };

        match status.dp_bool(&self.keys.switch) {
            Ok(on) => {
                state.is_on = on;
                state.available = true;
            }
            Err(e) => {
                debug!("Switch [{}] update failed: {}", self.name, e);
                state.available = false;
            }
        }
        state.raw_status = Some(status);
    }

    pub fn is_on(&self) -> bool {
        self.state.read().is_on
    }

    /// Available only when the device answered and the relay DP was readable.
    pub fn available(&self) -> bool {
        self.cache.available() && self.state.read().available
    }

    pub fn state(&self) -> SwitchState {
        self.state.read().clone()
    }

    pub async fn turn_on(&self) {
        self.send(true).await;
    }

    pub async fn turn_off(&self) {
        self.send(false).await;
    }

    async fn send(&self, value: bool) {
        debug!("Switching [{}] to {}", self.name, value);
        // The local state is left alone; the next refresh observes the result.
        let _ = self.cache.set_status(value, &self.keys.switch).await;
    }

    /// Power meter readings from the last status, keyed by attribute name.
    ///
    /// Consumption and voltage are reported in tenths and scaled down here.
    /// Readings missing from the status are left out.
    pub fn attributes(&self) -> BTreeMap<String, String> {
        let state = self.state.read();
        let mut attrs = BTreeMap::new();
        let Some(status) = state.raw_status.as_ref() else {
            return attrs;
        };

        if let Some(current) = status.dp(&self.keys.current).and_then(format_raw) {
            attrs.insert(ATTR_CURRENT.to_string(), current);
        }
        if let Some(consumption) = status.dp_f64(&self.keys.current_consumption) {
            attrs.insert(ATTR_CURRENT_CONSUMPTION.to_string(), format_tenths(consumption));
        }
        if let Some(voltage) = status.dp_f64(&self.keys.voltage) {
            attrs.insert(ATTR_VOLTAGE.to_string(), format_tenths(voltage));
        }
        attrs
    }
}

/// Renders a raw reading as JSON scalars print: booleans become `true`/`false`.
fn format_raw(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn format_tenths(raw: f64) -> String {
    // Debug keeps the fractional part ("125.0"), Display would drop it.
    format!("{:?}", raw / 10.0)
}
