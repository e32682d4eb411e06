//! Device status payloads.
//! A status is the JSON object returned by the device, whose `dps` member
//! maps Data Point indices to scalar values.

use crate::error::{Result, TuyaError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const KEY_DPS: &str = "dps";

/// Status object reported by a device on every status or set-status call.
///
/// Only the `dps` member is interpreted; everything else (`devId`, `t`, ...)
/// is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateMap(Map<String, Value>);

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a status whose `dps` member is the given object.
    pub fn from_dps(dps: Map<String, Value>) -> Self {
        let mut inner = Map::new();
        inner.insert(KEY_DPS.into(), Value::Object(dps));
        Self(inner)
    }

    /// Parses a raw JSON payload as received from the device.
    pub fn from_slice(payload: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(payload)?;
        Self::try_from(value)
    }

    /// The Data Point table, if the device reported one.
    pub fn dps(&self) -> Option<&Map<String, Value>> {
        self.0.get(KEY_DPS).and_then(Value::as_object)
    }

    /// Looks up a single Data Point by its index.
    pub fn dp(&self, key: &str) -> Option<&Value> {
        self.dps().and_then(|dps| dps.get(key))
    }

    /// Reads a boolean Data Point, failing if it is absent or not a boolean.
    pub fn dp_bool(&self, key: &str) -> Result<bool> {
        match self.dp(key) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(TuyaError::InvalidPayload),
            None => Err(TuyaError::DpNotFound(key.to_string())),
        }
    }

    /// Reads a numeric Data Point; numeric strings are accepted too.
    pub fn dp_f64(&self, key: &str) -> Option<f64> {
        match self.dp(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Value> for StateMap {
    type Error = TuyaError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(TuyaError::InvalidPayload),
        }
    }
}

impl From<StateMap> for Value {
    fn from(state: StateMap) -> Self {
        Value::Object(state.0)
    }
}
