//! Tuya protocol version handling.

use crate::error::TuyaError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

define_version! {
    V3_1 = ("3.1", 3.1),
    V3_2 = ("3.2", 3.2),
    V3_3 = ("3.3", 3.3),
    V3_4 = ("3.4", 3.4),
    V3_5 = ("3.5", 3.5),
}

impl Default for Version {
    fn default() -> Self {
        Version::V3_3
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Version {
    type Err = TuyaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::from_str_opt(s)
            .ok_or_else(|| TuyaError::InvalidConfig(format!("unsupported protocol version '{s}'")))
    }
}

impl TryFrom<f64> for Version {
    type Error = TuyaError;

    /// Accepts only values that name a version exactly; 3.26 is not 3.3.
    fn try_from(v: f64) -> Result<Self, Self::Error> {
        let v = v as f32;
        Version::ALL
            .iter()
            .copied()
            .find(|version| (version.val() - v).abs() <= f32::EPSILON)
            .ok_or_else(|| TuyaError::InvalidConfig(format!("unsupported protocol version '{v}'")))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Num(f64),
        }

        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Str(s) => s.parse(),
            Raw::Num(n) => Version::try_from(n),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}
