//! Error types and result definitions for the tuyacache crate.
//! Separates retryable transport failures from fatal ones and keeps the
//! TinyTuya numeric error codes for logging.

use thiserror::Error;

/// Represents all possible errors that can occur when talking to a Tuya device
/// or setting up an entity for it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TuyaError {
    /// Standard IO error (network reset, broken pipe, etc.)
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization or deserialization error
    #[error("JSON error: {0}")]
    Json(String),

    /// Request timed out
    #[error("Timeout waiting for device")]
    Timeout,

    /// TCP connection could not be established or was dropped
    #[error("Socket connection failed")]
    ConnectionFailed,

    /// Device is currently unreachable
    #[error("Device offline")]
    Offline,

    /// The payload received from the device was malformed or unexpected
    #[error("Invalid payload")]
    InvalidPayload,

    /// Generic error for wrong Local Key or Protocol Version
    #[error("Check device key or version (Error 914)")]
    KeyOrVersionError,

    /// A Data Point expected by an entity is absent from the status
    #[error("DP '{0}' not found in status")]
    DpNotFound(String),

    /// Entity configuration was rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Operation not allowed in the component's current state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// A specialized Result type for Tuya operations.
pub type Result<T> = std::result::Result<T, TuyaError>;

impl From<std::io::Error> for TuyaError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::TimedOut | ErrorKind::WouldBlock => TuyaError::Timeout,
            ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected => TuyaError::ConnectionFailed,
            _ => TuyaError::Io(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for TuyaError {
    fn from(err: serde_json::Error) -> Self {
        TuyaError::Json(err.to_string())
    }
}

impl TuyaError {
    /// Whether the failure is a transient transport condition worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TuyaError::Io(_) | TuyaError::Timeout | TuyaError::ConnectionFailed | TuyaError::Offline
        )
    }

    pub fn code(&self) -> u32 {
        match self {
            TuyaError::Io(_) => ERR_CONNECT,
            TuyaError::Json(_) => ERR_JSON,
            TuyaError::Timeout => ERR_TIMEOUT,
            TuyaError::ConnectionFailed => ERR_CONNECT,
            TuyaError::Offline => ERR_OFFLINE,
            TuyaError::InvalidPayload => ERR_PAYLOAD,
            TuyaError::KeyOrVersionError => ERR_KEY_OR_VER,
            TuyaError::DpNotFound(_) => ERR_PAYLOAD,
            TuyaError::InvalidConfig(_) => ERR_PARAMS,
            TuyaError::InvalidState(_) => ERR_STATE,
        }
    }
}

// TinyTuya Error Response Codes
define_error_codes! {
    ERR_SUCCESS = 0 => "Connection Successful",
    ERR_JSON = 900 => "Invalid JSON Response from Device",
    ERR_CONNECT = 901 => "Network Error: Unable to Connect",
    ERR_TIMEOUT = 902 => "Timeout Waiting for Device",
    ERR_PAYLOAD = 904 => "Unexpected Payload from Device",
    ERR_OFFLINE = 905 => "Network Error: Device Unreachable",
    ERR_STATE = 906 => "Device in Unknown State",
    ERR_PARAMS = 912 => "Missing Function Parameters",
    ERR_KEY_OR_VER = 914 => "Check device key or version",
}
