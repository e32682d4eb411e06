//! The link to a single physical device.
//!
//! Framing, encryption and session handling live behind this trait; the cache
//! only needs a request/response pair and the protocol version hook.

use crate::error::Result;
use crate::state::StateMap;
use crate::version::Version;
use std::future::Future;

/// Request/response client for one Tuya device.
///
/// Implementations are assumed non-reentrant (one physical connection), so
/// callers are expected to serialize access. `status` and `set_status` fail
/// with a retryable [`TuyaError`](crate::TuyaError) on timeouts and connection
/// failures, and with a fatal one for anything else.
pub trait DeviceTransport: Send + Sync + 'static {
    /// Queries the current status (`DpQuery`).
    fn status(&self) -> impl Future<Output = Result<StateMap>> + Send;

    /// Sets a boolean Data Point and returns the device's response.
    fn set_status(&self, value: bool, key: &str) -> impl Future<Output = Result<StateMap>> + Send;

    /// Selects the protocol version. Called once while the entity is set up.
    fn set_version(&self, version: Version);
}

impl<T: DeviceTransport> DeviceTransport for std::sync::Arc<T> {
    fn status(&self) -> impl Future<Output = Result<StateMap>> + Send {
        (**self).status()
    }

    fn set_status(&self, value: bool, key: &str) -> impl Future<Output = Result<StateMap>> + Send {
        (**self).set_status(value, key)
    }

    fn set_version(&self, version: Version) {
        (**self).set_version(version)
    }
}
