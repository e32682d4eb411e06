//! # Tuyacache
//!
//! Resilient status caching and switch entities for Tuya Local API devices.
//! A [`StatusCache`] turns an unreliable point-to-point device link into a
//! rate-limited, retrying status source; a [`Switch`] projects that status
//! onto an on/off entity with power meter attributes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tuyacache::{DeviceTransport, Poller, Switch, SwitchConfig};
//!
//! async fn register<T: DeviceTransport>(transport: T, json: &str) -> tuyacache::Result<()> {
//!     let config = SwitchConfig::from_json(json)?;
//!     let switch = Arc::new(Switch::from_config(transport, &config)?);
//!
//!     let poller = Poller::new(config.interval())?;
//!     poller.add(switch.clone()).await;
//!     poller.start()?;
//!
//!     switch.turn_on().await;
//!     Ok(())
//! }
//! ```
//!
#[macro_use]
mod macros;
pub mod cache;
pub mod config;
pub mod error;
pub mod poller;
pub mod state;
pub mod switch;
pub mod transport;
pub mod version;

pub use cache::{CacheConfig, RetryOutcome, StatusCache};
pub use config::SwitchConfig;
pub use error::{Result, TuyaError};
pub use poller::{Pollable, Poller};
pub use state::StateMap;
pub use switch::{Switch, SwitchKeys, SwitchState};
pub use transport::DeviceTransport;
pub use version::Version;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> &'static str {
    VERSION
}
