//! Shared test helpers: an in-memory device and logger setup.
#![allow(dead_code)]

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::time::{Duration, sleep};
use tuyacache::{DeviceTransport, Result, StateMap, TuyaError, Version};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Simulated plug. Holds a DP table, answers like a real device and can be
/// told to fail a number of upcoming calls.
#[derive(Default)]
pub struct FakeDevice {
    dps: Mutex<Map<String, Value>>,
    failures: Mutex<VecDeque<TuyaError>>,
    always_fail: AtomicBool,
    latency: Mutex<Duration>,
    version: Mutex<Option<Version>>,
    commands: Mutex<Vec<(bool, String)>>,
    status_calls: AtomicUsize,
    set_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeDevice {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A plug reporting relay, current, consumption and voltage.
    pub fn plug(on: bool) -> Arc<Self> {
        let device = Self::new();
        device.set_dp("1", on);
        device.set_dp("4", 312);
        device.set_dp("5", 1250);
        device.set_dp("6", 2305);
        device
    }

    pub fn set_dp<V: Into<Value>>(&self, key: &str, value: V) {
        self.dps.lock().insert(key.to_string(), value.into());
    }

    pub fn remove_dp(&self, key: &str) {
        self.dps.lock().remove(key);
    }

    pub fn fail_next(&self, times: usize, err: TuyaError) {
        let mut failures = self.failures.lock();
        for _ in 0..times {
            failures.push_back(err.clone());
        }
    }

    pub fn set_always_fail(&self, fail: bool) {
        self.always_fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = latency;
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<(bool, String)> {
        self.commands.lock().clone()
    }

    pub fn version(&self) -> Option<Version> {
        *self.version.lock()
    }

    fn snapshot(&self) -> StateMap {
        StateMap::from_dps(self.dps.lock().clone())
    }

    async fn round_trip(&self) -> Result<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let latency = *self.latency.lock();
        if !latency.is_zero() {
            sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.always_fail.load(Ordering::SeqCst) {
            return Err(TuyaError::Timeout);
        }
        match self.failures.lock().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl DeviceTransport for FakeDevice {
    async fn status(&self) -> Result<StateMap> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.round_trip().await?;
        Ok(self.snapshot())
    }

    async fn set_status(&self, value: bool, key: &str) -> Result<StateMap> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.commands.lock().push((value, key.to_string()));
        self.round_trip().await?;
        self.set_dp(key, value);
        Ok(self.snapshot())
    }

    fn set_version(&self, version: Version) {
        *self.version.lock() = Some(version);
    }
}

pub fn dps(value: Value) -> StateMap {
    StateMap::try_from(serde_json::json!({ "dps": value })).expect("object")
}
