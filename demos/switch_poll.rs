/**
 * Switch Polling Example
 *
 * This example wires a switch entity to a simulated plug, registers it with a
 * poller and toggles it a few times while the poller keeps the state fresh.
 * The simulated link drops every third request to show the retry handling.
 *
 * Run with `RUST_LOG=debug` to see cache hits, retries and refreshes.
 */
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::time::{Duration, sleep};
use tuyacache::{DeviceTransport, Poller, Result, StateMap, Switch, SwitchConfig, TuyaError, Version};

struct SimulatedPlug {
    dps: Mutex<Map<String, Value>>,
    requests: AtomicU32,
}

impl SimulatedPlug {
    fn new() -> Self {
        let dps = json!({"1": false, "4": 0, "5": 0, "6": 2301});
        Self {
            dps: Mutex::new(dps.as_object().cloned().unwrap_or_default()),
            requests: AtomicU32::new(0),
        }
    }

    async fn round_trip(&self) -> Result<()> {
        sleep(Duration::from_millis(80)).await;
        if self.requests.fetch_add(1, Ordering::SeqCst) % 3 == 2 {
            return Err(TuyaError::ConnectionFailed);
        }
        Ok(())
    }

    fn snapshot(&self) -> StateMap {
        StateMap::from_dps(self.dps.lock().clone())
    }
}

impl DeviceTransport for SimulatedPlug {
    async fn status(&self) -> Result<StateMap> {
        self.round_trip().await?;
        Ok(self.snapshot())
    }

    async fn set_status(&self, value: bool, key: &str) -> Result<StateMap> {
        self.round_trip().await?;
        let mut dps = self.dps.lock();
        dps.insert(key.to_string(), Value::Bool(value));
        let load = if value { json!(1250) } else { json!(0) };
        dps.insert("5".to_string(), load);
        drop(dps);
        Ok(self.snapshot())
    }

    fn set_version(&self, version: Version) {
        println!("[INFO] Simulated plug speaks protocol {}", version);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    println!("--- Tuyacache - Switch Polling ---");

    let config = SwitchConfig::from_json(
        r#"{
            "host": "192.168.0.1",
            "device_id": "12345678912345671234",
            "local_key": "1234567891234567",
            "name": "desk_lamp",
            "protocol_version": 3.3,
            "interval": 1
        }"#,
    )?;

    let switch = Arc::new(Switch::from_config(SimulatedPlug::new(), &config)?);
    let poller = Poller::new(config.interval())?;
    poller.add(switch.clone()).await;
    poller.start()?;

    for step in 1..=4 {
        if step % 2 == 1 {
            println!("[STEP {step}] Switching ON...");
            switch.turn_on().await;
        } else {
            println!("[STEP {step}] Switching OFF...");
            switch.turn_off().await;
        }

        sleep(Duration::from_secs(2)).await;
        println!(
            "[STATE] on={} available={} attributes={:?}",
            switch.is_on(),
            switch.available(),
            switch.attributes()
        );
    }

    poller.stop();
    println!("[INFO] Example finished.");
    Ok(())
}
