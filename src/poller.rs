//! Periodic refresh of registered entities.
//! Plays the role of the host scheduler: one background task ticks on a fixed
//! interval and refreshes every entity in registration order.

use crate::error::{Result, TuyaError};
use crate::switch::Switch;
use crate::transport::DeviceTransport;
use futures_util::future::BoxFuture;
use log::{debug, info};
use rand::RngCore;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Upper bound of the random delay before the first tick.
const START_JITTER_MAX_MS: u32 = 1000;

/// An entity the poller can refresh.
pub trait Pollable: Send + Sync {
    fn name(&self) -> &str;

    /// First read at registration time.
    fn initialize(&self) -> BoxFuture<'_, ()>;

    fn refresh(&self) -> BoxFuture<'_, ()>;
}

impl<T: DeviceTransport> Pollable for Switch<T> {
    fn name(&self) -> &str {
        Switch::name(self)
    }

    fn initialize(&self) -> BoxFuture<'_, ()> {
        Box::pin(Switch::initialize(self))
    }

    fn refresh(&self) -> BoxFuture<'_, ()> {
        Box::pin(Switch::refresh(self))
    }
}

/// Drives `refresh` on a set of entities at a fixed interval.
#[derive(Clone)]
pub struct Poller {
    inner: Arc<PollerInner>,
}

struct PollerInner {
    interval: Duration,
    entities: RwLock<Vec<Arc<dyn Pollable>>>,
    started: AtomicBool,
    cancel_token: CancellationToken,
}

impl Poller {
    /// Creates a poller ticking every `interval`, which must be non-zero.
    pub fn new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(TuyaError::InvalidConfig(
                "poll interval must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            inner: Arc::new(PollerInner {
                interval,
                entities: RwLock::new(Vec::new()),
                started: AtomicBool::new(false),
                cancel_token: CancellationToken::new(),
            }),
        })
    }

    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Registers an entity and performs its initial read.
    pub async fn add(&self, entity: Arc<dyn Pollable>) {
        entity.initialize().await;
        info!("Entity [{}] added to poller", entity.name());
        self.inner.entities.write().await.push(entity);
    }

    pub async fn len(&self) -> usize {
        self.inner.entities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.entities.read().await.is_empty()
    }

    /// Refreshes every registered entity once, in registration order.
    pub async fn poll_once(&self) {
        let entities = self.inner.entities.read().await.clone();
        for entity in entities {
            debug!("Polling entity [{}]", entity.name());
            entity.refresh().await;
        }
    }

    /// Spawns the background polling task. Runs until [`stop`](Self::stop).
    ///
    /// A poller runs at most once: starting it again, or after it was
    /// stopped, is rejected.
    pub fn start(&self) -> Result<()> {
        if self.is_stopped() {
            return Err(TuyaError::InvalidState("poller already stopped".to_string()));
        }
        if self.inner.started.swap(true, Ordering::SeqCst) {
            return Err(TuyaError::InvalidState("poller already started".to_string()));
        }

        // Spread first ticks so pollers created together do not fire together.
        let jitter = {
            let mut rng = rand::rng();
            Duration::from_millis((rng.next_u32() % START_JITTER_MAX_MS) as u64)
        };
        let period = self.inner.interval;
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + jitter, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let poller = self.clone();
        let token = self.inner.cancel_token.clone();
        info!("Starting poller (interval {:?})", period);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => poller.poll_once().await,
                }
            }
            debug!("Poller task stopped");
        });
        Ok(())
    }

    /// Stops the background polling task.
    pub fn stop(&self) {
        info!("Stopping poller");
        self.inner.cancel_token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.cancel_token.is_cancelled()
    }

    pub fn is_running(&self) -> bool {
        self.inner.started.load(Ordering::SeqCst) && !self.is_stopped()
    }
}
