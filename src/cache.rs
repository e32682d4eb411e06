//! Rate-limited, retrying status cache for a single device.
//!
//! All access to the transport goes through one async mutex that is held for
//! the whole call, so a slow fetch blocks a concurrent command on the same
//! device and vice versa. The availability flag lives outside the mutex and
//! can be read at any time.

use crate::error::TuyaError;
use crate::state::StateMap;
use crate::transport::DeviceTransport;
use log::{debug, error, warn};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant, sleep};

/// Default memoization window.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
/// Attempts per status or set-status call before giving up.
pub const UPDATE_RETRY_LIMIT: u32 = 10;
/// Pause before every genuine fetch, letting the device settle after a command.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Tuning knobs for a [`StatusCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a fetched status is served without touching the device.
    pub interval: Duration,
    /// Maximum transport attempts per call.
    pub retry_limit: u32,
    /// Debounce applied before each real fetch.
    pub settle_delay: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            retry_limit: UPDATE_RETRY_LIMIT,
            settle_delay: SETTLE_DELAY,
        }
    }
}

impl CacheConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }
}

/// Result of running a transport call under the retry policy.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryOutcome<T> {
    /// One attempt succeeded.
    Success(T),
    /// Every attempt failed with a retryable error.
    Exhausted,
    /// A non-retryable error stopped the loop early.
    Fatal(TuyaError),
}

/// A memoized status. Replaced as a whole, never patched.
#[derive(Debug, Clone)]
struct CacheEntry {
    status: StateMap,
    fetched_at: Instant,
}

/// Status cache wrapping one [`DeviceTransport`].
pub struct StatusCache<T> {
    transport: T,
    config: CacheConfig,
    entry: Mutex<Option<CacheEntry>>,
    available: AtomicBool,
}

impl<T: DeviceTransport> StatusCache<T> {
    pub fn new(transport: T, config: CacheConfig) -> Self {
        Self {
            transport,
            config,
            entry: Mutex::new(None),
            available: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Last known availability. Never blocks.
    pub fn available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns the device status, fetching it only when the memoized value is
    /// missing or older than the configured interval.
    ///
    /// Failures never surface as errors: the availability flag is cleared and
    /// the previous memoized value (if any) is returned.
    pub async fn status(&self) -> Option<StateMap> {
        let mut entry = self.entry.lock().await;

        if let Some(cached) = entry.as_ref()
            && cached.fetched_at.elapsed() <= self.config.interval
        {
            debug!("Serving cached status ({:?} old)", cached.fetched_at.elapsed());
            return Some(cached.status.clone());
        }

        sleep(self.config.settle_delay).await;

        match self
            .with_retries("get status", || self.transport.status())
            .await
        {
            RetryOutcome::Success(status) => {
                *entry = Some(CacheEntry {
                    status: status.clone(),
                    fetched_at: Instant::now(),
                });
                self.set_available(true);
                Some(status)
            }
            RetryOutcome::Exhausted | RetryOutcome::Fatal(_) => {
                self.set_available(false);
                entry.as_ref().map(|cached| cached.status.clone())
            }
        }
    }

    /// Sets a boolean Data Point, dropping the memoized status first so the
    /// next [`status`](Self::status) call reads the device again.
    ///
    /// Returns the device's response, or `None` when the command failed.
    pub async fn set_status(&self, value: bool, key: &str) -> Option<StateMap> {
        let mut entry = self.entry.lock().await;
        *entry = None;

        match self
            .with_retries("set status", || self.transport.set_status(value, key))
            .await
        {
            RetryOutcome::Success(response) => {
                self.set_available(true);
                Some(response)
            }
            RetryOutcome::Exhausted | RetryOutcome::Fatal(_) => {
                self.set_available(false);
                None
            }
        }
    }

    /// Runs `op` until it succeeds, fails fatally, or the retry budget runs out.
    pub async fn with_retries<R, F, Fut>(&self, what: &str, mut op: F) -> RetryOutcome<R>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = crate::error::Result<R>>,
    {
        for attempt in 1..=self.config.retry_limit {
            match op().await {
                Ok(value) => return RetryOutcome::Success(value),
                Err(e) if e.is_retryable() => {
                    debug!("Attempt {attempt} to {what} failed: {e}");
                }
                Err(e) => {
                    error!("Failed to {what} (code {}): {e}", e.code());
                    return RetryOutcome::Fatal(e);
                }
            }
        }

        warn!("Failed to {what} after {} tries", self.config.retry_limit);
        RetryOutcome::Exhausted
    }
}
