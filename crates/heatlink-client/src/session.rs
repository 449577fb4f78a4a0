//! The device session: connection lifecycle, status polling, command
//! issuance, and the link watchdog.
//!
//! Every protocol operation runs under one per-session lock, so at most one
//! operation is in flight on the link at any time and reconnection is never
//! raced. The notification sink is the only concurrent writer, and it only
//! touches the shared state (see `state`).
//!
//! Every wait is timeout-bounded. Dropping an in-flight operation (a caller
//! abandoning a stale refresh) behaves like a timeout: the session stays
//! consistent and the last known frame remains available.

use crate::state::{FrameSource, SharedState};
use crate::watchdog::{silence_exceeded, WatchdogState};
use crate::{Confirmation, PowerResult, SessionConfig, SessionError};
use heatlink_core::{Command, StatusFrame, POLL_REQUEST, STATUS_FRAME_LEN};
use heatlink_ble::{DeviceFinder, DeviceHandle, LinkError, WriteMode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, trace, warn};

#[cfg(feature = "metrics")]
use crate::{SessionMetrics, SessionMetricsSnapshot};
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

struct LinkSlot<H> {
    handle: Option<H>,
    state: ConnectionState,
    watchdog: WatchdogState,
}

/// One session per configured device; owns the link handle exclusively and
/// lives for the lifetime of the integration.
pub struct HeaterSession<F: DeviceFinder> {
    address: String,
    finder: F,
    config: SessionConfig,
    shared: Arc<SharedState>,
    link: Mutex<LinkSlot<F::Handle>>,
    #[cfg(feature = "metrics")]
    metrics: Arc<SessionMetrics>,
}

impl<F: DeviceFinder> HeaterSession<F> {
    pub fn new(finder: F, address: impl Into<String>) -> Self {
        Self::with_config(finder, address, SessionConfig::default())
    }

    pub fn with_config(finder: F, address: impl Into<String>, config: SessionConfig) -> Self {
        Self {
            address: address.into(),
            finder,
            config,
            shared: Arc::new(SharedState::new()),
            link: Mutex::new(LinkSlot {
                handle: None,
                state: ConnectionState::Disconnected,
                watchdog: WatchdogState::default(),
            }),
            #[cfg(feature = "metrics")]
            metrics: Arc::new(SessionMetrics::default()),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Last known status. Stale-but-available: survives failed polls and is
    /// only replaced by a newer decoded frame (or an optimistic commit).
    pub fn last(&self) -> StatusFrame {
        self.shared.last()
    }

    pub async fn connection_state(&self) -> ConnectionState {
        self.link.lock().await.state
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> SessionMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Idempotent: a live handle is returned to as-is; anything else is
    /// torn down and rebuilt (locate, connect, subscribe), bounded at every
    /// step.
    pub async fn ensure_connected(&self) -> Result<(), SessionError> {
        let mut slot = self.link.lock().await;
        self.ensure_connected_locked(&mut slot).await
    }

    /// Tear the link down, swallowing secondary errors. Safe to call in any
    /// state; the handle is always released.
    pub async fn disconnect(&self) {
        let mut slot = self.link.lock().await;
        self.teardown_locked(&mut slot).await;
    }

    /// Connectivity check for setup flows: full connect, immediate
    /// teardown.
    pub async fn probe(&self) -> Result<(), SessionError> {
        let mut slot = self.link.lock().await;
        self.ensure_connected_locked(&mut slot).await?;
        self.teardown_locked(&mut slot).await;
        Ok(())
    }

    /// Obtain a fresh status frame within `timeout`, degrading to the last
    /// known frame when the channel refuses to deliver.
    ///
    /// Only a connection that cannot be built at all surfaces as an error;
    /// poll exhaustion does not.
    pub async fn poll_status(&self, timeout: Duration) -> Result<StatusFrame, SessionError> {
        let mut slot = self.link.lock().await;
        let started = Instant::now();
        #[cfg(feature = "metrics")]
        self.metrics.polls_total.fetch_add(1, Ordering::Relaxed);

        let diag = self.shared.diagnostics();
        debug!(
            address = %self.address,
            ?timeout,
            notify_count = diag.notify_count,
            last_notify_len = diag.last_notify_len,
            last_status_age = ?diag.last_status_at.map(|at| at.elapsed()),
            failures = slot.watchdog.failures(),
            last_success_age = ?slot.watchdog.last_success_at().map(|at| at.elapsed()),
            "poll begin"
        );

        self.run_watchdog(&mut slot).await;
        self.ensure_connected_locked(&mut slot).await?;

        // Opportunistic read; usually empty, occasionally a free answer.
        if self.try_read_status(&slot).await {
            slot.watchdog.record_success(Instant::now());
            debug!(address = %self.address, elapsed = ?started.elapsed(), "status via direct read");
            return Ok(self.shared.last());
        }

        let per_wait = self.config.min_attempt_wait.max(timeout / 3);
        let attempts = self.config.poll_attempts.max(1);
        for attempt in 1..=attempts {
            if attempt > 1 {
                #[cfg(feature = "metrics")]
                self.metrics.poll_retries_total.fetch_add(1, Ordering::Relaxed);
            }
            // The firmware responds inconsistently to each write mode, so
            // the first attempt goes unacknowledged and retries insist on
            // delivery.
            let mode = if attempt == 1 {
                WriteMode::WithoutResponse
            } else {
                WriteMode::WithResponse
            };

            if self.poll_cycle(&mut slot, per_wait, mode).await? {
                debug!(
                    address = %self.address,
                    attempt,
                    elapsed = ?started.elapsed(),
                    "status received"
                );
                return Ok(self.shared.last());
            }

            if self.shared.idle_seen_since(started) {
                debug!(
                    address = %self.address,
                    attempt,
                    "device reports idle, returning last known state"
                );
                return Ok(self.shared.last());
            }

            debug!(address = %self.address, attempt, "no status frame");
            if attempt < attempts {
                sleep(self.config.retry_backoff).await;
            }
        }

        let failures = slot.watchdog.record_exhaustion();
        #[cfg(feature = "metrics")]
        self.metrics
            .poll_exhaustions_total
            .fetch_add(1, Ordering::Relaxed);
        debug!(
            address = %self.address,
            failures,
            elapsed = ?started.elapsed(),
            "poll exhausted, returning last known state"
        );
        Ok(self.shared.last())
    }

    /// Drive the device to the requested power state, confirming within
    /// `timeout` when possible and committing optimistically otherwise.
    /// Never fails for lack of confirmation.
    pub async fn set_power(
        &self,
        target_on: bool,
        timeout: Duration,
    ) -> Result<PowerResult, SessionError> {
        let mut slot = self.link.lock().await;
        let started = Instant::now();
        #[cfg(feature = "metrics")]
        self.metrics.commands_total.fetch_add(1, Ordering::Relaxed);
        debug!(address = %self.address, target_on, ?timeout, "set_power begin");

        self.ensure_connected_locked(&mut slot).await?;

        let payload = Command::for_power(target_on).payload();
        if let Err(err) = self
            .write_locked(&slot, &payload, WriteMode::WithResponse)
            .await
        {
            warn!(
                address = %self.address,
                target_on,
                error = %err,
                "command write failed, reconnecting for one retry"
            );
            self.teardown_locked(&mut slot).await;
            self.ensure_connected_locked(&mut slot).await?;
            self.write_locked(&slot, &payload, WriteMode::WithResponse)
                .await?;
        }

        sleep(self.config.settle_delay).await;

        let deadline = Instant::now() + timeout;
        let mut iteration = 0u32;
        loop {
            if self.shared.last().power_on == Some(target_on) {
                debug!(
                    address = %self.address,
                    target_on,
                    elapsed = ?started.elapsed(),
                    "command confirmed"
                );
                return Ok(PowerResult {
                    frame: self.shared.last(),
                    confirmation: Confirmation::Confirmed,
                });
            }
            // Some firmware acknowledges power-off by ceasing status frames
            // and emitting only idle keep-alives; that emission is the off
            // acknowledgement.
            if !target_on && self.shared.idle_seen_since(started) {
                debug!(
                    address = %self.address,
                    elapsed = ?started.elapsed(),
                    "idle frames confirm off state"
                );
                self.shared.force_power(false);
                return Ok(PowerResult {
                    frame: self.shared.last(),
                    confirmation: Confirmation::Confirmed,
                });
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            iteration += 1;
            let budget = self.config.command_poll_wait.min(deadline - now);
            let mode = if iteration % 2 == 1 {
                WriteMode::WithoutResponse
            } else {
                WriteMode::WithResponse
            };
            self.poll_cycle(&mut slot, budget, mode).await?;
            sleep(
                self.config
                    .retry_backoff
                    .min(deadline.saturating_duration_since(Instant::now())),
            )
            .await;
        }

        warn!(
            address = %self.address,
            target_on,
            elapsed = ?started.elapsed(),
            "command unconfirmed, committing optimistically"
        );
        self.shared.force_power(target_on);
        #[cfg(feature = "metrics")]
        self.metrics
            .optimistic_commits_total
            .fetch_add(1, Ordering::Relaxed);
        Ok(PowerResult {
            frame: self.shared.last(),
            confirmation: Confirmation::Optimistic,
        })
    }

    /// One request/wait cycle: write the poll payload, wait for a status
    /// frame, fall back to a direct read. A transport error rebuilds the
    /// link and reports no frame; the caller decides whether to try again.
    async fn poll_cycle(
        &self,
        slot: &mut LinkSlot<F::Handle>,
        budget: Duration,
        mode: WriteMode,
    ) -> Result<bool, SessionError> {
        let epoch = self.shared.status_epoch();
        if let Err(err) = self.write_locked(slot, &POLL_REQUEST, mode).await {
            debug!(
                address = %self.address,
                error = %err,
                "poll write failed, rebuilding link"
            );
            self.teardown_locked(slot).await;
            self.ensure_connected_locked(slot).await?;
            return Ok(false);
        }

        if self.shared.wait_for_status(epoch, budget).await {
            slot.watchdog.record_success(Instant::now());
            return Ok(true);
        }
        if self.try_read_status(slot).await {
            slot.watchdog.record_success(Instant::now());
            return Ok(true);
        }
        Ok(false)
    }

    async fn try_read_status(&self, slot: &LinkSlot<F::Handle>) -> bool {
        let Some(handle) = slot.handle.as_ref() else {
            return false;
        };
        match handle.read_notify().await {
            Ok(bytes) if bytes.len() == STATUS_FRAME_LEN => {
                self.shared.ingest(&self.address, &bytes, FrameSource::Read);
                true
            }
            Ok(bytes) => {
                trace!(
                    address = %self.address,
                    len = bytes.len(),
                    "direct read returned no status frame"
                );
                false
            }
            Err(err) => {
                debug!(address = %self.address, error = %err, "direct read failed");
                false
            }
        }
    }

    async fn write_locked(
        &self,
        slot: &LinkSlot<F::Handle>,
        payload: &[u8],
        mode: WriteMode,
    ) -> Result<(), LinkError> {
        match slot.handle.as_ref() {
            Some(handle) => handle.write(payload, mode).await,
            None => Err(LinkError::NotConnected),
        }
    }

    /// Pre-poll watchdog pass: force a teardown when the device has either
    /// stopped answering polls (failure counter) or gone entirely silent
    /// (ceiling). The subsequent `ensure_connected` rebuilds the link.
    async fn run_watchdog(&self, slot: &mut LinkSlot<F::Handle>) {
        if slot
            .watchdog
            .should_force_reconnect(self.config.failure_threshold)
        {
            warn!(
                address = %self.address,
                failures = slot.watchdog.failures(),
                "watchdog: repeated poll exhaustion, forcing reconnect"
            );
            slot.watchdog.reset();
            #[cfg(feature = "metrics")]
            self.metrics
                .forced_reconnects_total
                .fetch_add(1, Ordering::Relaxed);
            self.teardown_locked(slot).await;
        } else if slot.handle.is_some()
            && silence_exceeded(
                self.shared.last_heard_at(),
                Instant::now(),
                self.config.silence_ceiling,
            )
        {
            warn!(
                address = %self.address,
                ceiling = ?self.config.silence_ceiling,
                "watchdog: notification silence past ceiling, forcing reconnect"
            );
            #[cfg(feature = "metrics")]
            self.metrics
                .forced_reconnects_total
                .fetch_add(1, Ordering::Relaxed);
            self.teardown_locked(slot).await;
        }
    }

    async fn ensure_connected_locked(
        &self,
        slot: &mut LinkSlot<F::Handle>,
    ) -> Result<(), SessionError> {
        if let Some(handle) = slot.handle.as_ref() {
            if handle.is_live().await {
                return Ok(());
            }
            debug!(address = %self.address, "handle stale, rebuilding link");
        }
        self.teardown_locked(slot).await;
        slot.state = ConnectionState::Connecting;

        // Advertisement visibility is eventually consistent; poll discovery
        // inside a fixed budget instead of trusting the first lookup.
        let locate_deadline = Instant::now() + self.config.locate_timeout;
        let mut located = None;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.finder.locate(&self.address).await {
                Ok(Some(handle)) => {
                    debug!(address = %self.address, attempt, "located device");
                    located = Some(handle);
                    break;
                }
                Ok(None) => {
                    debug!(address = %self.address, attempt, "waiting for advertisement")
                }
                Err(err) => {
                    debug!(
                        address = %self.address,
                        attempt,
                        error = %err,
                        "discovery lookup failed"
                    )
                }
            }
            if Instant::now() >= locate_deadline {
                break;
            }
            sleep(self.config.locate_poll_interval).await;
        }
        let Some(mut handle) = located else {
            slot.state = ConnectionState::Disconnected;
            return Err(SessionError::DeviceNotFound {
                address: self.address.clone(),
            });
        };

        let attempts = self.config.connect_attempts.max(1);
        let mut connect_err = None;
        for attempt in 1..=attempts {
            match handle.connect().await {
                Ok(()) => {
                    debug!(address = %self.address, attempt, "link established");
                    connect_err = None;
                    break;
                }
                Err(err) => {
                    debug!(
                        address = %self.address,
                        attempt,
                        error = %err,
                        "connect attempt failed"
                    );
                    connect_err = Some(err);
                    if attempt < attempts {
                        sleep(self.config.retry_backoff).await;
                    }
                }
            }
        }
        if let Some(source) = connect_err {
            slot.state = ConnectionState::Disconnected;
            return Err(SessionError::ConnectFailed { attempts, source });
        }

        if let Err(err) = handle.subscribe(self.shared.sink(&self.address)).await {
            // Some firmware keeps answering direct reads with the notify
            // subscription broken, so this degrades rather than fails.
            warn!(
                address = %self.address,
                error = %err,
                "notification subscribe failed"
            );
        }

        slot.handle = Some(handle);
        slot.state = ConnectionState::Connected;
        #[cfg(feature = "metrics")]
        self.metrics.connects_total.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn teardown_locked(&self, slot: &mut LinkSlot<F::Handle>) {
        if let Some(mut handle) = slot.handle.take() {
            debug!(address = %self.address, "tearing down link");
            if let Err(err) = handle.teardown().await {
                debug!(address = %self.address, error = %err, "teardown error ignored");
            }
        }
        slot.state = ConnectionState::Disconnected;
    }
}

#[cfg(test)]
mod tests {
    use super::{ConnectionState, HeaterSession};
    use crate::{Confirmation, SessionConfig, SessionError};
    use async_trait::async_trait;
    use heatlink_ble::{DeviceFinder, DeviceHandle, LinkError, NotificationSink, WriteMode};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const ADDRESS: &str = "AA:BB:CC:DD:EE:FF";

    /// A device that can always be located and connected, acknowledges
    /// every write, and never sends anything back.
    #[derive(Default)]
    struct MockDevice {
        locate_misses: AtomicUsize,
        connect_failures: AtomicUsize,
        locates: AtomicUsize,
        connects: AtomicUsize,
        subscribes: AtomicUsize,
        writes: AtomicUsize,
        teardowns: AtomicUsize,
        live: AtomicBool,
    }

    struct MockFinder(Arc<MockDevice>);
    struct MockHandle(Arc<MockDevice>);

    #[async_trait]
    impl DeviceFinder for MockFinder {
        type Handle = MockHandle;

        async fn locate(&self, _address: &str) -> Result<Option<MockHandle>, LinkError> {
            self.0.locates.fetch_add(1, Ordering::Relaxed);
            if self.0.locate_misses.load(Ordering::Relaxed) > 0 {
                self.0.locate_misses.fetch_sub(1, Ordering::Relaxed);
                return Ok(None);
            }
            Ok(Some(MockHandle(Arc::clone(&self.0))))
        }
    }

    #[async_trait]
    impl DeviceHandle for MockHandle {
        async fn connect(&mut self) -> Result<(), LinkError> {
            if self.0.connect_failures.load(Ordering::Relaxed) > 0 {
                self.0.connect_failures.fetch_sub(1, Ordering::Relaxed);
                return Err(LinkError::Backend("scripted connect failure".into()));
            }
            self.0.live.store(true, Ordering::Relaxed);
            self.0.connects.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        async fn is_live(&self) -> bool {
            self.0.live.load(Ordering::Relaxed)
        }

        async fn subscribe(&mut self, _sink: NotificationSink) -> Result<(), LinkError> {
            self.0.subscribes.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        async fn write(&self, _payload: &[u8], _mode: WriteMode) -> Result<(), LinkError> {
            self.0.writes.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        async fn read_notify(&self) -> Result<Vec<u8>, LinkError> {
            Ok(Vec::new())
        }

        async fn teardown(&mut self) -> Result<(), LinkError> {
            self.0.live.store(false, Ordering::Relaxed);
            self.0.teardowns.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    fn test_config() -> SessionConfig {
        SessionConfig::default()
            .with_locate_timeout(Duration::from_millis(50))
            .with_locate_poll_interval(Duration::from_millis(5))
            .with_min_attempt_wait(Duration::from_millis(15))
            .with_retry_backoff(Duration::from_millis(5))
            .with_settle_delay(Duration::from_millis(5))
            .with_command_poll_wait(Duration::from_millis(20))
    }

    fn session(device: &Arc<MockDevice>) -> HeaterSession<MockFinder> {
        HeaterSession::with_config(MockFinder(Arc::clone(device)), ADDRESS, test_config())
    }

    #[tokio::test]
    async fn ensure_connected_is_idempotent() {
        let device = Arc::new(MockDevice::default());
        let session = session(&device);

        session.ensure_connected().await.unwrap();
        session.ensure_connected().await.unwrap();

        assert_eq!(device.connects.load(Ordering::Relaxed), 1);
        assert_eq!(device.subscribes.load(Ordering::Relaxed), 1);
        assert_eq!(session.connection_state().await, ConnectionState::Connected);
    }

    #[tokio::test]
    async fn stale_handle_is_torn_down_and_rebuilt() {
        let device = Arc::new(MockDevice::default());
        let session = session(&device);

        session.ensure_connected().await.unwrap();
        device.live.store(false, Ordering::Relaxed);
        session.ensure_connected().await.unwrap();

        assert_eq!(device.connects.load(Ordering::Relaxed), 2);
        assert_eq!(device.teardowns.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn locate_budget_exhaustion_is_device_not_found() {
        let device = Arc::new(MockDevice::default());
        device.locate_misses.store(usize::MAX, Ordering::Relaxed);
        let session = session(&device);

        let err = session.ensure_connected().await.unwrap_err();
        assert!(matches!(err, SessionError::DeviceNotFound { .. }));
        assert!(err.is_unavailable());
        assert!(device.locates.load(Ordering::Relaxed) >= 2);
        assert_eq!(
            session.connection_state().await,
            ConnectionState::Disconnected
        );
    }

    #[tokio::test]
    async fn connect_exhaustion_is_connect_failed() {
        let device = Arc::new(MockDevice::default());
        device.connect_failures.store(usize::MAX, Ordering::Relaxed);
        let session = session(&device);

        let err = session.ensure_connected().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::ConnectFailed { attempts: 3, .. }
        ));
        assert!(err.is_unavailable());
        assert_eq!(device.connects.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn connect_retries_within_the_attempt_budget() {
        let device = Arc::new(MockDevice::default());
        device.connect_failures.store(2, Ordering::Relaxed);
        let session = session(&device);

        session.ensure_connected().await.unwrap();
        assert_eq!(device.connects.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn poll_exhaustion_returns_stale_data_not_an_error() {
        let device = Arc::new(MockDevice::default());
        let session = session(&device);

        let frame = session.poll_status(Duration::from_millis(45)).await.unwrap();
        assert_eq!(frame, Default::default());
        // One unacknowledged write plus two acknowledged retries.
        assert_eq!(device.writes.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn repeated_exhaustion_forces_exactly_one_reconnect() {
        let device = Arc::new(MockDevice::default());
        let session = session(&device);

        // Two exhausted polls reach the failure threshold.
        session.poll_status(Duration::from_millis(45)).await.unwrap();
        session.poll_status(Duration::from_millis(45)).await.unwrap();
        assert_eq!(device.connects.load(Ordering::Relaxed), 1);
        assert_eq!(device.teardowns.load(Ordering::Relaxed), 0);

        // The next poll rebuilds the link once, then polls normally.
        session.poll_status(Duration::from_millis(45)).await.unwrap();
        assert_eq!(device.teardowns.load(Ordering::Relaxed), 1);
        assert_eq!(device.connects.load(Ordering::Relaxed), 2);

        // And the one after it does not reconnect again yet.
        session.poll_status(Duration::from_millis(45)).await.unwrap();
        assert_eq!(device.teardowns.load(Ordering::Relaxed), 1);
        assert_eq!(device.connects.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn unconfirmed_command_commits_optimistically() {
        let device = Arc::new(MockDevice::default());
        let session = session(&device);

        let result = session
            .set_power(true, Duration::from_millis(60))
            .await
            .unwrap();
        assert_eq!(result.confirmation, Confirmation::Optimistic);
        assert!(!result.is_confirmed());
        assert_eq!(result.frame.power_on, Some(true));
        assert_eq!(session.last().power_on, Some(true));
    }

    #[cfg(feature = "metrics")]
    #[tokio::test]
    async fn metrics_count_polls_and_optimistic_commits() {
        let device = Arc::new(MockDevice::default());
        let session = session(&device);

        session.poll_status(Duration::from_millis(45)).await.unwrap();
        let metrics = session.metrics_snapshot();
        assert_eq!(metrics.polls_total, 1);
        assert_eq!(metrics.poll_exhaustions_total, 1);
        assert_eq!(metrics.poll_retries_total, 2);
        assert_eq!(metrics.connects_total, 1);
        assert_eq!(metrics.optimistic_commits_total, 0);

        session
            .set_power(true, Duration::from_millis(30))
            .await
            .unwrap();
        let metrics = session.metrics_snapshot();
        assert_eq!(metrics.commands_total, 1);
        assert_eq!(metrics.optimistic_commits_total, 1);
    }

    #[tokio::test]
    async fn probe_connects_and_releases() {
        let device = Arc::new(MockDevice::default());
        let session = session(&device);

        session.probe().await.unwrap();
        assert_eq!(device.connects.load(Ordering::Relaxed), 1);
        assert_eq!(device.teardowns.load(Ordering::Relaxed), 1);
        assert_eq!(
            session.connection_state().await,
            ConnectionState::Disconnected
        );
    }
}
