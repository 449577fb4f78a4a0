//! High-level heater session crate.
//!
//! [`HeaterSession`] owns one BLE link and runs the request/response
//! protocol on top of the device's unreliable notification channel:
//! bounded-retry polling with read and idle-frame fallbacks, best-effort
//! command confirmation with an optimistic fallback, and a watchdog that
//! tears the link down when the device goes quiet or stops answering.

#![forbid(unsafe_code)]

pub mod session;
pub mod sync;

mod state;
mod watchdog;

pub use session::{ConnectionState, HeaterSession};
pub use sync::{SyncClientError, SyncHeaterClient};

use heatlink_core::StatusFrame;
use heatlink_ble::LinkError;
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "metrics")]
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Total budget for waiting out the device's advertisement.
    pub locate_timeout: Duration,
    /// Delay between discovery lookups while waiting for the advertisement.
    pub locate_poll_interval: Duration,
    /// Link establishment attempts before giving up.
    pub connect_attempts: u8,
    /// Poll request/wait cycles per status poll.
    pub poll_attempts: u8,
    /// Floor for the per-attempt notification wait.
    pub min_attempt_wait: Duration,
    /// Fixed pause between retries. Short and flat on purpose: the failure
    /// mode is transient radio noise, not overload.
    pub retry_backoff: Duration,
    /// Pause after a command write before confirmation starts.
    pub settle_delay: Duration,
    /// Per-iteration notification wait inside the command confirm loop.
    pub command_poll_wait: Duration,
    /// Notification silence that forces a reconnect on the next poll. Must
    /// exceed the normal poll cadence or the link flaps.
    pub silence_ceiling: Duration,
    /// Consecutive poll exhaustions that force a reconnect.
    pub failure_threshold: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            locate_timeout: Duration::from_secs(10),
            locate_poll_interval: Duration::from_millis(500),
            connect_attempts: 3,
            poll_attempts: 3,
            min_attempt_wait: Duration::from_millis(700),
            retry_backoff: Duration::from_millis(200),
            settle_delay: Duration::from_millis(250),
            command_poll_wait: Duration::from_millis(900),
            silence_ceiling: Duration::from_secs(30),
            failure_threshold: 2,
        }
    }
}

impl SessionConfig {
    pub fn with_locate_timeout(mut self, locate_timeout: Duration) -> Self {
        self.locate_timeout = locate_timeout;
        self
    }

    pub fn with_locate_poll_interval(mut self, locate_poll_interval: Duration) -> Self {
        self.locate_poll_interval = locate_poll_interval;
        self
    }

    pub fn with_connect_attempts(mut self, connect_attempts: u8) -> Self {
        self.connect_attempts = connect_attempts;
        self
    }

    pub fn with_poll_attempts(mut self, poll_attempts: u8) -> Self {
        self.poll_attempts = poll_attempts;
        self
    }

    pub fn with_min_attempt_wait(mut self, min_attempt_wait: Duration) -> Self {
        self.min_attempt_wait = min_attempt_wait;
        self
    }

    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn with_command_poll_wait(mut self, command_poll_wait: Duration) -> Self {
        self.command_poll_wait = command_poll_wait;
        self
    }

    pub fn with_silence_ceiling(mut self, silence_ceiling: Duration) -> Self {
        self.silence_ceiling = silence_ceiling;
        self
    }

    pub fn with_failure_threshold(mut self, failure_threshold: u32) -> Self {
        self.failure_threshold = failure_threshold;
        self
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("device not found (no advertisement): {address}")]
    DeviceNotFound { address: String },
    #[error("connect failed after {attempts} attempt(s): {source}")]
    ConnectFailed {
        attempts: u8,
        #[source]
        source: LinkError,
    },
    #[error("link error: {0}")]
    Link(#[from] LinkError),
}

impl SessionError {
    /// Whether this error means the device is unreachable (as opposed to a
    /// mid-operation link fault). The refresh scheduler maps these to a
    /// degraded/unavailable state and tries again next cycle.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            SessionError::DeviceNotFound { .. } | SessionError::ConnectFailed { .. }
        )
    }
}

/// How a power command's outcome was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The device was observed reporting the requested state.
    Confirmed,
    /// The deadline passed without observation; the requested state was
    /// committed to memory anyway. Callers may discount it.
    Optimistic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerResult {
    pub frame: StatusFrame,
    pub confirmation: Confirmation,
}

impl PowerResult {
    pub fn is_confirmed(&self) -> bool {
        self.confirmation == Confirmation::Confirmed
    }
}

#[cfg(feature = "metrics")]
#[derive(Debug, Default)]
pub struct SessionMetrics {
    pub(crate) polls_total: AtomicU64,
    pub(crate) poll_retries_total: AtomicU64,
    pub(crate) poll_exhaustions_total: AtomicU64,
    pub(crate) connects_total: AtomicU64,
    pub(crate) forced_reconnects_total: AtomicU64,
    pub(crate) commands_total: AtomicU64,
    pub(crate) optimistic_commits_total: AtomicU64,
}

#[cfg(feature = "metrics")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionMetricsSnapshot {
    pub polls_total: u64,
    pub poll_retries_total: u64,
    pub poll_exhaustions_total: u64,
    pub connects_total: u64,
    pub forced_reconnects_total: u64,
    pub commands_total: u64,
    pub optimistic_commits_total: u64,
}

#[cfg(feature = "metrics")]
impl SessionMetrics {
    pub(crate) fn snapshot(&self) -> SessionMetricsSnapshot {
        SessionMetricsSnapshot {
            polls_total: self.polls_total.load(Ordering::Relaxed),
            poll_retries_total: self.poll_retries_total.load(Ordering::Relaxed),
            poll_exhaustions_total: self.poll_exhaustions_total.load(Ordering::Relaxed),
            connects_total: self.connects_total.load(Ordering::Relaxed),
            forced_reconnects_total: self.forced_reconnects_total.load(Ordering::Relaxed),
            commands_total: self.commands_total.load(Ordering::Relaxed),
            optimistic_commits_total: self.optimistic_commits_total.load(Ordering::Relaxed),
        }
    }
}
