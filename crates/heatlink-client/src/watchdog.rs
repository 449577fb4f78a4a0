//! Decides when accumulated silence or failure warrants rebuilding the link.

use std::time::{Duration, Instant};

/// Failure bookkeeping for one session. Mutated only under the session
/// lock.
#[derive(Debug, Default)]
pub(crate) struct WatchdogState {
    consecutive_failures: u32,
    last_success_at: Option<Instant>,
}

impl WatchdogState {
    pub(crate) fn record_success(&mut self, now: Instant) {
        self.consecutive_failures = 0;
        self.last_success_at = Some(now);
    }

    pub(crate) fn record_exhaustion(&mut self) -> u32 {
        self.consecutive_failures += 1;
        self.consecutive_failures
    }

    pub(crate) fn failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// The link is nominally up but the device has stopped answering
    /// meaningfully. Distinct from full silence, which the ceiling covers.
    pub(crate) fn should_force_reconnect(&self, threshold: u32) -> bool {
        threshold > 0 && self.consecutive_failures >= threshold
    }

    pub(crate) fn reset(&mut self) {
        self.consecutive_failures = 0;
    }

    pub(crate) fn last_success_at(&self) -> Option<Instant> {
        self.last_success_at
    }
}

/// Whether inter-notification silence has passed the configured ceiling.
/// Never trips before the first notification, so a freshly created session
/// does not flap.
pub(crate) fn silence_exceeded(
    last_heard: Option<Instant>,
    now: Instant,
    ceiling: Duration,
) -> bool {
    matches!(last_heard, Some(at) if now.duration_since(at) > ceiling)
}
