//! State shared between the protocol logic and the notification sink.
//!
//! The sink runs on the transport's delivery context, concurrently with
//! whatever protocol operation holds the session lock. Its entire job is:
//! take the inner mutex briefly, store decoded fields and timestamps, and
//! wake the waiter. No I/O, no blocking, no awaits.

use heatlink_ble::NotificationSink;
use heatlink_core::{decode_status, FrameKind, StatusFrame};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tokio::sync::Notify;
use tokio::time::Duration;
use tracing::trace;

const HEX_LOG_LIMIT: usize = 256;

/// Hex-dump a payload for wire-level tracing, truncated past the limit.
pub(crate) fn hex_snip(bytes: &[u8]) -> String {
    if bytes.len() > HEX_LOG_LIMIT {
        format!(
            "{}...(+{} bytes)",
            hex::encode_upper(&bytes[..HEX_LOG_LIMIT]),
            bytes.len() - HEX_LOG_LIMIT
        )
    } else {
        hex::encode_upper(bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameSource {
    Notify,
    Read,
}

#[derive(Default)]
struct Inner {
    last: StatusFrame,
    /// Bumped for every stored status frame; waiters compare epochs instead
    /// of consuming a flag, so a frame that lands between "clear signal"
    /// and "wait" is never missed.
    status_epoch: u64,
    notify_count: u64,
    last_notify_len: Option<usize>,
    last_any_at: Option<Instant>,
    last_status_at: Option<Instant>,
    last_idle_at: Option<Instant>,
}

pub(crate) struct SharedState {
    inner: Mutex<Inner>,
    status_posted: Notify,
}

impl SharedState {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            status_posted: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("session state lock poisoned")
    }

    /// Build the notification sink handed to the link on subscribe.
    pub(crate) fn sink(self: &Arc<Self>, address: &str) -> NotificationSink {
        let shared = Arc::clone(self);
        let address = address.to_string();
        Arc::new(move |bytes: &[u8]| shared.ingest(&address, bytes, FrameSource::Notify))
    }

    pub(crate) fn ingest(&self, address: &str, bytes: &[u8], source: FrameSource) {
        let now = Instant::now();
        let kind = FrameKind::classify(bytes.len());

        let stored_status = {
            let mut inner = self.lock();
            if source == FrameSource::Notify {
                inner.notify_count += 1;
                inner.last_notify_len = Some(bytes.len());
                inner.last_any_at = Some(now);
            }
            match kind {
                FrameKind::Status => {
                    inner.last = decode_status(bytes);
                    inner.last_status_at = Some(now);
                    inner.status_epoch += 1;
                    true
                }
                FrameKind::Idle => {
                    inner.last_idle_at = Some(now);
                    false
                }
                FrameKind::Other => false,
            }
        };

        trace!(
            address,
            len = bytes.len(),
            kind = ?kind,
            source = ?source,
            payload = %hex_snip(bytes),
            "frame received"
        );

        if stored_status {
            self.status_posted.notify_waiters();
        }
    }

    pub(crate) fn last(&self) -> StatusFrame {
        self.lock().last
    }

    pub(crate) fn status_epoch(&self) -> u64 {
        self.lock().status_epoch
    }

    /// Wait until a status frame newer than `since_epoch` has been stored,
    /// or `budget` elapses. Returns whether a fresh frame is available.
    pub(crate) async fn wait_for_status(&self, since_epoch: u64, budget: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + budget;
        loop {
            let notified = self.status_posted.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.status_epoch() > since_epoch {
                return true;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.status_epoch() > since_epoch;
            }
        }
    }

    /// Whether an idle frame has arrived at or after `since`.
    pub(crate) fn idle_seen_since(&self, since: Instant) -> bool {
        self.lock().last_idle_at.is_some_and(|at| at >= since)
    }

    /// Most recent notification of any kind; what the silence watchdog
    /// measures against.
    pub(crate) fn last_heard_at(&self) -> Option<Instant> {
        self.lock().last_any_at
    }

    /// Overwrite the remembered power state (the optimistic commit, and the
    /// idle-confirmed off state).
    pub(crate) fn force_power(&self, on: bool) {
        self.lock().last.power_on = Some(on);
    }

    pub(crate) fn diagnostics(&self) -> StateDiagnostics {
        let inner = self.lock();
        StateDiagnostics {
            notify_count: inner.notify_count,
            last_notify_len: inner.last_notify_len,
            last_status_at: inner.last_status_at,
        }
    }
}

pub(crate) struct StateDiagnostics {
    pub(crate) notify_count: u64,
    pub(crate) last_notify_len: Option<usize>,
    pub(crate) last_status_at: Option<Instant>,
}
