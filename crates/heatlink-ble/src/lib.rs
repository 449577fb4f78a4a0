//! Async BLE link abstraction for the heater session engine.
//!
//! The session code talks to a [`DeviceFinder`] (radio-stack discovery:
//! address in, connectable handle out) and a [`DeviceHandle`] (the raw link
//! primitive: connect / subscribe / write / read / teardown). The real
//! implementation rides on btleplug; the [`sim`] module provides a scripted
//! in-memory device for tests.

#![forbid(unsafe_code)]

pub mod ble;
pub mod sim;

pub use ble::{BtleFinder, BtleHandle};
pub use sim::{SimFinder, SimHandle, SimHeater};

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("no bluetooth adapter available")]
    AdapterUnavailable,
    #[error("device not connected")]
    NotConnected,
    #[error("characteristic missing: {0}")]
    CharacteristicMissing(&'static str),
    #[error("link backend error: {0}")]
    Backend(String),
    #[error("link operation timed out")]
    Timeout,
}

/// Delivery mode for a characteristic write.
///
/// The heater firmware responds inconsistently to each mode, so callers
/// alternate between them rather than settling on one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    WithResponse,
    WithoutResponse,
}

/// Callback invoked from the transport's delivery context for every
/// notification payload.
///
/// Implementations must not block and must not perform I/O; they store
/// fields and signal a waiter, nothing more.
pub type NotificationSink = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// An owned link to one device. At most one live handle exists per session.
#[async_trait]
pub trait DeviceHandle: Send + Sync {
    /// Establish the link. One attempt; the session owns the retry loop.
    async fn connect(&mut self) -> Result<(), LinkError>;

    /// Whether the underlying link still reports itself connected.
    async fn is_live(&self) -> bool;

    /// Subscribe the notification channel, routing payloads to `sink`.
    async fn subscribe(&mut self, sink: NotificationSink) -> Result<(), LinkError>;

    /// Write a payload to the command characteristic.
    async fn write(&self, payload: &[u8], mode: WriteMode) -> Result<(), LinkError>;

    /// Direct read of the notification characteristic. Often empty; a full
    /// status frame is an opportunistic win.
    async fn read_notify(&self) -> Result<Vec<u8>, LinkError>;

    /// Unsubscribe and close the link. Callers treat errors here as noise.
    async fn teardown(&mut self) -> Result<(), LinkError>;
}

/// Radio-stack discovery: one lookup per call, no internal waiting.
///
/// Advertisement visibility is eventually consistent, so the session polls
/// this in a bounded loop rather than expecting the first call to succeed.
#[async_trait]
pub trait DeviceFinder: Send + Sync {
    type Handle: DeviceHandle;

    async fn locate(&self, address: &str) -> Result<Option<Self::Handle>, LinkError>;
}
