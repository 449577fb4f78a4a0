//! In-memory simulated heater.
//!
//! Models the device end of the protocol well enough to drive the whole
//! session engine in tests: it answers poll writes with status frames,
//! can be degraded into ack-only or idle-only modes, can refuse connects,
//! and counts every lifecycle call so tests can assert on them.

use crate::{DeviceFinder, DeviceHandle, LinkError, NotificationSink, WriteMode};
use async_trait::async_trait;
use heatlink_core::{Command, IDLE_FRAME_LEN, POLL_REQUEST, STATUS_FRAME_LEN};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Assemble a status frame the way observed firmware lays one out: marker
/// at offset 38, flag pair at 42/43, temperatures at 14/16.
pub fn build_status_frame(
    power_on: Option<bool>,
    room_deci: i16,
    heater_deci: i16,
) -> [u8; STATUS_FRAME_LEN] {
    let mut frame = [0u8; STATUS_FRAME_LEN];
    frame[0] = 0xAA;
    frame[14..16].copy_from_slice(&room_deci.to_le_bytes());
    frame[16..18].copy_from_slice(&heater_deci.to_le_bytes());
    frame[38] = 0xA5;
    frame[39] = 0x05;
    let (b1, b2) = match power_on {
        Some(true) => (0x01, 0x73),
        Some(false) => (0x02, 0xEF),
        None => (0x00, 0x00),
    };
    frame[42] = b1;
    frame[43] = b2;
    frame
}

pub fn build_idle_frame() -> [u8; IDLE_FRAME_LEN] {
    let mut frame = [0u8; IDLE_FRAME_LEN];
    frame[0] = 0xAA;
    frame[1] = 0x55;
    frame
}

#[derive(Default)]
struct SimState {
    power_on: bool,
    room_deci: i16,
    heater_deci: i16,
    connected: bool,
    visible: bool,
    sink: Option<NotificationSink>,
    /// Poll writes are acknowledged but provoke no notification.
    ack_only: bool,
    /// The device answers polls with idle frames instead of status frames,
    /// the way real firmware behaves after powering off.
    idle_only: bool,
    /// Direct reads of the notify characteristic return a full frame
    /// instead of the usual empty payload.
    readable_status: bool,
    /// Commands are acknowledged but have no effect on device state.
    inert_commands: bool,
    fail_connects: usize,
    fail_writes: usize,
}

/// Shared simulated device. Clone the `Arc` into a [`SimFinder`] and keep
/// one for the test to script with.
pub struct SimHeater {
    state: Mutex<SimState>,
    locates: AtomicUsize,
    connects: AtomicUsize,
    subscribes: AtomicUsize,
    writes: AtomicUsize,
    teardowns: AtomicUsize,
}

impl Default for SimHeater {
    fn default() -> Self {
        Self::new()
    }
}

impl SimHeater {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                power_on: false,
                room_deci: 215,
                heater_deci: 300,
                visible: true,
                ..SimState::default()
            }),
            locates: AtomicUsize::new(0),
            connects: AtomicUsize::new(0),
            subscribes: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            teardowns: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SimState> {
        self.state.lock().expect("sim heater state lock poisoned")
    }

    pub fn set_power(&self, on: bool) {
        self.lock().power_on = on;
    }

    pub fn power(&self) -> bool {
        self.lock().power_on
    }

    pub fn set_temperatures_deci(&self, room: i16, heater: i16) {
        let mut state = self.lock();
        state.room_deci = room;
        state.heater_deci = heater;
    }

    pub fn set_visible(&self, visible: bool) {
        self.lock().visible = visible;
    }

    pub fn set_ack_only(&self, ack_only: bool) {
        self.lock().ack_only = ack_only;
    }

    pub fn set_idle_only(&self, idle_only: bool) {
        self.lock().idle_only = idle_only;
    }

    pub fn set_readable_status(&self, readable: bool) {
        self.lock().readable_status = readable;
    }

    pub fn set_inert_commands(&self, inert: bool) {
        self.lock().inert_commands = inert;
    }

    pub fn fail_next_connects(&self, count: usize) {
        self.lock().fail_connects = count;
    }

    pub fn fail_next_writes(&self, count: usize) {
        self.lock().fail_writes = count;
    }

    pub fn locate_count(&self) -> usize {
        self.locates.load(Ordering::Relaxed)
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::Relaxed)
    }

    pub fn subscribe_count(&self) -> usize {
        self.subscribes.load(Ordering::Relaxed)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn teardown_count(&self) -> usize {
        self.teardowns.load(Ordering::Relaxed)
    }

    /// Push a status notification as the device would, unprompted.
    pub fn emit_status(&self) {
        let (sink, frame) = {
            let state = self.lock();
            let frame = build_status_frame(Some(state.power_on), state.room_deci, state.heater_deci);
            (state.sink.clone(), frame)
        };
        if let Some(sink) = sink {
            sink(&frame);
        }
    }

    /// Push an idle keep-alive notification.
    pub fn emit_idle(&self) {
        let sink = self.lock().sink.clone();
        if let Some(sink) = sink {
            sink(&build_idle_frame());
        }
    }

    fn handle_write(&self, payload: &[u8]) -> Result<(), LinkError> {
        {
            let mut state = self.lock();
            if !state.connected {
                return Err(LinkError::NotConnected);
            }
            if state.fail_writes > 0 {
                state.fail_writes -= 1;
                return Err(LinkError::Backend("simulated write failure".into()));
            }
        }
        self.writes.fetch_add(1, Ordering::Relaxed);

        if payload == POLL_REQUEST {
            let (ack_only, idle_only) = {
                let state = self.lock();
                (state.ack_only, state.idle_only)
            };
            if idle_only {
                self.emit_idle();
            } else if !ack_only {
                self.emit_status();
            }
            return Ok(());
        }

        for (command, on) in [(Command::PowerOn, true), (Command::PowerOff, false)] {
            if payload == command.payload() {
                let mut state = self.lock();
                if !state.inert_commands {
                    state.power_on = on;
                }
                return Ok(());
            }
        }
        // Unrecognized payloads are swallowed, as the device does.
        Ok(())
    }
}

/// Discovery over a [`SimHeater`].
pub struct SimFinder {
    heater: Arc<SimHeater>,
    address: String,
}

impl SimFinder {
    pub fn new(heater: Arc<SimHeater>, address: impl Into<String>) -> Self {
        Self {
            heater,
            address: address.into(),
        }
    }
}

#[async_trait]
impl DeviceFinder for SimFinder {
    type Handle = SimHandle;

    async fn locate(&self, address: &str) -> Result<Option<SimHandle>, LinkError> {
        self.heater.locates.fetch_add(1, Ordering::Relaxed);
        let visible = self.heater.lock().visible;
        if !visible || !self.address.eq_ignore_ascii_case(address) {
            return Ok(None);
        }
        Ok(Some(SimHandle {
            heater: Arc::clone(&self.heater),
        }))
    }
}

pub struct SimHandle {
    heater: Arc<SimHeater>,
}

#[async_trait]
impl DeviceHandle for SimHandle {
    async fn connect(&mut self) -> Result<(), LinkError> {
        {
            let mut state = self.heater.lock();
            if state.fail_connects > 0 {
                state.fail_connects -= 1;
                return Err(LinkError::Backend("simulated connect failure".into()));
            }
            state.connected = true;
        }
        self.heater.connects.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn is_live(&self) -> bool {
        self.heater.lock().connected
    }

    async fn subscribe(&mut self, sink: NotificationSink) -> Result<(), LinkError> {
        let mut state = self.heater.lock();
        if !state.connected {
            return Err(LinkError::NotConnected);
        }
        state.sink = Some(sink);
        drop(state);
        self.heater.subscribes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn write(&self, payload: &[u8], _mode: WriteMode) -> Result<(), LinkError> {
        self.heater.handle_write(payload)
    }

    async fn read_notify(&self) -> Result<Vec<u8>, LinkError> {
        let state = self.heater.lock();
        if !state.connected {
            return Err(LinkError::NotConnected);
        }
        if state.readable_status {
            Ok(build_status_frame(Some(state.power_on), state.room_deci, state.heater_deci).to_vec())
        } else {
            Ok(Vec::new())
        }
    }

    async fn teardown(&mut self) -> Result<(), LinkError> {
        let mut state = self.heater.lock();
        state.connected = false;
        state.sink = None;
        drop(state);
        self.heater.teardowns.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
