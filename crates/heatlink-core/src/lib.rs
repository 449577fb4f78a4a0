//! Heater wire protocol encoding and decoding in pure Rust.
//!
//! `heatlink-core` provides `no_std`-compatible decoding of the fixed-size
//! status frames a BLE heater controller emits, plus the constant command
//! and poll-request payloads written to it. No I/O, no state.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

pub mod cursor;
pub mod frame;
pub mod wire;

pub use cursor::Reader;
pub use frame::{decode_status, FrameKind, StatusFrame, IDLE_FRAME_LEN, STATUS_FRAME_LEN};
pub use wire::{Command, NOTIFY_CHARACTERISTIC, POLL_REQUEST, WRITE_CHARACTERISTIC};
