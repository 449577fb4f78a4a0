use crate::cursor::Reader;

/// Length of a full status report frame.
pub const STATUS_FRAME_LEN: usize = 52;
/// Length of the short keep-alive frame a quiescent device emits.
pub const IDLE_FRAME_LEN: usize = 8;

/// Two-byte synchronization marker preceding the power flag pair.
///
/// Firmware samples disagree on the bytes between the marker and the flag
/// pair, so the marker is scanned for rather than assumed at a fixed
/// offset, and the flag pair is read at a fixed distance from wherever the
/// marker lands.
pub const SYNC_MARKER: [u8; 2] = [0xA5, 0x05];

const FLAG_PAIR_OFFSET: usize = 4;
const FLAG_ON: (u8, u8) = (0x01, 0x73);
const FLAG_OFF: (u8, u8) = (0x02, 0xEF);

const ROOM_TEMP_OFFSET: usize = 14;
const HEATER_TEMP_OFFSET: usize = 16;

const ROOM_TEMP_MIN_C: f64 = -40.0;
const ROOM_TEMP_MAX_C: f64 = 80.0;
const HEATER_TEMP_MIN_C: f64 = -40.0;
const HEATER_TEMP_MAX_C: f64 = 250.0;

/// Classification of a received notification payload by length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Full 52-byte status report.
    Status,
    /// 8-byte keep-alive with no decodable payload; its arrival alone
    /// signals the device is alive and currently idle/off.
    Idle,
    /// Anything else; ignored.
    Other,
}

impl FrameKind {
    pub fn classify(len: usize) -> Self {
        match len {
            STATUS_FRAME_LEN => Self::Status,
            IDLE_FRAME_LEN => Self::Idle,
            _ => Self::Other,
        }
    }
}

/// Decoded snapshot of a status frame.
///
/// Every field is optional: a structurally valid frame can still carry an
/// unrecognized flag pair or out-of-range telemetry, and neither is an
/// error. An all-`None` frame is what wrong-length input decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusFrame {
    pub power_on: Option<bool>,
    pub room_temperature_c: Option<f64>,
    pub heater_temperature_c: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub raw: Option<[u8; STATUS_FRAME_LEN]>,
}

/// Decode a status frame, failing closed.
///
/// Input of any length other than [`STATUS_FRAME_LEN`] yields an all-`None`
/// frame. Otherwise the power flag is located by marker scan and the
/// temperatures are read at fixed offsets, each discarded to `None` when
/// outside its sane physical range.
pub fn decode_status(bytes: &[u8]) -> StatusFrame {
    if bytes.len() != STATUS_FRAME_LEN {
        return StatusFrame::default();
    }

    let mut raw = [0u8; STATUS_FRAME_LEN];
    raw.copy_from_slice(bytes);

    let (room_temperature_c, heater_temperature_c) = decode_temperatures(bytes);

    StatusFrame {
        power_on: scan_power_flag(bytes),
        room_temperature_c,
        heater_temperature_c,
        raw: Some(raw),
    }
}

/// Scan for the sync marker and read the flag pair at marker+4/+5.
///
/// `(01,73)` means on, `(02,EF)` means off. An unseen pair is reported as
/// unknown, never guessed.
fn scan_power_flag(p: &[u8]) -> Option<bool> {
    if p.len() < FLAG_PAIR_OFFSET + 2 {
        return None;
    }
    for i in 0..p.len() - (FLAG_PAIR_OFFSET + 1) {
        if p[i] == SYNC_MARKER[0] && p[i + 1] == SYNC_MARKER[1] {
            let pair = (p[i + FLAG_PAIR_OFFSET], p[i + FLAG_PAIR_OFFSET + 1]);
            if pair == FLAG_ON {
                return Some(true);
            }
            if pair == FLAG_OFF {
                return Some(false);
            }
            return None;
        }
    }
    None
}

fn decode_temperatures(p: &[u8]) -> (Option<f64>, Option<f64>) {
    let mut r = Reader::new(p);
    if r.skip(ROOM_TEMP_OFFSET).is_none() {
        return (None, None);
    }
    debug_assert_eq!(ROOM_TEMP_OFFSET + 2, HEATER_TEMP_OFFSET);
    let room = r
        .read_le_i16()
        .map(|v| f64::from(v) / 10.0)
        .filter(|c| (ROOM_TEMP_MIN_C..=ROOM_TEMP_MAX_C).contains(c));
    let heater = r
        .read_le_i16()
        .map(|v| f64::from(v) / 10.0)
        .filter(|c| (HEATER_TEMP_MIN_C..=HEATER_TEMP_MAX_C).contains(c));
    (room, heater)
}
