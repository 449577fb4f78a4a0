use heatlink_core::{decode_status, Command, POLL_REQUEST};

// Captured payloads, hex as the vendor app sends them.
const CMD_ON_GOLDEN: &[u8] = &[0xAA, 0x00, 0x61, 0x01, 0x73, 0x00, 0x22, 0x76];
const CMD_OFF_GOLDEN: &[u8] = &[0xAA, 0x00, 0x61, 0x02, 0xEF, 0x00, 0x26, 0xA0];

// A captured status frame: marker at offset 38, flag pair (01,73),
// room 25.7 C at offset 14, heater 21.9 C at offset 16.
const STATUS_ON_GOLDEN: [u8; 52] = [
    0xAA, 0x09, 0xFF, 0x19, 0x00, 0x00, 0x00, 0xF2, 0x55, 0x20, 0x84, 0x00, 0x20, 0x03, 0x01,
    0x01, 0xDB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF8, 0x7F, 0xF8, 0x7F, 0x00, 0x00,
    0x04, 0x40, 0x15, 0x6E, 0xFB, 0xBC, 0x00, 0x00, 0xA5, 0x05, 0x06, 0x1E, 0x01, 0x73, 0x00,
    0x00, 0x00, 0x00, 0x0F, 0x3E, 0x35, 0x9F,
];

#[test]
fn power_command_payloads_match_captures() {
    assert_eq!(Command::PowerOn.payload(), CMD_ON_GOLDEN);
    assert_eq!(Command::PowerOff.payload(), CMD_OFF_GOLDEN);
}

#[test]
fn poll_request_matches_capture() {
    let golden = "AA09FF19000000F25520840020030101DB00000000000000F87FF87F0000\
                  0440156EFBBC0000A505061E022D000000000F3E359F";
    let golden: Vec<u8> = (0..golden.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&golden[i..i + 2], 16).unwrap())
        .collect();
    assert_eq!(POLL_REQUEST.as_slice(), golden.as_slice());
}

#[test]
fn captured_on_frame_decodes() {
    let frame = decode_status(&STATUS_ON_GOLDEN);
    assert_eq!(frame.power_on, Some(true));
    assert_eq!(frame.room_temperature_c, Some(25.7));
    assert_eq!(frame.heater_temperature_c, Some(21.9));
    assert_eq!(frame.raw, Some(STATUS_ON_GOLDEN));
}

#[test]
fn captured_off_frame_decodes() {
    let mut off = STATUS_ON_GOLDEN;
    off[42] = 0x02;
    off[43] = 0xEF;
    let frame = decode_status(&off);
    assert_eq!(frame.power_on, Some(false));
}

#[test]
fn poll_request_itself_is_an_ambiguous_frame() {
    // The poll request reuses the status layout with a flag pair no
    // firmware emits; decoding it must report the power state unknown.
    let frame = decode_status(&POLL_REQUEST);
    assert_eq!(frame.power_on, None);
    assert_eq!(frame.room_temperature_c, Some(25.7));
    assert_eq!(frame.heater_temperature_c, Some(21.9));
}
