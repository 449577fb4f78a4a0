use heatlink_core::{decode_status, StatusFrame};
use proptest::prelude::*;

proptest! {
    #[test]
    fn decode_never_panics(data in proptest::collection::vec(any::<u8>(), 0..128)) {
        let _ = decode_status(&data);
    }

    #[test]
    fn wrong_length_always_decodes_to_all_none(
        data in proptest::collection::vec(any::<u8>(), 0..128)
            .prop_filter("length must differ from a status frame", |v| v.len() != 52)
    ) {
        prop_assert_eq!(decode_status(&data), StatusFrame::default());
    }

    #[test]
    fn decoded_temperatures_stay_in_sane_ranges(data in proptest::collection::vec(any::<u8>(), 52..=52)) {
        let frame = decode_status(&data);
        if let Some(room) = frame.room_temperature_c {
            prop_assert!((-40.0..=80.0).contains(&room));
        }
        if let Some(heater) = frame.heater_temperature_c {
            prop_assert!((-40.0..=250.0).contains(&heater));
        }
    }

    #[test]
    fn raw_bytes_round_trip_for_full_frames(data in proptest::collection::vec(any::<u8>(), 52..=52)) {
        let frame = decode_status(&data);
        prop_assert_eq!(frame.raw.map(|r| r.to_vec()), Some(data));
    }
}
