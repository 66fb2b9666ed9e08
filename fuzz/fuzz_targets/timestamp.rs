#![no_main]

use libfuzzer_sys::fuzz_target;
use oxiso8601::{format_timestamp, parse_timestamp};
use std::str;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = str::from_utf8(data) else {
        return;
    };
    let Some(timestamp) = parse_timestamp(text) else {
        return;
    };
    let serialization = format_timestamp(&timestamp);
    if timestamp.validate().is_err() {
        // Out of range fields might be written with too many digits
        return;
    }
    let reparsed = parse_timestamp(&serialization)
        .unwrap_or_else(|| panic!("{serialization} from {text:?} is not a valid timestamp"));
    assert_eq!(
        (
            reparsed.year(),
            reparsed.month(),
            reparsed.day(),
            reparsed.hour(),
            reparsed.minute(),
            reparsed.second()
        ),
        (
            timestamp.year(),
            timestamp.month(),
            timestamp.day(),
            timestamp.hour(),
            timestamp.minute(),
            timestamp.second()
        )
    );
    assert_eq!(
        reparsed.offset_minutes(),
        Some(timestamp.offset_minutes().unwrap_or(0))
    );
});
