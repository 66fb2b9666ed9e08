#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

mod duration;
mod parser;
mod timestamp;

pub use self::duration::{
    Duration, DurationConversionError, ParseDurationError, Sign, format_duration, parse_duration,
};
pub use self::timestamp::{
    InvalidTimestampError, ParseTimestampError, StrictParseError, Timestamp, TimezoneOffset,
    format_timestamp, parse_timestamp, parse_timestamp_strict,
};
