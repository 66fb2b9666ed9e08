use criterion::{Criterion, criterion_group, criterion_main};
use criterion_bench::{DURATIONS, TIMESTAMPS};
use oxiso8601::{
    Duration, Timestamp, format_duration, format_timestamp, parse_duration, parse_timestamp,
};
use std::hint::black_box;

fn parse_timestamps(c: &mut Criterion) {
    c.bench_function("parse_timestamps", |b| {
        b.iter(|| {
            for text in TIMESTAMPS {
                black_box(parse_timestamp(text));
            }
        })
    });
}

fn format_timestamps(c: &mut Criterion) {
    let timestamps = TIMESTAMPS
        .iter()
        .filter_map(|text| parse_timestamp(text))
        .collect::<Vec<_>>();
    c.bench_function("format_timestamps", |b| {
        b.iter(|| {
            for timestamp in &timestamps {
                black_box(format_timestamp(timestamp));
            }
        })
    });
}

fn parse_durations(c: &mut Criterion) {
    c.bench_function("parse_durations", |b| {
        b.iter(|| {
            for text in DURATIONS {
                black_box(parse_duration(text));
            }
        })
    });
}

fn format_durations(c: &mut Criterion) {
    let durations = DURATIONS
        .iter()
        .filter_map(|text| parse_duration(text))
        .collect::<Vec<_>>();
    c.bench_function("format_durations", |b| {
        b.iter(|| {
            for duration in &durations {
                black_box(format_duration(duration));
            }
        })
    });
}

fn serialize_timestamp(c: &mut Criterion) {
    let timestamp = parse_timestamp("2014-02-01T09:28:56.321-10:00").unwrap();
    c.bench_function("serialize_timestamp", |b| {
        b.iter(|| serde_json::to_string(&timestamp))
    });
}

fn deserialize_timestamp(c: &mut Criterion) {
    c.bench_function("deserialize_timestamp", |b| {
        b.iter(|| serde_json::from_str::<Timestamp>("\"2014-02-01T09:28:56.321-10:00\""))
    });
}

fn deserialize_duration(c: &mut Criterion) {
    c.bench_function("deserialize_duration", |b| {
        b.iter(|| serde_json::from_str::<Duration>("\"P3Y2M1WT12H11M10.5S\""))
    });
}

criterion_group!(
    benches,
    parse_timestamps,
    format_timestamps,
    parse_durations,
    format_durations,
    serialize_timestamp,
    deserialize_timestamp,
    deserialize_duration
);
criterion_main!(benches);
