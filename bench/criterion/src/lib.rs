//! Sample inputs shared by the benchmarks.

/// Timestamps covering every optional part of the grammar.
pub const TIMESTAMPS: &[&str] = &[
    "2014-01-01",
    "2014-01-01T23:28:56",
    "2014-01-01T23:28:56.782Z",
    "2014-02-01T09:28:56.321-10:00",
    "2014-02-01T09:28:56.1234567+0530",
];

/// Durations covering every optional part of the grammar.
pub const DURATIONS: &[&str] = &[
    "P0D",
    "-PT10M",
    "P3Y2M1D",
    "PT12H11M10S",
    "P3Y2M1WT12H11M10.5S",
];
