//! Timestamp formats
//!
//! Canonical rendering is ISO local date-time: minutes when the seconds are
//! zero, seconds otherwise. Import accepts a fixed, ordered list of formats.

use chrono::{NaiveDateTime, Timelike};

use crate::error::{Result, StoreError};
use crate::record::truncate_to_seconds;

const CANONICAL_MINUTES: &str = "%Y-%m-%dT%H:%M";
const CANONICAL_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";
const CANONICAL_FRACTIONAL: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Formats tried in order on the import path; first match wins
pub const FLEXIBLE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",    // 2023-12-25T14:30
    "%Y-%m-%d %H:%M",    // 2023-12-25 14:30
    "%Y/%m/%d %H:%M",    // 2023/12/25 14:30
    "%Y-%m-%dT%H:%M:%S", // 2023-12-25T14:30:00
    "%Y-%m-%d %H:%M:%S", // 2023-12-25 14:30:00
    "%Y/%m/%d %H:%M:%S", // 2023/12/25 14:30:00
    "%Y/%m/%dT%H:%M",    // 2023/12/25T14:30
    "%Y/%m/%dT%H:%M:%S", // 2023/12/25T14:30:00
];

/// Render a timestamp in the canonical format
pub fn format_canonical(time: NaiveDateTime) -> String {
    let time = truncate_to_seconds(time);
    let pattern = if time.second() == 0 {
        CANONICAL_MINUTES
    } else {
        CANONICAL_SECONDS
    };
    time.format(pattern).to_string()
}

/// Parse a canonical timestamp (load path)
///
/// Accepts both minute and second precision; fractional seconds are truncated.
pub fn parse_canonical(input: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, CANONICAL_FRACTIONAL)
        .or_else(|_| NaiveDateTime::parse_from_str(input, CANONICAL_MINUTES))
        .map(truncate_to_seconds)
        .map_err(|e| StoreError::Timestamp(format!("{}: {}", input, e)))
}

/// Parse a timestamp in any of the flexible formats (import path)
pub fn parse_flexible(input: &str) -> Result<NaiveDateTime> {
    FLEXIBLE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .ok_or_else(|| StoreError::Timestamp(input.to_string()))
}
