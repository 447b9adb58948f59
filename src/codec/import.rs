//! Import/export line handling
//!
//! Import lines are `name,time` or `id,name,time`. A supplied id is always
//! discarded; the store assigns a fresh one.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::datetime::parse_flexible;
use super::line::FIELD_SEPARATOR;

/// Tokens identifying a header line
pub const HEADER_MARKERS: &[&str] = &["ID", "Name", "ReservationTime", "名前", "予約日時"];

/// Header written at the top of every export
pub fn export_header() -> String {
    format!(
        "ID{sep}Name{sep}ReservationTime",
        sep = FIELD_SEPARATOR
    )
}

/// True when any field of the line is a header marker
pub fn is_header(line: &str) -> bool {
    line.split(FIELD_SEPARATOR).map(str::trim).any(|field| {
        HEADER_MARKERS
            .iter()
            .any(|marker| field.eq_ignore_ascii_case(marker))
    })
}

/// Parse a trimmed, non-empty import line into `(name, time)`
pub fn parse_import_line(line: &str) -> std::result::Result<(String, NaiveDateTime), SkipReason> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();

    let (name, time) = match fields.as_slice() {
        [name, time] => (*name, *time),
        [_id, name, time, ..] => (*name, *time),
        _ => return Err(SkipReason::TooFewFields(fields.len())),
    };

    if name.contains(['\n', '\r']) {
        return Err(SkipReason::LineBreakInName);
    }

    let time = parse_flexible(time).map_err(|_| SkipReason::BadTimestamp(time.to_string()))?;
    Ok((name.to_string(), time))
}

/// Why an import line was not inserted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// Fewer than two comma-separated fields
    TooFewFields(usize),

    /// Timestamp matched none of the accepted formats
    BadTimestamp(String),

    /// Name would split the record across data file lines
    LineBreakInName,

    /// Same name (case-insensitive) and time as an existing record
    Duplicate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooFewFields(n) => write!(f, "expected at least 2 fields, found {}", n),
            SkipReason::BadTimestamp(t) => write!(f, "unsupported timestamp format: {}", t),
            SkipReason::LineBreakInName => write!(f, "name contains a line break"),
            SkipReason::Duplicate => write!(f, "duplicate reservation"),
        }
    }
}

/// A line skipped during import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based position in the input
    pub line_number: usize,

    /// The trimmed line content
    pub line: String,

    pub reason: SkipReason,
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Records inserted
    pub imported: usize,

    /// Lines skipped because they could not be parsed
    pub malformed: usize,

    /// Well-formed lines skipped as duplicates
    pub duplicates: usize,

    /// Every skipped line, in input order
    pub skipped_lines: Vec<SkippedLine>,
}

impl ImportReport {
    /// Total lines skipped for any reason
    pub fn skipped(&self) -> usize {
        self.malformed + self.duplicates
    }

    pub(crate) fn record_skip(&mut self, line_number: usize, line: &str, reason: SkipReason) {
        match reason {
            SkipReason::Duplicate => self.duplicates += 1,
            _ => self.malformed += 1,
        }
        self.skipped_lines.push(SkippedLine {
            line_number,
            line: line.to_string(),
            reason,
        });
    }
}
