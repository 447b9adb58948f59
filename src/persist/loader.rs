//! Flat file loader
//!
//! Rebuilds the collection from the data file on startup.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::codec::decode_record;
use crate::error::Result;
use crate::record::{Reservation, ReservationId};

/// Loads reservations from the data file
pub struct FlatFileLoader;

/// Result of a load operation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadResult {
    /// Number of records successfully loaded
    pub records_loaded: u64,

    /// Number of malformed lines skipped
    pub lines_skipped: u64,

    /// Highest id seen among loaded records (0 when empty)
    pub max_id: ReservationId,
}

impl FlatFileLoader {
    /// Load every well-formed record from `path`
    ///
    /// A missing file yields an empty collection. Malformed lines, including
    /// lines that are not valid UTF-8, are skipped and counted; only a failure
    /// of the file itself is returned as an error.
    /// Duplicate `(name, time)` pairs are not checked here.
    pub fn load(path: &Path) -> Result<(Vec<Reservation>, LoadResult)> {
        let mut records = Vec::new();
        let mut result = LoadResult::default();

        if !path.exists() {
            return Ok((records, result));
        }

        let mut reader = BufReader::new(File::open(path)?);
        let mut seen_ids: HashSet<ReservationId> = HashSet::new();
        let mut buf = Vec::new();
        let mut line_number = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_number += 1;

            while matches!(buf.last(), Some(b'\n' | b'\r')) {
                buf.pop();
            }

            // Undecodable bytes only cost this line
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Skipping data file line {}: invalid UTF-8 ({})", line_number, e);
                    result.lines_skipped += 1;
                    continue;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let record = match decode_record(line, line_number) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("Skipping invalid data file line '{}': {}", line, e);
                    result.lines_skipped += 1;
                    continue;
                }
            };

            if !seen_ids.insert(record.id()) {
                tracing::warn!(
                    "Skipping data file line {}: duplicate id {}",
                    line_number,
                    record.id()
                );
                result.lines_skipped += 1;
                continue;
            }

            result.max_id = result.max_id.max(record.id());
            result.records_loaded += 1;
            records.push(record);
        }

        Ok((records, result))
    }
}
