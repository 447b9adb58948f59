//! Persisted line codec
//!
//! One reservation per line: `id,name,time`.

use crate::error::{Result, StoreError};
use crate::record::{Reservation, ReservationId};

use super::datetime::{format_canonical, parse_canonical};

/// Separator between fields on every line
pub const FIELD_SEPARATOR: char = ',';

/// Number of fields on a persisted line
const RECORD_FIELDS: usize = 3;

/// Encode a reservation as a single line (no trailing newline)
pub fn encode_record(record: &Reservation) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        record.id(),
        record.name(),
        format_canonical(record.time()),
        sep = FIELD_SEPARATOR
    )
}

/// Decode a persisted line
///
/// `line_number` is 1-based and only used for the error.
pub fn decode_record(line: &str, line_number: usize) -> Result<Reservation> {
    let malformed = |reason: String| StoreError::MalformedRecord {
        line: line_number,
        reason,
    };

    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != RECORD_FIELDS {
        return Err(malformed(format!(
            "expected {} fields, found {}",
            RECORD_FIELDS,
            fields.len()
        )));
    }

    let id: ReservationId = fields[0]
        .parse()
        .map_err(|e| malformed(format!("invalid id '{}': {}", fields[0], e)))?;
    if id == 0 {
        return Err(malformed("id must be positive".to_string()));
    }

    let time = parse_canonical(fields[2]).map_err(|e| malformed(e.to_string()))?;

    Ok(Reservation::new(id, fields[1], time))
}
