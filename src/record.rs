//! Reservation record
//!
//! Plain value type. Identity is the id alone; validation lives in the store.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Reservation identifier (0 = unassigned)
pub type ReservationId = u64;

/// A single named, timestamped reservation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    name: String,
    time: NaiveDateTime,
}

impl Reservation {
    /// Create a reservation. Sub-second precision is dropped.
    pub fn new(id: ReservationId, name: impl Into<String>, time: NaiveDateTime) -> Self {
        Self {
            id,
            name: name.into(),
            time: truncate_to_seconds(time),
        }
    }

    pub fn id(&self) -> ReservationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    /// Case-insensitive name match plus exact time match
    pub fn conflicts_with(&self, name: &str, time: NaiveDateTime) -> bool {
        self.time == truncate_to_seconds(time) && self.name.to_lowercase() == name.to_lowercase()
    }
}

impl PartialEq for Reservation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Reservation {}

impl Hash for Reservation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reservation{{id={}, name='{}', time={}}}",
            self.id,
            self.name,
            crate::codec::format_canonical(self.time)
        )
    }
}

/// Drop nanoseconds; stored times have at most second precision
pub(crate) fn truncate_to_seconds(time: NaiveDateTime) -> NaiveDateTime {
    time.with_nanosecond(0).unwrap_or(time)
}
