//! Codec Module
//!
//! Line-level encoding and decoding of reservations.
//!
//! ## Responsibilities
//! - Render timestamps in the single canonical format
//! - Parse the canonical format (load path) and the flexible formats (import path)
//! - Encode/decode one persisted line per reservation
//! - Classify import lines (header, short, bad timestamp)
//!
//! ## Data File Format
//! ```text
//! ┌────────┬───────────────┬──────────────────────┐
//! │ id     │ name          │ time (canonical)     │
//! ├────────┼───────────────┼──────────────────────┤
//! │ 1      │ Alice         │ 2023-12-25T14:30     │
//! │ 2      │ Bob           │ 2023-12-25T18:00:30  │
//! └────────┴───────────────┴──────────────────────┘
//!   one comma-separated line per record, no header
//! ```
//!
//! Commas inside names are not escaped. A name containing a comma produces a
//! line that fails the field-count check on load and is skipped.

mod datetime;
mod line;
mod import;

pub use datetime::{format_canonical, parse_canonical, parse_flexible, FLEXIBLE_FORMATS};
pub use line::{decode_record, encode_record, FIELD_SEPARATOR};
pub use import::{
    export_header, is_header, parse_import_line, ImportReport, SkipReason, SkippedLine,
    HEADER_MARKERS,
};
