//! Persistence Module
//!
//! Durability for the reservation collection via a single flat file.
//!
//! ## Responsibilities
//! - Rewrite the whole file from the current collection on every flush
//! - Never leave a truncated file behind (write to `.tmp`, then rename)
//! - Reload on startup, skipping malformed lines
//!
//! ## Flush Sequence
//! ```text
//!   snapshot ──► {data_file}.tmp ──(fsync)──► rename ──► {data_file}
//! ```

mod writer;
mod loader;

pub use writer::FlatFileWriter;
pub use loader::{FlatFileLoader, LoadResult};
