//! # resvstore
//!
//! An embedded store for named, timestamped reservations with:
//! - Duplicate detection on (case-insensitive name, time)
//! - Monotonic, never-reused ids
//! - Full-rewrite flat-file durability with tolerant reload
//! - Best-effort CSV import (multi-format timestamps) and export
//! - Single-writer/multi-reader concurrency model
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Callers (CLI, UI, workers)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   ReservationStore                          │
//! │         (write_lock for mutations, RwLock snapshots)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Codec    │          │   Persist   │
//!   │ (per line)  │◄─────────│ (flat file) │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod codec;
pub mod persist;
pub mod query;
pub mod store;
pub mod maintenance;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::Config;
pub use record::{Reservation, ReservationId};
pub use codec::ImportReport;
pub use query::{SearchQuery, SortField, SortOrder};
pub use store::ReservationStore;
pub use maintenance::CleanupWorker;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of resvstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
