//! Store Module
//!
//! The reservation store that owns the authoritative collection.
//!
//! ## Responsibilities
//! - Allocate monotonic ids
//! - Reject duplicate `(name, time)` pairs on add/update/import
//! - Serve snapshots to readers
//! - Flush the full collection after every mutation
//! - Load existing state on startup

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Local, NaiveDateTime};
use parking_lot::{Mutex, RwLock};

use crate::codec::{encode_record, export_header, is_header, parse_import_line, ImportReport, SkipReason};
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::persist::{FlatFileLoader, FlatFileWriter, LoadResult};
use crate::query::SearchQuery;
use crate::record::{Reservation, ReservationId};

/// The reservation store
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Mutations** (add/update/delete/cleanup/import): Serialized by `write_lock`
///   - Duplicate check and insert happen under the same guard
///   - Must acquire: write_lock → records (write) → writer
///
/// - **Reads** (list/get/search/export): Concurrent
///   - No write_lock needed
///   - Take the `records` read lock just long enough to clone a snapshot
///
/// - **Ids**: `last_id` is an atomic counter, never decremented or reused
pub struct ReservationStore {
    /// Store configuration
    config: Config,

    /// Live records in insertion order
    records: RwLock<Vec<Reservation>>,

    /// Highest id handed out or loaded
    last_id: AtomicU64,

    /// Flat file writer (exclusive access needed)
    writer: Mutex<FlatFileWriter>,

    /// Serializes mutations and their flush
    write_lock: Mutex<()>,

    /// Stats from the startup load
    load_result: LoadResult,
}

impl ReservationStore {
    /// Open a store with the given config
    ///
    /// Loads the data file if it exists. A missing file gives an empty store;
    /// an unreadable file is logged and also gives an empty store.
    pub fn open(config: Config) -> Self {
        let (records, load_result) = match FlatFileLoader::load(&config.data_file) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!(
                    "Error loading reservations from {}: {}",
                    config.data_file.display(),
                    e
                );
                (Vec::new(), LoadResult::default())
            }
        };

        if load_result.records_loaded > 0 || load_result.lines_skipped > 0 {
            tracing::info!(
                "Loaded {} reservations ({} lines skipped), max_id={}",
                load_result.records_loaded,
                load_result.lines_skipped,
                load_result.max_id
            );
        }

        let writer = FlatFileWriter::new(&config.data_file, config.sync);

        Self {
            last_id: AtomicU64::new(load_result.max_id),
            records: RwLock::new(records),
            writer: Mutex::new(writer),
            write_lock: Mutex::new(()),
            load_result,
            config,
        }
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data file
    pub fn open_path(path: &Path) -> Self {
        Self::open(Config::builder().data_file(path).build())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Snapshot of all records in insertion order
    pub fn list(&self) -> Vec<Reservation> {
        self.records.read().clone()
    }

    /// Get a record by id
    pub fn get(&self, id: ReservationId) -> Option<Reservation> {
        self.records.read().iter().find(|r| r.id() == id).cloned()
    }

    /// Filter by `term` and sort by `sort_by` (`"name"`/`"time"`) in
    /// `sort_order` (`"desc"` or ascending)
    pub fn search_and_sort(
        &self,
        term: Option<&str>,
        sort_by: &str,
        sort_order: &str,
    ) -> Vec<Reservation> {
        self.search(&SearchQuery::parse(term, sort_by, sort_order))
    }

    /// Run a parsed query against the current records
    pub fn search(&self, query: &SearchQuery) -> Vec<Reservation> {
        query.apply(self.records.read().iter())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a reservation
    ///
    /// Fails with `InvalidName` if the name contains a line break, and with
    /// `Duplicate` if the name (case-insensitive) and time match an existing
    /// record. A failed flush is logged; the insert stands.
    pub fn add(&self, name: &str, time: NaiveDateTime) -> Result<Reservation> {
        validate_name(name)?;
        let _write_guard = self.write_lock.lock();

        if self.is_duplicate(name, time, None) {
            return Err(StoreError::Duplicate {
                name: name.to_string(),
                time,
            });
        }

        let record = Reservation::new(self.allocate_id(), name, time);
        self.records.write().push(record.clone());
        tracing::debug!("Added {}", record);

        self.persist();
        Ok(record)
    }

    /// Replace the name and time of an existing reservation
    ///
    /// Rejects names with line breaks, then checks for a duplicate among the
    /// other records, then for the id.
    pub fn update(&self, id: ReservationId, name: &str, time: NaiveDateTime) -> Result<Reservation> {
        validate_name(name)?;
        let _write_guard = self.write_lock.lock();

        if self.is_duplicate(name, time, Some(id)) {
            return Err(StoreError::Duplicate {
                name: name.to_string(),
                time,
            });
        }

        let record = Reservation::new(id, name, time);
        {
            let mut records = self.records.write();
            let slot = records
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or(StoreError::NotFound(id))?;
            *slot = record.clone();
        }
        tracing::debug!("Updated {}", record);

        self.persist();
        Ok(record)
    }

    /// Delete a reservation, returning whether anything was removed
    pub fn delete(&self, id: ReservationId) -> bool {
        let _write_guard = self.write_lock.lock();

        let removed = {
            let mut records = self.records.write();
            let before = records.len();
            records.retain(|r| r.id() != id);
            records.len() < before
        };

        if removed {
            tracing::debug!("Deleted reservation {}", id);
            self.persist();
        }
        removed
    }

    /// Remove every record strictly before `now`
    ///
    /// Flushes only when something was removed. Returns the removed records.
    pub fn cleanup_past(&self, now: NaiveDateTime) -> Vec<Reservation> {
        let _write_guard = self.write_lock.lock();

        let removed: Vec<Reservation> = {
            let mut records = self.records.write();
            let (past, upcoming): (Vec<_>, Vec<_>) =
                records.drain(..).partition(|r| r.time() < now);
            *records = upcoming;
            past
        };

        if !removed.is_empty() {
            tracing::debug!("Removed {} past reservations", removed.len());
            self.persist();
        }
        removed
    }

    /// `cleanup_past` against the local wall clock
    pub fn cleanup_past_now(&self) -> Vec<Reservation> {
        self.cleanup_past(Local::now().naive_local())
    }

    // =========================================================================
    // Bulk Import / Export
    // =========================================================================

    /// Import reservations from CSV-style lines
    ///
    /// Best-effort: bad and duplicate lines are skipped and reported, never
    /// fatal. Any id in the input is ignored. Always flushes at the end.
    pub fn import_lines<I, S>(&self, lines: I) -> ImportReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let _write_guard = self.write_lock.lock();

        let mut report = ImportReport::default();
        let mut seen_content = false;

        for (index, raw) in lines.into_iter().enumerate() {
            let line = raw.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            let line_number = index + 1;

            if !seen_content {
                seen_content = true;
                if is_header(line) {
                    tracing::debug!("Skipping header line: {}", line);
                    continue;
                }
            }

            let (name, time) = match parse_import_line(line) {
                Ok(parsed) => parsed,
                Err(reason) => {
                    tracing::warn!("Skipping invalid import line {} '{}': {}", line_number, line, reason);
                    report.record_skip(line_number, line, reason);
                    continue;
                }
            };

            if self.is_duplicate(&name, time, None) {
                tracing::info!("Skipping duplicate: {} - {}", name, time);
                report.record_skip(line_number, line, SkipReason::Duplicate);
                continue;
            }

            let record = Reservation::new(self.allocate_id(), name, time);
            self.records.write().push(record);
            report.imported += 1;
        }

        tracing::info!(
            "Import complete: {} added, {} skipped",
            report.imported,
            report.skipped()
        );

        self.persist();
        report
    }

    /// Import from a reader, one line per record
    ///
    /// Lines read before an I/O error are still imported and flushed; the
    /// error is then returned.
    pub fn import_from<R: BufRead>(&self, reader: R) -> Result<ImportReport> {
        let mut lines = Vec::new();
        let mut read_error = None;

        for line in reader.lines() {
            match line {
                Ok(line) => lines.push(line),
                Err(e) => {
                    read_error = Some(e);
                    break;
                }
            }
        }

        let report = self.import_lines(lines);
        match read_error {
            Some(e) => {
                tracing::error!("Import source failed after {} lines: {}", report.imported, e);
                Err(e.into())
            }
            None => Ok(report),
        }
    }

    /// Write a header plus one line per record, in collection order
    ///
    /// Returns the number of records written.
    pub fn export<W: Write>(&self, mut writer: W) -> Result<usize> {
        let snapshot = self.list();

        writeln!(writer, "{}", export_header())?;
        for record in &snapshot {
            writeln!(writer, "{}", encode_record(record))?;
        }
        writer.flush()?;

        Ok(snapshot.len())
    }

    // =========================================================================
    // Durability
    // =========================================================================

    /// Flush to disk (public API)
    ///
    /// Unlike the implicit flush after a mutation, errors are returned.
    pub fn flush(&self) -> Result<()> {
        let _write_guard = self.write_lock.lock();
        self.flush_internal()
    }

    /// Close the store, flushing one last time
    pub fn close(self) -> Result<()> {
        self.flush()
    }

    /// Internal flush implementation (called with write lock held)
    fn flush_internal(&self) -> Result<()> {
        let snapshot = self.list();
        self.writer.lock().write_all(&snapshot)
    }

    /// Flush after a mutation; failures are logged, not returned
    fn persist(&self) {
        if let Err(e) = self.flush_internal() {
            tracing::error!(
                "Error saving reservations to {}: {}",
                self.config.data_file.display(),
                e
            );
        }
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn allocate_id(&self) -> ReservationId {
        self.last_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_duplicate(&self, name: &str, time: NaiveDateTime, exclude: Option<ReservationId>) -> bool {
        self.records
            .read()
            .iter()
            .any(|r| Some(r.id()) != exclude && r.conflicts_with(name, time))
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of live records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// The id the next insert will receive
    pub fn next_id(&self) -> ReservationId {
        self.last_id.load(Ordering::SeqCst) + 1
    }

    /// Stats from the startup load
    pub fn load_result(&self) -> &LoadResult {
        &self.load_result
    }

    /// Number of successful flushes since open
    pub fn flush_count(&self) -> u64 {
        self.writer.lock().flush_count()
    }

    /// Get the data file path
    pub fn data_file(&self) -> &Path {
        &self.config.data_file
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// A name must fit on one line of the data file
fn validate_name(name: &str) -> Result<()> {
    if name.contains(['\n', '\r']) {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}
