//! Flat file writer
//!
//! Serializes the full collection to disk.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::codec::encode_record;
use crate::config::FlushSync;
use crate::error::Result;
use crate::record::Reservation;

/// Writes the data file from scratch on every flush
///
/// Callers serialize access (the store keeps it behind a Mutex).
pub struct FlatFileWriter {
    /// Final data file path
    path: PathBuf,

    /// Scratch file renamed over `path` once fully written
    tmp_path: PathBuf,

    sync: FlushSync,

    /// Number of successful flushes
    flush_count: u64,
}

impl FlatFileWriter {
    /// Create a writer for the given data file
    ///
    /// No file is touched until the first `write_all`.
    pub fn new(path: &Path, sync: FlushSync) -> Self {
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");

        Self {
            path: path.to_path_buf(),
            tmp_path: PathBuf::from(tmp_name),
            sync,
            flush_count: 0,
        }
    }

    /// Replace the data file with the given records, one line each
    pub fn write_all(&mut self, records: &[Reservation]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        {
            let file = File::create(&self.tmp_path)?;
            let mut writer = BufWriter::new(file);
            for record in records {
                writer.write_all(encode_record(record).as_bytes())?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;

            if self.sync == FlushSync::OnFlush {
                writer.get_ref().sync_all()?;
            }
        }

        fs::rename(&self.tmp_path, &self.path)?;
        self.flush_count += 1;

        tracing::trace!(
            "Flushed {} reservations to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Get the data file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of successful flushes since creation
    pub fn flush_count(&self) -> u64 {
        self.flush_count
    }
}
