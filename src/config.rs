//! Configuration for resvstore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for a ReservationStore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Flat file holding one `id,name,time` line per reservation.
    /// A sibling `{data_file}.tmp` is used while flushing.
    pub data_file: PathBuf,

    /// Sync strategy: whether a flush fsyncs before the rename
    pub sync: FlushSync,

    // -------------------------------------------------------------------------
    // Maintenance Configuration
    // -------------------------------------------------------------------------
    /// How often the background worker removes past reservations.
    /// `None` disables the worker.
    pub cleanup_interval: Option<Duration>,
}

/// Flush sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushSync {
    /// fsync the file on every flush (safest, slowest)
    OnFlush,

    /// Leave syncing to the OS
    Never,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("./reservations.dat"),
            sync: FlushSync::OnFlush,
            cleanup_interval: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data file path
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    /// Set the flush sync strategy
    pub fn sync(mut self, sync: FlushSync) -> Self {
        self.config.sync = sync;
        self
    }

    /// Enable the background cleanup worker with the given interval
    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.config.cleanup_interval = Some(interval);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
