//! Background maintenance
//!
//! Periodically removes past reservations from a shared store.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Sender};

use crate::error::{Result, StoreError};
use crate::store::ReservationStore;

/// Runs `cleanup_past_now` on a fixed interval
///
/// The thread stops when the worker is shut down or dropped.
pub struct CleanupWorker {
    /// Dropping the sender wakes the worker and stops it
    shutdown_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl CleanupWorker {
    /// Spawn a worker for `store` ticking every `interval`
    pub fn spawn(store: Arc<ReservationStore>, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(StoreError::Config(
                "cleanup interval must be non-zero".to_string(),
            ));
        }

        let (shutdown_tx, shutdown_rx) = channel::bounded::<()>(1);
        let ticker = channel::tick(interval);

        let handle = thread::Builder::new()
            .name("resvstore-cleanup".to_string())
            .spawn(move || loop {
                channel::select! {
                    recv(ticker) -> _ => {
                        let removed = store.cleanup_past_now();
                        if !removed.is_empty() {
                            tracing::info!("Cleanup removed {} past reservations", removed.len());
                        }
                    }
                    recv(shutdown_rx) -> _ => {
                        tracing::debug!("Cleanup worker stopping");
                        break;
                    }
                }
            })?;

        tracing::debug!("Cleanup worker started (interval={:?})", interval);

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
            interval,
        })
    }

    /// Spawn a worker if the store's config enables one
    pub fn from_config(store: &Arc<ReservationStore>) -> Result<Option<Self>> {
        match store.config().cleanup_interval {
            Some(interval) => Self::spawn(Arc::clone(store), interval).map(Some),
            None => Ok(None),
        }
    }

    /// Stop the worker and wait for its thread to exit
    pub fn shutdown(mut self) {
        self.stop();
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn stop(&mut self) {
        drop(self.shutdown_tx.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Cleanup worker panicked");
            }
        }
    }
}

impl Drop for CleanupWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
