//! Tests for the background cleanup worker
//!
//! These tests verify:
//! - Past reservations are removed on a tick
//! - Future reservations survive
//! - Config-driven startup and shutdown

use std::sync::Arc;
use std::thread;
use std::time::{Duration as StdDuration, Instant};

use chrono::{Duration, Local};
use resvstore::config::Config;
use resvstore::{CleanupWorker, ReservationStore, StoreError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_shared_store(config: Config) -> Arc<ReservationStore> {
    Arc::new(ReservationStore::open(config))
}

fn wait_until<F: Fn() -> bool>(condition: F) -> bool {
    let deadline = Instant::now() + StdDuration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(StdDuration::from_millis(10));
    }
    condition()
}

// =============================================================================
// Worker Tests
// =============================================================================

#[test]
fn test_worker_removes_past_reservations() {
    let temp = TempDir::new().unwrap();
    let store = setup_shared_store(
        Config::builder()
            .data_file(temp.path().join("reservations.dat"))
            .build(),
    );
    let now = Local::now().naive_local();
    store.add("Yesterday", now - Duration::days(1)).unwrap();
    store.add("Tomorrow", now + Duration::days(1)).unwrap();

    let worker = CleanupWorker::spawn(Arc::clone(&store), StdDuration::from_millis(20)).unwrap();

    assert!(wait_until(|| store.len() == 1));
    worker.shutdown();

    assert_eq!(store.list()[0].name(), "Tomorrow");
}

#[test]
fn test_worker_from_config() {
    let temp = TempDir::new().unwrap();
    let store = setup_shared_store(
        Config::builder()
            .data_file(temp.path().join("reservations.dat"))
            .cleanup_interval(StdDuration::from_millis(20))
            .build(),
    );
    store
        .add("Long gone", Local::now().naive_local() - Duration::weeks(2))
        .unwrap();

    let worker = CleanupWorker::from_config(&store).unwrap().unwrap();

    assert_eq!(worker.interval(), StdDuration::from_millis(20));
    assert!(wait_until(|| store.is_empty()));
}

#[test]
fn test_worker_disabled_by_default() {
    let temp = TempDir::new().unwrap();
    let store = setup_shared_store(
        Config::builder()
            .data_file(temp.path().join("reservations.dat"))
            .build(),
    );

    assert!(CleanupWorker::from_config(&store).unwrap().is_none());
}

#[test]
fn test_zero_interval_rejected() {
    let temp = TempDir::new().unwrap();
    let store = setup_shared_store(
        Config::builder()
            .data_file(temp.path().join("reservations.dat"))
            .build(),
    );

    let result = CleanupWorker::spawn(store, StdDuration::ZERO);

    assert!(matches!(result, Err(StoreError::Config(_))));
}

#[test]
fn test_drop_stops_worker() {
    let temp = TempDir::new().unwrap();
    let store = setup_shared_store(
        Config::builder()
            .data_file(temp.path().join("reservations.dat"))
            .build(),
    );

    {
        let _worker = CleanupWorker::spawn(Arc::clone(&store), StdDuration::from_millis(5)).unwrap();
        thread::sleep(StdDuration::from_millis(20));
    }

    assert!(wait_until(|| Arc::strong_count(&store) == 1));
}
