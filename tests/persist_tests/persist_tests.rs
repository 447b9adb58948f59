//! Tests for the flat file writer and loader
//!
//! These tests verify:
//! - Full rewrite of the data file on every flush
//! - No scratch file left behind
//! - Missing file loads as empty
//! - Malformed, non-UTF-8, blank and duplicate-id lines are skipped
//! - max_id tracking

use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use resvstore::config::FlushSync;
use resvstore::persist::{FlatFileLoader, FlatFileWriter, LoadResult};
use resvstore::Reservation;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_file() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("reservations.dat");
    (temp_dir, path)
}

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 5, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

// =============================================================================
// Writer Tests
// =============================================================================

#[test]
fn test_write_all_creates_file() {
    let (_temp, path) = setup_temp_file();
    let mut writer = FlatFileWriter::new(&path, FlushSync::OnFlush);

    writer
        .write_all(&[
            Reservation::new(1, "Alice", at(1, 10)),
            Reservation::new(2, "Bob", at(2, 11)),
        ])
        .unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "1,Alice,2030-05-01T10:00\n2,Bob,2030-05-02T11:00\n");
    assert_eq!(writer.flush_count(), 1);
    assert_eq!(writer.path(), path.as_path());
}

#[test]
fn test_write_all_replaces_previous_contents() {
    let (_temp, path) = setup_temp_file();
    let mut writer = FlatFileWriter::new(&path, FlushSync::Never);

    writer
        .write_all(&[
            Reservation::new(1, "Alice", at(1, 10)),
            Reservation::new(2, "Bob", at(2, 11)),
        ])
        .unwrap();
    writer
        .write_all(&[Reservation::new(2, "Bob", at(2, 11))])
        .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "2,Bob,2030-05-02T11:00\n");
}

#[test]
fn test_write_all_leaves_no_scratch_file() {
    let (temp, path) = setup_temp_file();
    let mut writer = FlatFileWriter::new(&path, FlushSync::OnFlush);

    writer.write_all(&[]).unwrap();

    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["reservations.dat".to_string()]);
}

#[test]
fn test_write_all_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("deeper").join("data.dat");
    let mut writer = FlatFileWriter::new(&path, FlushSync::OnFlush);

    writer
        .write_all(&[Reservation::new(1, "Alice", at(1, 10))])
        .unwrap();

    assert!(path.exists());
}

#[test]
fn test_write_all_fails_when_target_is_directory() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("occupied");
    fs::create_dir(&path).unwrap();
    let mut writer = FlatFileWriter::new(&path, FlushSync::OnFlush);

    assert!(writer.write_all(&[]).is_err());
    assert_eq!(writer.flush_count(), 0);
}

// =============================================================================
// Loader Tests
// =============================================================================

#[test]
fn test_load_missing_file_is_empty() {
    let (_temp, path) = setup_temp_file();

    let (records, result) = FlatFileLoader::load(&path).unwrap();

    assert!(records.is_empty());
    assert_eq!(result, LoadResult::default());
}

#[test]
fn test_load_written_file() {
    let (_temp, path) = setup_temp_file();
    let mut writer = FlatFileWriter::new(&path, FlushSync::OnFlush);
    writer
        .write_all(&[
            Reservation::new(3, "Alice", at(1, 10)),
            Reservation::new(9, "Bob", at(2, 11)),
        ])
        .unwrap();

    let (records, result) = FlatFileLoader::load(&path).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name(), "Alice");
    assert_eq!(records[1].time(), at(2, 11));
    assert_eq!(result.records_loaded, 2);
    assert_eq!(result.lines_skipped, 0);
    assert_eq!(result.max_id, 9);
}

#[test]
fn test_load_skips_malformed_lines() {
    let (_temp, path) = setup_temp_file();
    fs::write(
        &path,
        "5,Alice,2030-05-01T10:00\n\
         abc,Bob,2030-05-01T10:00\n\
         6,Carol,not-a-time\n\
         7,Dave\n\
         \n\
         8,Eve,2030-05-03T09:30:15\n",
    )
    .unwrap();

    let (records, result) = FlatFileLoader::load(&path).unwrap();

    let ids: Vec<u64> = records.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![5, 8]);
    assert_eq!(result.records_loaded, 2);
    assert_eq!(result.lines_skipped, 3);
    assert_eq!(result.max_id, 8);
}

#[test]
fn test_load_skips_non_utf8_line() {
    let (_temp, path) = setup_temp_file();
    fs::write(
        &path,
        b"1,Alice,2030-05-01T10:00\n2,\xff\xfe,2030-05-02T10:00\n3,Carol,2030-05-03T10:00\n",
    )
    .unwrap();

    let (records, result) = FlatFileLoader::load(&path).unwrap();

    let ids: Vec<u64> = records.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(result.records_loaded, 2);
    assert_eq!(result.lines_skipped, 1);
    assert_eq!(result.max_id, 3);
}

#[test]
fn test_load_accepts_crlf_line_endings() {
    let (_temp, path) = setup_temp_file();
    fs::write(
        &path,
        "1,Alice,2030-05-01T10:00\r\n2,Bob,2030-05-02T11:00\r\n",
    )
    .unwrap();

    let (records, result) = FlatFileLoader::load(&path).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].name(), "Bob");
    assert_eq!(records[1].time(), at(2, 11));
    assert_eq!(result.lines_skipped, 0);
}

#[test]
fn test_load_skips_repeated_ids() {
    let (_temp, path) = setup_temp_file();
    fs::write(
        &path,
        "1,Alice,2030-05-01T10:00\n1,Bob,2030-05-02T10:00\n",
    )
    .unwrap();

    let (records, result) = FlatFileLoader::load(&path).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name(), "Alice");
    assert_eq!(result.lines_skipped, 1);
}

#[test]
fn test_load_keeps_duplicate_name_time_pairs() {
    let (_temp, path) = setup_temp_file();
    fs::write(
        &path,
        "1,Alice,2030-05-01T10:00\n2,ALICE,2030-05-01T10:00\n",
    )
    .unwrap();

    let (records, _) = FlatFileLoader::load(&path).unwrap();

    assert_eq!(records.len(), 2);
}

#[test]
fn test_load_directory_is_error() {
    let temp = TempDir::new().unwrap();

    assert!(FlatFileLoader::load(temp.path()).is_err());
}
