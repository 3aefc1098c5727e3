//! Registration roster persistence.
//!
//! Registrations are appended to a JSONL (JSON Lines) log with file locking
//! to ensure safe concurrent access, and later archived to CSV (see the
//! `export` module). Loading merges the live log with the archive,
//! deduplicating by registration id.

use crate::{Registration, Result};
use fs2::FileExt;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Sink trait for persisting registrations
pub trait RegistrationSink {
    fn append(&mut self, registration: &Registration) -> Result<()>;
}

/// JSONL-based registration sink with file locking
pub struct JsonlRoster {
    path: PathBuf,
}

impl JsonlRoster {
    /// Create a new JSONL roster for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl RegistrationSink for JsonlRoster {
    fn append(&mut self, registration: &Registration) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Acquire exclusive lock
        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(registration)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended registration {} to roster", registration.id);
        Ok(())
    }
}

/// Read all registrations from a roster JSONL file
pub fn read_registrations(path: &Path) -> Result<Vec<Registration>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut registrations = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Registration>(&line) {
            Ok(registration) => registrations.push(registration),
            Err(e) => {
                tracing::warn!("Skipping malformed roster line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    Ok(registrations)
}

/// Load registrations from both the live JSONL log and the archived CSV
///
/// Returns registrations sorted by submission time (newest first).
/// Automatically deduplicates entries that appear in both files.
pub fn load_registrations(jsonl_path: &Path, csv_path: &Path) -> Result<Vec<Registration>> {
    let mut registrations = Vec::new();
    let mut seen_ids = HashSet::new();

    // Live log first (most recent)
    if jsonl_path.exists() {
        for registration in read_registrations(jsonl_path)? {
            seen_ids.insert(registration.id);
            registrations.push(registration);
        }
        tracing::debug!("Loaded {} registrations from roster log", registrations.len());
    }

    // Archived CSV
    if csv_path.exists() {
        let mut archived = 0;
        for registration in crate::export::read_archived_registrations(csv_path)? {
            if seen_ids.insert(registration.id) {
                registrations.push(registration);
                archived += 1;
            }
        }
        tracing::debug!("Loaded {} registrations from CSV archive", archived);
    }

    registrations.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

    tracing::info!("Loaded {} total registrations", registrations.len());

    Ok(registrations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    pub(crate) fn test_registration(first_name: &str, days_ago: i64) -> Registration {
        Registration {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: "Tester".into(),
            email: format!("{}@example.com", first_name.to_lowercase()),
            grade: "10".into(),
            events: vec!["F=ma".into(), "Physics Bowl".into()],
            physics_courses: vec!["AP Physics 1".into()],
            physics_other: None,
            math_courses: vec!["Calculus".into()],
            math_other: None,
            meeting_preference: vec!["Thursday lunch".into()],
            meeting_other: Some("after school works too".into()),
            submitted_at: Utc::now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_append_and_read_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("roster.jsonl");

        let mut sink = JsonlRoster::new(&path);
        sink.append(&test_registration("Ada", 0)).unwrap();
        sink.append(&test_registration("Emmy", 0)).unwrap();

        let registrations = read_registrations(&path).unwrap();
        assert_eq!(registrations.len(), 2);
        assert_eq!(registrations[0].first_name, "Ada");
        assert_eq!(registrations[1].first_name, "Emmy");
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registrations = read_registrations(&temp_dir.path().join("none.jsonl")).unwrap();
        assert!(registrations.is_empty());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("roster.jsonl");

        let mut sink = JsonlRoster::new(&path);
        sink.append(&test_registration("Ada", 0)).unwrap();

        // Corrupt line in the middle
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "{{ not json }}").unwrap();
        }
        sink.append(&test_registration("Emmy", 0)).unwrap();

        let registrations = read_registrations(&path).unwrap();
        assert_eq!(registrations.len(), 2);
    }

    #[test]
    fn test_load_sorts_newest_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let jsonl_path = temp_dir.path().join("roster.jsonl");
        let csv_path = temp_dir.path().join("roster.csv");

        let mut sink = JsonlRoster::new(&jsonl_path);
        sink.append(&test_registration("Old", 5)).unwrap();
        sink.append(&test_registration("New", 1)).unwrap();

        let registrations = load_registrations(&jsonl_path, &csv_path).unwrap();
        assert_eq!(registrations[0].first_name, "New");
        assert_eq!(registrations[1].first_name, "Old");
    }

    #[test]
    fn test_deduplication_across_log_and_archive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let jsonl_path = temp_dir.path().join("roster.jsonl");
        let csv_path = temp_dir.path().join("roster.csv");

        let registration = test_registration("Ada", 1);
        let id = registration.id;
        let mut sink = JsonlRoster::new(&jsonl_path);
        sink.append(&registration).unwrap();

        // Archive to CSV, then re-append the same record to a fresh log
        crate::export::roster_to_csv_and_archive(&jsonl_path, &csv_path).unwrap();
        let mut sink = JsonlRoster::new(&jsonl_path);
        sink.append(&registration).unwrap();

        let registrations = load_registrations(&jsonl_path, &csv_path).unwrap();
        let count = registrations.iter().filter(|r| r.id == id).count();
        assert_eq!(count, 1);
    }
}
