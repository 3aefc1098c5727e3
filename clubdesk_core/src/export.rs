//! CSV export for archiving the registration roster.
//!
//! Converts the JSONL roster log to a CSV archive atomically, so the admin
//! spreadsheet view never observes a half-written file and no registration
//! is lost mid-export.

use crate::{Registration, Result};
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::path::Path;
use uuid::Uuid;

/// Separator for multi-valued fields within a single CSV cell
const LIST_SEPARATOR: &str = ";";

/// A row in the CSV output
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct CsvRow {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    grade: String,
    events: String,
    physics_courses: String,
    physics_other: Option<String>,
    math_courses: String,
    math_other: Option<String>,
    meeting_preference: String,
    meeting_other: Option<String>,
    submitted_at: String,
}

impl From<&Registration> for CsvRow {
    fn from(registration: &Registration) -> Self {
        CsvRow {
            id: registration.id.to_string(),
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            email: registration.email.clone(),
            grade: registration.grade.clone(),
            events: registration.events.join(LIST_SEPARATOR),
            physics_courses: registration.physics_courses.join(LIST_SEPARATOR),
            physics_other: registration.physics_other.clone(),
            math_courses: registration.math_courses.join(LIST_SEPARATOR),
            math_other: registration.math_other.clone(),
            meeting_preference: registration.meeting_preference.join(LIST_SEPARATOR),
            meeting_other: registration.meeting_other.clone(),
            submitted_at: registration.submitted_at.to_rfc3339(),
        }
    }
}

impl TryFrom<CsvRow> for Registration {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| crate::Error::Other(format!("Invalid UUID: {}", e)))?;

        let submitted_at = DateTime::parse_from_rfc3339(&row.submitted_at)
            .map_err(|e| crate::Error::Other(format!("Invalid date: {}", e)))?
            .with_timezone(&Utc);

        Ok(Registration {
            id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            grade: row.grade,
            events: split_list(&row.events),
            physics_courses: split_list(&row.physics_courses),
            physics_other: row.physics_other,
            math_courses: split_list(&row.math_courses),
            math_other: row.math_other,
            meeting_preference: split_list(&row.meeting_preference),
            meeting_other: row.meeting_other,
            submitted_at,
        })
    }
}

fn split_list(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split(LIST_SEPARATOR).map(str::to_string).collect()
}

/// Roll up roster registrations into CSV and archive the log atomically
///
/// This function:
/// 1. Reads all registrations from the JSONL log
/// 2. Appends them to the CSV file (creates with headers if needed)
/// 3. Syncs the CSV to disk
/// 4. Renames the log to .processed
/// 5. Returns the number of registrations processed
///
/// The CSV is fsynced before the log is renamed, and the log is renamed
/// rather than deleted so it can be recovered manually if needed.
pub fn roster_to_csv_and_archive(jsonl_path: &Path, csv_path: &Path) -> Result<usize> {
    let registrations = crate::roster::read_registrations(jsonl_path)?;

    if registrations.is_empty() {
        tracing::info!("No registrations in roster log to export");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Headers only when the file is freshly created
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for registration in &registrations {
        let row = CsvRow::from(registration);
        writer.serialize(row)?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} registrations to CSV", registrations.len());

    // Atomically archive the log by renaming it
    let processed_path = jsonl_path.with_extension("jsonl.processed");
    std::fs::rename(jsonl_path, &processed_path)?;

    tracing::info!("Archived roster log to {:?}", processed_path);

    Ok(registrations.len())
}

/// Read all registrations back from a CSV archive
///
/// Malformed rows are skipped with a warning rather than failing the load.
pub fn read_archived_registrations(path: &Path) -> Result<Vec<Registration>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut registrations = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match Registration::try_from(row) {
                Ok(registration) => registrations.push(registration),
                Err(e) => {
                    tracing::warn!("Failed to parse CSV row: {}", e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row: {}", e);
            }
        }
    }

    Ok(registrations)
}

/// Clean up old processed roster logs
///
/// This removes all .jsonl.processed files in the given directory.
pub fn cleanup_processed_rosters(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(extension) = path.extension() {
            if extension == "processed" {
                std::fs::remove_file(&path)?;
                tracing::debug!("Removed processed roster log: {:?}", path);
                count += 1;
            }
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed roster logs", count);
    }

    Ok(count)
}
