//! Admin override of the live daily problem.
//!
//! The rotation schedule needs no storage at all; this module persists the
//! one piece of admin state that exists alongside it - a pointer letting an
//! admin pin a specific problem as "live" regardless of today's rotation.
//! Saved atomically with file locking so a concurrent reader never sees a
//! torn write.

use crate::catalog::Catalog;
use crate::types::Problem;
use crate::{rotation, Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Admin-set pointer to the problem currently pinned as live
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentProblemState {
    pub problem_id: String,
    pub set_by: String,
    pub set_at: DateTime<Utc>,
    pub live: bool,
}

impl CurrentProblemState {
    /// Load the override from a file with shared locking
    ///
    /// Returns `Ok(None)` if no override file exists. A corrupt or
    /// unreadable file logs a warning and also yields `None` - the rotation
    /// fallback always works, so a broken override must never be fatal.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::debug!("No current-problem override at {:?}", path);
            return Ok(None);
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open override file {:?}: {}. Ignoring.", path, e);
                return Ok(None);
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock override file {:?}: {}. Ignoring.", path, e);
            return Ok(None);
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read override file {:?}: {}. Ignoring.", path, e);
            return Ok(None);
        }

        file.unlock()?;

        match serde_json::from_str::<CurrentProblemState>(&contents) {
            Ok(state) => {
                tracing::debug!("Loaded current-problem override from {:?}", path);
                Ok(Some(state))
            }
            Err(e) => {
                tracing::warn!("Failed to parse override file {:?}: {}. Ignoring.", path, e);
                Ok(None)
            }
        }
    }

    /// Save the override to a file with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "override path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved current-problem override to {:?}", path);
        Ok(())
    }

    /// Remove the override, restoring the rotation schedule
    pub fn clear(path: &Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
            tracing::debug!("Cleared current-problem override at {:?}", path);
        }
        Ok(())
    }
}

/// Resolve the problem that should be live today
///
/// A live admin override pointing at a known problem wins; otherwise today's
/// rotation entry is used. Returns `None` only for an empty catalog.
pub fn resolve_current<'a>(
    state: Option<&CurrentProblemState>,
    catalog: &'a Catalog,
    today: NaiveDate,
    epoch: NaiveDate,
) -> Option<&'a Problem> {
    if let Some(state) = state {
        if state.live {
            if let Some(problem) = catalog.by_id(&state.problem_id) {
                tracing::debug!("Using admin override: {}", problem.id);
                return Some(problem);
            }
            tracing::warn!(
                "Override points at unknown problem '{}', falling back to rotation",
                state.problem_id
            );
        }
    }

    if catalog.is_empty() {
        return None;
    }
    let number = rotation::problem_number_for_date(today, epoch, catalog.len());
    catalog.by_number(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use crate::rotation::DEFAULT_EPOCH;

    fn test_state(problem_id: &str, live: bool) -> CurrentProblemState {
        CurrentProblemState {
            problem_id: problem_id.into(),
            set_by: "admin".into(),
            set_at: Utc::now(),
            live,
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("current.json");

        let state = test_state("pb-4", true);
        state.save(&path).unwrap();

        let loaded = CurrentProblemState::load(&path).unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_load_nonexistent_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let loaded = CurrentProblemState::load(&temp_dir.path().join("none.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_corrupted_file_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("current.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let loaded = CurrentProblemState::load(&path).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_clear_removes_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("current.json");

        test_state("fma-1", true).save(&path).unwrap();
        CurrentProblemState::clear(&path).unwrap();
        assert!(!path.exists());

        // Clearing again is fine
        CurrentProblemState::clear(&path).unwrap();
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("current.json");

        test_state("fma-2", false).save(&path).unwrap();

        assert!(path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "current.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only current.json, found extras: {:?}",
            extras
        );
    }

    #[test]
    fn test_resolve_prefers_live_override() {
        let catalog = build_default_catalog();
        let state = test_state("pb-4", true);
        let problem =
            resolve_current(Some(&state), &catalog, DEFAULT_EPOCH, DEFAULT_EPOCH).unwrap();
        assert_eq!(problem.id, "pb-4");
    }

    #[test]
    fn test_resolve_ignores_inactive_override() {
        let catalog = build_default_catalog();
        let state = test_state("pb-4", false);
        let problem =
            resolve_current(Some(&state), &catalog, DEFAULT_EPOCH, DEFAULT_EPOCH).unwrap();
        // Rotation: epoch day is problem number 1
        assert_eq!(problem.id, "fma-1");
    }

    #[test]
    fn test_resolve_falls_back_on_unknown_id() {
        let catalog = build_default_catalog();
        let state = test_state("deleted-problem", true);
        let problem =
            resolve_current(Some(&state), &catalog, DEFAULT_EPOCH, DEFAULT_EPOCH).unwrap();
        assert_eq!(problem.id, "fma-1");
    }

    #[test]
    fn test_resolve_without_override_uses_rotation() {
        let catalog = build_default_catalog();
        let second_day = DEFAULT_EPOCH + chrono::Duration::days(1);
        let problem = resolve_current(None, &catalog, second_day, DEFAULT_EPOCH).unwrap();
        assert_eq!(problem.id, "fma-2");
    }
}
