//! The move journal: a JSON record of one organization run, kept so the
//! run can be undone.
//!
//! The journal lives at `.sortify_history.json` inside the organized
//! directory. Only runs that actually moved something write a journal; a
//! run with zero moves leaves the previous journal intact so it stays
//! undoable.

use crate::organizer::{OrganizeError, OrganizeResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Journal file name, relative to the organized directory.
pub const JOURNAL_FILE: &str = ".sortify_history.json";

/// One completed move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Where the file was before the run.
    pub from: PathBuf,
    /// Where the run put it.
    pub to: PathBuf,
    /// The category folder it went into.
    pub category: String,
}

/// All moves of one run, newest run replacing the previous journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveJournal {
    /// RFC 3339 timestamp of the run.
    pub timestamp: String,
    /// The directory that was organized.
    pub root: PathBuf,
    /// Moves in the order they happened.
    pub moves: Vec<MoveRecord>,
}

impl MoveJournal {
    pub fn new(root: PathBuf) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            root,
            moves: Vec::new(),
        }
    }

    pub fn record(&mut self, record: MoveRecord) {
        self.moves.push(record);
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    fn path_for(root: &Path) -> PathBuf {
        root.join(JOURNAL_FILE)
    }

    /// Writes the journal into `root`, replacing any previous one.
    pub fn save(&self, root: &Path) -> OrganizeResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            OrganizeError::JournalWriteFailed {
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            }
        })?;
        fs::write(Self::path_for(root), json)
            .map_err(|source| OrganizeError::JournalWriteFailed { source })
    }

    /// Loads the journal from `root`, if one exists.
    pub fn load(root: &Path) -> OrganizeResult<Option<Self>> {
        let path = Self::path_for(root);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .map_err(|source| OrganizeError::JournalReadFailed { source })?;
        let journal =
            serde_json::from_str(&json).map_err(|e| OrganizeError::JournalCorrupt {
                reason: e.to_string(),
            })?;
        Ok(Some(journal))
    }

    /// Removes the journal from `root`, if present.
    pub fn delete(root: &Path) -> OrganizeResult<()> {
        let path = Self::path_for(root);
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|source| OrganizeError::JournalWriteFailed { source })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_journal(root: &Path) -> MoveJournal {
        let mut journal = MoveJournal::new(root.to_path_buf());
        journal.record(MoveRecord {
            from: root.join("a.txt"),
            to: root.join("Documents").join("a.txt"),
            category: "Documents".to_string(),
        });
        journal.record(MoveRecord {
            from: root.join("b.png"),
            to: root.join("Images").join("b.png"),
            category: "Images".to_string(),
        });
        journal
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().expect("tempdir");
        let root = temp.path();

        sample_journal(root).save(root).expect("save");
        let loaded = MoveJournal::load(root).expect("load").expect("present");

        assert_eq!(loaded.root, root);
        assert_eq!(loaded.moves.len(), 2);
        assert_eq!(loaded.moves[0].category, "Documents");
        assert_eq!(loaded.moves[1].to, root.join("Images").join("b.png"));
    }

    #[test]
    fn test_load_missing_journal_is_none() {
        let temp = TempDir::new().expect("tempdir");
        let loaded = MoveJournal::load(temp.path()).expect("load");
        assert!(loaded.is_none());
    }

    #[test]
    fn test_corrupt_journal_is_an_error() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join(JOURNAL_FILE), "not json at all").expect("write");

        let result = MoveJournal::load(temp.path());
        assert!(matches!(result, Err(OrganizeError::JournalCorrupt { .. })));
    }

    #[test]
    fn test_delete_removes_journal_and_is_idempotent() {
        let temp = TempDir::new().expect("tempdir");
        let root = temp.path();
        sample_journal(root).save(root).expect("save");
        assert!(root.join(JOURNAL_FILE).exists());

        MoveJournal::delete(root).expect("delete");
        assert!(!root.join(JOURNAL_FILE).exists());

        MoveJournal::delete(root).expect("second delete is a no-op");
    }
}
