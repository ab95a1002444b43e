//! Reverting a previous organization run from its move journal.

use crate::audit::AuditLog;
use crate::history::{MoveJournal, MoveRecord};
use crate::organizer::{OrganizeError, OrganizeResult};
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to one journal entry during an undo.
#[derive(Debug)]
pub enum RestoreOutcome {
    /// The file went back to its original location.
    Restored { file: String },
    /// The file was no longer where the journal said; nothing to do.
    Skipped { path: PathBuf, reason: String },
    /// The restore failed; the file stays where it is.
    Failed { path: PathBuf, reason: String },
}

/// Result of undoing one journal.
#[derive(Debug, Default)]
pub struct UndoReport {
    pub restored: usize,
    pub skipped: Vec<(PathBuf, String)>,
    pub failed: Vec<(PathBuf, String)>,
}

impl UndoReport {
    /// True when every journal entry was restored.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Replays a move journal in reverse.
pub struct UndoManager;

impl UndoManager {
    /// Undoes the most recent run recorded in `root`'s journal.
    ///
    /// The journal is deleted only after a fully clean undo, so a partial
    /// restore can be retried once the obstruction is fixed.
    pub fn undo(root: &Path, audit: &mut AuditLog) -> OrganizeResult<UndoReport> {
        if !root.exists() {
            return Err(OrganizeError::PathNotFound {
                path: root.to_path_buf(),
            });
        }

        let journal = MoveJournal::load(root)?.ok_or_else(|| OrganizeError::NothingToUndo {
            path: root.to_path_buf(),
        })?;

        let report = Self::apply(&journal, audit, |_| {});

        if report.is_clean()
            && let Err(e) = MoveJournal::delete(root)
        {
            audit.warning(&format!("Could not delete move journal: {}", e));
        }

        Ok(report)
    }

    /// Replays `journal` in reverse (undo is LIFO), invoking `observer`
    /// once per entry. Does not touch the journal file itself; callers
    /// decide when it may be deleted.
    pub fn apply(
        journal: &MoveJournal,
        audit: &mut AuditLog,
        mut observer: impl FnMut(&RestoreOutcome),
    ) -> UndoReport {
        audit.info(&format!("Undoing run from {}", journal.timestamp));

        let mut report = UndoReport::default();
        for record in journal.moves.iter().rev() {
            let outcome = Self::restore(record);
            match &outcome {
                RestoreOutcome::Restored { file } => {
                    audit.info(&format!("Restored {} <- {}", file, record.category));
                    report.restored += 1;
                }
                RestoreOutcome::Skipped { path, reason } => {
                    audit.warning(&format!("Skipped {}: {}", path.display(), reason));
                    report.skipped.push((path.clone(), reason.clone()));
                }
                RestoreOutcome::Failed { path, reason } => {
                    audit.error(&format!("Failed to restore {}: {}", path.display(), reason));
                    report.failed.push((path.clone(), reason.clone()));
                }
            }
            observer(&outcome);
        }

        audit.info("Undo completed");
        report
    }

    /// Puts one file back, backing up any conflicting file that has since
    /// appeared at the original location.
    fn restore(record: &MoveRecord) -> RestoreOutcome {
        if !record.to.exists() {
            return RestoreOutcome::Skipped {
                path: record.to.clone(),
                reason: "file not found at recorded location".to_string(),
            };
        }

        if record.from.exists() {
            let backup = backup_path(&record.from);
            if let Err(e) = fs::rename(&record.from, &backup) {
                return RestoreOutcome::Failed {
                    path: record.from.clone(),
                    reason: format!("could not back up conflicting file: {}", e),
                };
            }
        }

        match fs::rename(&record.to, &record.from) {
            Ok(()) => RestoreOutcome::Restored {
                file: record
                    .from
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            },
            Err(e) => RestoreOutcome::Failed {
                path: record.to.clone(),
                reason: e.to_string(),
            },
        }
    }
}

/// `file.txt` becomes `file.txt.bak.20260806-101542` next to the original.
fn backup_path(original: &Path) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let name = original
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");
    let backup_name = format!("{}.bak.{}", name, timestamp);
    match original.parent() {
        Some(parent) => parent.join(backup_name),
        None => PathBuf::from(backup_name),
    }
}
