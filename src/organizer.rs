//! The classifier pass: scan a directory, route each file by extension,
//! move it into its category folder.
//!
//! The pass is single-threaded and synchronous. It fails fast if the target
//! directory is missing (zero filesystem mutation), and otherwise treats
//! each file as an independent unit of work: a single move failing is
//! reported and the batch continues.

use crate::audit::AuditLog;
use crate::category::CategoryTable;
use crate::config::CompiledRules;
use crate::history::MoveRecord;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised by the organizer and the undo machinery.
#[derive(Debug)]
pub enum OrganizeError {
    /// The target directory does not exist.
    PathNotFound { path: PathBuf },
    /// The target path exists but is not a directory.
    NotADirectory { path: PathBuf },
    /// Enumerating the directory failed.
    ScanFailed { path: PathBuf, source: io::Error },
    /// A category subdirectory could not be created.
    FolderCreationFailed { path: PathBuf, source: io::Error },
    /// A file of the same name already sits in the category folder.
    DestinationExists { from: PathBuf, to: PathBuf },
    /// Renaming the file into its category folder failed.
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    /// The move journal could not be written.
    JournalWriteFailed { source: io::Error },
    /// The move journal could not be read.
    JournalReadFailed { source: io::Error },
    /// The move journal exists but cannot be interpreted.
    JournalCorrupt { reason: String },
    /// No journal exists, so there is nothing to undo.
    NothingToUndo { path: PathBuf },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathNotFound { path } => {
                write!(f, "Folder does not exist: {}", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Not a directory: {}", path.display())
            }
            Self::ScanFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::FolderCreationFailed { path, source } => {
                write!(f, "Failed to create folder {}: {}", path.display(), source)
            }
            Self::DestinationExists { from, to } => {
                write!(
                    f,
                    "Refusing to overwrite {}: {} stays put",
                    to.display(),
                    from.display()
                )
            }
            Self::MoveFailed { from, to, source } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
            Self::JournalWriteFailed { source } => {
                write!(f, "Failed to write move journal: {}", source)
            }
            Self::JournalReadFailed { source } => {
                write!(f, "Failed to read move journal: {}", source)
            }
            Self::JournalCorrupt { reason } => {
                write!(f, "Invalid move journal: {}", reason)
            }
            Self::NothingToUndo { path } => {
                write!(f, "No previous run to undo in {}", path.display())
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for organize and undo operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Whether the pass mutates the filesystem or only reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeMode {
    /// Move files for real.
    Apply,
    /// Same scan and classification, zero mutation.
    DryRun,
}

/// The outcome for one scanned file.
#[derive(Debug)]
pub enum FileOutcome {
    /// The file was moved into its category folder.
    Moved { file: String, record: MoveRecord },
    /// Dry run: the file would have been moved.
    WouldMove { file: String, category: String },
    /// No category claims the file's extension; it stays put.
    Skipped { file: String },
    /// The move failed; the file stays put and the batch continues.
    Failed { file: String, error: OrganizeError },
}

/// Summary of one classifier pass, with per-file outcomes in scan order.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    pub outcomes: Vec<FileOutcome>,
    /// Files moved (or, in a dry run, that would be moved).
    pub moved: usize,
    /// Files whose extension matched no category.
    pub skipped: usize,
    /// Files whose move failed.
    pub failed: usize,
}

impl OrganizeReport {
    /// The move records of this pass, in the order they happened.
    pub fn records(&self) -> impl Iterator<Item = &MoveRecord> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Moved { record, .. } => Some(record),
            _ => None,
        })
    }
}

/// Runs the classifier pass over the immediate children of `root`.
///
/// Equivalent to [`organize_with_observer`] without an observer; this is
/// the plain programmatic entry point.
pub fn organize(
    root: &Path,
    table: &CategoryTable,
    rules: &CompiledRules,
    audit: &mut AuditLog,
    mode: OrganizeMode,
) -> OrganizeResult<OrganizeReport> {
    organize_with_observer(root, table, rules, audit, mode, |_| {})
}

/// Runs the classifier pass, invoking `observer` once per outcome as it
/// happens (the CLI uses this to stream per-file console lines).
///
/// Preconditions are checked before anything is touched: a missing `root`
/// is [`OrganizeError::PathNotFound`], a non-directory is
/// [`OrganizeError::NotADirectory`]; both leave the filesystem unchanged.
///
/// The directory listing is materialized into a `Vec` before the first
/// move. Category folders created mid-pass therefore never show up as
/// source entries, and every original entry is visited exactly once no
/// matter how the platform's readdir reacts to concurrent mutation.
pub fn organize_with_observer(
    root: &Path,
    table: &CategoryTable,
    rules: &CompiledRules,
    audit: &mut AuditLog,
    mode: OrganizeMode,
    mut observer: impl FnMut(&FileOutcome),
) -> OrganizeResult<OrganizeReport> {
    if !root.exists() {
        audit.error(&format!(
            "Provided folder does not exist: {}",
            root.display()
        ));
        return Err(OrganizeError::PathNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        audit.error(&format!("Not a directory: {}", root.display()));
        return Err(OrganizeError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let apply = mode == OrganizeMode::Apply;
    if apply {
        audit.info(&format!("Organizing files in {}", root.display()));
    }

    let entries = snapshot_files(root, rules)?;

    let mut report = OrganizeReport::default();
    for path in &entries {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let outcome = match table.classify_path(path) {
            Some(category) if apply => match move_into_category(root, path, category) {
                Ok(record) => {
                    audit.info(&format!("Moved {} -> {}", file, category));
                    report.moved += 1;
                    FileOutcome::Moved { file, record }
                }
                Err(error) => {
                    audit.error(&error.to_string());
                    report.failed += 1;
                    FileOutcome::Failed { file, error }
                }
            },
            Some(category) => {
                report.moved += 1;
                FileOutcome::WouldMove {
                    file,
                    category: category.to_string(),
                }
            }
            None => {
                if apply {
                    audit.info(&format!("Skipped file: {}", file));
                }
                report.skipped += 1;
                FileOutcome::Skipped { file }
            }
        };

        observer(&outcome);
        report.outcomes.push(outcome);
    }

    if apply {
        audit.info("File organization completed");
    }

    Ok(report)
}

/// Snapshots the eligible plain files directly under `root`.
///
/// Subdirectories are dropped unconditionally (no recursion), as is
/// anything the rules veto. Filesystem-reported order is kept as-is; it is
/// not guaranteed stable across platforms.
fn snapshot_files(root: &Path, rules: &CompiledRules) -> OrganizeResult<Vec<PathBuf>> {
    let scan_failed = |source| OrganizeError::ScanFailed {
        path: root.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(root).map_err(scan_failed)? {
        let entry = entry.map_err(scan_failed)?;
        let file_type = entry.file_type().map_err(scan_failed)?;
        if !file_type.is_file() {
            continue;
        }
        let path = entry.path();
        if rules.should_process(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

/// Moves one file into `root/<category>/`, keeping its name.
///
/// The category folder is created if absent (idempotent). An existing file
/// of the same name at the destination fails the move rather than being
/// overwritten.
pub fn move_into_category(
    root: &Path,
    file_path: &Path,
    category: &str,
) -> OrganizeResult<MoveRecord> {
    let folder = root.join(category);
    fs::create_dir_all(&folder).map_err(|source| OrganizeError::FolderCreationFailed {
        path: folder.clone(),
        source,
    })?;

    let file_name = file_path
        .file_name()
        .ok_or_else(|| OrganizeError::MoveFailed {
            from: file_path.to_path_buf(),
            to: folder.clone(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
        })?;

    let destination = folder.join(file_name);
    if destination.exists() {
        return Err(OrganizeError::DestinationExists {
            from: file_path.to_path_buf(),
            to: destination,
        });
    }

    fs::rename(file_path, &destination).map_err(|source| OrganizeError::MoveFailed {
        from: file_path.to_path_buf(),
        to: destination.clone(),
        source,
    })?;

    Ok(MoveRecord {
        from: file_path.to_path_buf(),
        to: destination,
        category: category.to_string(),
    })
}
