//! Command-line surface and orchestration.
//!
//! The binary wires configuration, audit log and classifier together here.
//! [`run_with_audit`] is the seam the integration tests use: it takes the
//! audit sink from outside, so a test can capture the log without touching
//! a real log file.

use crate::audit::{AuditLog, DEFAULT_LOG_FILE};
use crate::config::OrganizerConfig;
use crate::history::MoveJournal;
use crate::organizer::{self, FileOutcome, OrganizeMode, OrganizeReport};
use crate::output::OutputFormatter;
use crate::undo::{RestoreOutcome, UndoManager};
use clap::Parser;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Sort the files of a directory into category folders by extension.
#[derive(Parser, Debug)]
#[command(name = "sortify", version, about)]
pub struct Cli {
    /// Directory whose files should be organized
    pub directory: PathBuf,

    /// Show what would be moved without touching anything
    #[arg(long, conflicts_with = "undo")]
    pub dry_run: bool,

    /// Move files back to where the previous run found them
    #[arg(long)]
    pub undo: bool,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to append the audit log
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

/// The operation selected on the command line.
#[derive(Debug, Clone, Copy)]
pub enum Command {
    Organize { dry_run: bool },
    Undo,
}

impl Cli {
    pub fn command(&self) -> Command {
        if self.undo {
            Command::Undo
        } else {
            Command::Organize {
                dry_run: self.dry_run,
            }
        }
    }
}

/// Runs the selected operation, opening the audit log file first.
pub fn run(cli: &Cli) -> Result<(), String> {
    let mut audit = AuditLog::open(&cli.log_file).map_err(|e| {
        format!(
            "Could not open log file {}: {}",
            cli.log_file.display(),
            e
        )
    })?;
    run_with_audit(cli.command(), &cli.directory, cli.config.as_deref(), &mut audit)
}

/// Runs the selected operation against a caller-supplied audit log.
pub fn run_with_audit(
    command: Command,
    dir_path: &Path,
    config_path: Option<&Path>,
    audit: &mut AuditLog,
) -> Result<(), String> {
    match command {
        Command::Organize { dry_run } => {
            let mode = if dry_run {
                OrganizeMode::DryRun
            } else {
                OrganizeMode::Apply
            };
            organize_directory(dir_path, config_path, audit, mode)
        }
        Command::Undo => undo_previous(dir_path, audit),
    }
}

fn organize_directory(
    base_path: &Path,
    config_path: Option<&Path>,
    audit: &mut AuditLog,
    mode: OrganizeMode,
) -> Result<(), String> {
    match mode {
        OrganizeMode::Apply => {
            OutputFormatter::info(&format!("Organizing contents of: {}", base_path.display()))
        }
        OrganizeMode::DryRun => {
            OutputFormatter::dry_run_notice(&format!(
                "Analyzing contents of: {}",
                base_path.display()
            ))
        }
    }

    let config = OrganizerConfig::load(config_path)
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let compiled = config
        .compile()
        .map_err(|e| format!("Error in configuration: {}", e))?;

    let report = organizer::organize_with_observer(
        base_path,
        &compiled.table,
        &compiled.rules,
        audit,
        mode,
        print_outcome,
    )
    .map_err(|e| e.to_string())?;

    if report.outcomes.is_empty() {
        OutputFormatter::plain("No files found to organize.");
        return Ok(());
    }

    if matches!(mode, OrganizeMode::Apply) {
        save_journal(base_path, &report);
    }

    print_summary(&report);

    if report.failed > 0 {
        OutputFormatter::warning("Some files could not be organized. Review the errors above.");
    }

    match mode {
        OrganizeMode::Apply => OutputFormatter::success("File organization completed!"),
        OrganizeMode::DryRun => {
            OutputFormatter::success("Dry run complete. No files were modified.");
            OutputFormatter::plain(&format!(
                "Run 'sortify {}' (without --dry-run) to apply.",
                base_path.display()
            ));
        }
    }

    Ok(())
}

/// One console line per processed file, as the pass reaches it.
fn print_outcome(outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Moved { file, record } => {
            OutputFormatter::success(&format!("{} moved to {}/", file, record.category));
        }
        FileOutcome::WouldMove { file, category } => {
            OutputFormatter::plain(&format!(" - {} → would move to {}/", file, category));
        }
        FileOutcome::Skipped { file } => {
            OutputFormatter::plain(&format!(" - {} skipped (no matching category)", file));
        }
        FileOutcome::Failed { file, error } => {
            OutputFormatter::error(&format!("{}: {}", file, error));
        }
    }
}

/// Records this run's moves for `--undo`. A run that moved nothing leaves
/// the previous journal in place so it stays undoable.
fn save_journal(base_path: &Path, report: &OrganizeReport) {
    let mut journal = MoveJournal::new(base_path.to_path_buf());
    for record in report.records() {
        journal.record(record.clone());
    }
    if journal.is_empty() {
        return;
    }

    match journal.save(base_path) {
        Ok(()) => OutputFormatter::plain(&format!(
            "History saved. Use 'sortify {} --undo' to revert.",
            base_path.display()
        )),
        Err(e) => OutputFormatter::warning(&format!("Could not save history: {}", e)),
    }
}

fn print_summary(report: &OrganizeReport) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for outcome in &report.outcomes {
        match outcome {
            FileOutcome::Moved { record, .. } => *counts.entry(&record.category).or_insert(0) += 1,
            FileOutcome::WouldMove { category, .. } => *counts.entry(category).or_insert(0) += 1,
            _ => {}
        }
    }

    let mut rows: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    if !rows.is_empty() {
        OutputFormatter::summary_table(&rows, report.moved);
    }
    OutputFormatter::plain(&format!(
        "Moved: {}   Skipped: {}   Failed: {}",
        report.moved, report.skipped, report.failed
    ));
}

fn undo_previous(base_path: &Path, audit: &mut AuditLog) -> Result<(), String> {
    OutputFormatter::info("Undoing previous organization...");

    if !base_path.exists() {
        audit.error(&format!(
            "Provided folder does not exist: {}",
            base_path.display()
        ));
        return Err(format!("Folder does not exist: {}", base_path.display()));
    }

    let journal = MoveJournal::load(base_path)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("No previous run to undo in {}", base_path.display()))?;

    let bar = OutputFormatter::progress_bar(journal.moves.len() as u64);
    let report = UndoManager::apply(&journal, audit, |outcome| {
        if let RestoreOutcome::Restored { file } = outcome {
            bar.set_message(file.clone());
        }
        bar.inc(1);
    });
    bar.finish_and_clear();

    OutputFormatter::plain(&format!("Restored: {}", report.restored));
    for (path, reason) in &report.skipped {
        OutputFormatter::warning(&format!("Skipped {}: {}", path.display(), reason));
    }
    for (path, reason) in &report.failed {
        OutputFormatter::error(&format!("Failed {}: {}", path.display(), reason));
    }

    if report.is_clean() {
        if let Err(e) = MoveJournal::delete(base_path) {
            OutputFormatter::warning(&format!("Could not delete history: {}", e));
        }
        OutputFormatter::success("Undo complete!");
    } else {
        OutputFormatter::warning(
            "Undo finished with problems; history was kept so it can be retried.",
        );
    }

    Ok(())
}
