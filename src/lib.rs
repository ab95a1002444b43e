//! sortify - sort the files of a directory into category folders by
//! extension.
//!
//! This library scans the immediate children of a target directory, maps
//! each file's extension through an ordered category table, and moves
//! matching files into subdirectories named after their category. Moves are
//! journaled so a run can be undone, every action is recorded in a
//! timestamped audit log, and the category table plus file-selection rules
//! come from TOML configuration.

pub mod audit;
pub mod category;
pub mod cli;
pub mod config;
pub mod history;
pub mod organizer;
pub mod output;
pub mod undo;

pub use audit::{AuditLog, SharedBuffer};
pub use category::{Category, CategoryTable};
pub use config::{CompiledConfig, CompiledRules, ConfigError, OrganizerConfig};
pub use history::{MoveJournal, MoveRecord};
pub use organizer::{
    FileOutcome, OrganizeError, OrganizeMode, OrganizeReport, OrganizeResult, organize,
};
pub use undo::{UndoManager, UndoReport};

pub use cli::{Cli, Command, run_with_audit};
