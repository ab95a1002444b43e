//! Configuration loading for the category table and file-selection rules.
//!
//! The category table is deliberately external configuration rather than a
//! hard-coded constant, and it is an *ordered* array of tables so that
//! first-match semantics are visible in the file format itself:
//!
//! ```toml
//! [[categories]]
//! name = "Images"
//! extensions = ["png", "jpg", "jpeg"]
//!
//! [[categories]]
//! name = "Documents"
//! extensions = ["pdf", "docx", "txt"]
//!
//! [rules]
//! include_hidden = false
//!
//! [rules.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["*.tmp"]
//! extensions = ["part"]
//! regex = []
//!
//! [rules.include]
//! patterns = []
//! ```
//!
//! Assigning one extension to two categories is rejected when the
//! configuration is compiled, before any file is touched.

use crate::category::{Category, CategoryTable, normalize_extension};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading or compiling configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the explicitly requested path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// A category was declared without a name.
    UnnamedCategory,
    /// A category was declared without any extensions.
    EmptyCategory(String),
    /// The same extension is assigned to two categories.
    DuplicateExtension {
        extension: String,
        first: String,
        second: String,
    },
    /// Invalid glob pattern in the rules section.
    InvalidGlobPattern(String),
    /// Invalid regex pattern in the rules section.
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::UnnamedCategory => write!(f, "Category declared without a name"),
            ConfigError::EmptyCategory(name) => {
                write!(f, "Category '{}' declares no extensions", name)
            }
            ConfigError::DuplicateExtension {
                extension,
                first,
                second,
            } => {
                write!(
                    f,
                    "Extension '{}' is assigned to both '{}' and '{}'",
                    extension, first, second
                )
            }
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration: the category table plus file-selection rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// Ordered category declarations. First match wins on lookup.
    #[serde(default)]
    pub categories: Vec<CategoryDecl>,

    /// Which files are considered for organization at all.
    #[serde(default)]
    pub rules: RuleSet,
}

/// One `[[categories]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDecl {
    pub name: String,
    pub extensions: Vec<String>,
}

/// File-selection rules: which directory entries the organizer looks at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    /// Whether dotfiles are eligible for organization. Defaults to false so
    /// the tool's own journal and rc files stay put.
    #[serde(default)]
    pub include_hidden: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    #[serde(default)]
    pub include: IncludeRules,
}

/// Exclusion rules. A file matching any of these is left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames, e.g. `"Thumbs.db"`.
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns, e.g. `"*.tmp"`.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions, with or without the leading dot.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the filename.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Whitelist rules that override every exclusion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl OrganizerConfig {
    /// Loads configuration, falling back through the usual locations.
    ///
    /// Resolution order:
    /// 1. the explicitly supplied path, if any
    /// 2. `./.sortifyrc.toml`
    /// 3. `$HOME/.config/sortify/config.toml`
    /// 4. built-in defaults (the reference category table, default rules)
    ///
    /// An explicitly supplied path that cannot be read is an error; the
    /// fallback locations are simply skipped when absent.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local = PathBuf::from(".sortifyrc.toml");
        if local.exists() {
            return Self::load_from_file(&local);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sortify")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;

        // A config file that only tweaks rules still gets the full table.
        if config.categories.is_empty() {
            return Ok(Self {
                categories: default_categories(),
                rules: config.rules,
            });
        }

        Ok(config)
    }

    /// Validates the declarations and compiles them into runtime structures.
    pub fn compile(self) -> Result<CompiledConfig, ConfigError> {
        let table = build_table(&self.categories)?;
        let rules = CompiledRules::new(self.rules)?;
        Ok(CompiledConfig { table, rules })
    }
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            rules: RuleSet::default(),
        }
    }
}

/// The reference table as declarations, mirroring [`CategoryTable::default`].
fn default_categories() -> Vec<CategoryDecl> {
    CategoryTable::default()
        .categories()
        .iter()
        .map(|c| CategoryDecl {
            name: c.name.clone(),
            extensions: c.extensions.clone(),
        })
        .collect()
}

/// Validates category declarations and builds the ordered table.
///
/// Rejects unnamed categories, categories without extensions, and any
/// extension assigned to two different categories. A repeat of the same
/// extension inside one category is collapsed silently.
fn build_table(decls: &[CategoryDecl]) -> Result<CategoryTable, ConfigError> {
    let mut owner: HashMap<String, String> = HashMap::new();
    let mut categories = Vec::with_capacity(decls.len());

    for decl in decls {
        if decl.name.trim().is_empty() {
            return Err(ConfigError::UnnamedCategory);
        }
        if decl.extensions.is_empty() {
            return Err(ConfigError::EmptyCategory(decl.name.clone()));
        }

        let mut extensions = Vec::with_capacity(decl.extensions.len());
        for raw in &decl.extensions {
            let ext = normalize_extension(raw);
            match owner.get(&ext) {
                Some(first) if first != &decl.name => {
                    return Err(ConfigError::DuplicateExtension {
                        extension: ext,
                        first: first.clone(),
                        second: decl.name.clone(),
                    });
                }
                Some(_) => continue,
                None => {
                    owner.insert(ext.clone(), decl.name.clone());
                    extensions.push(ext);
                }
            }
        }

        categories.push(Category {
            name: decl.name.clone(),
            extensions,
        });
    }

    Ok(CategoryTable::new(categories))
}

/// The result of compiling an [`OrganizerConfig`].
pub struct CompiledConfig {
    pub table: CategoryTable,
    pub rules: CompiledRules,
}

/// Pre-compiled file-selection rules.
///
/// Globs and regexes are compiled once here so that matching each directory
/// entry is a set lookup plus a scan over the compiled patterns.
pub struct CompiledRules {
    include_hidden: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_globs: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_globs: Vec<Pattern>,
}

impl CompiledRules {
    fn new(rules: RuleSet) -> Result<Self, ConfigError> {
        let exclude_globs = compile_globs(&rules.exclude.patterns)?;
        let include_globs = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include_hidden: rules.include_hidden,
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect(),
            exclude_globs,
            exclude_regexes,
            include_globs,
        })
    }

    /// Everything eligible, nothing excluded.
    pub fn permissive() -> Self {
        Self {
            include_hidden: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_globs: Vec::new(),
            exclude_regexes: Vec::new(),
            include_globs: Vec::new(),
        }
    }

    /// Decides whether a directory entry is eligible for organization.
    ///
    /// Include globs act as a whitelist and win over every exclusion; after
    /// that, hidden files, excluded filenames, extensions, globs and regexes
    /// each veto the entry in turn.
    pub fn should_process(&self, path: &Path) -> bool {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.include_globs.iter().any(|p| p.matches_path(path)) {
            return true;
        }

        if !self.include_hidden && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = crate::category::file_extension(path)
            && self.exclude_extensions.contains(&ext)
        {
            return false;
        }

        if self.exclude_globs.iter().any(|p| p.matches_path(path)) {
            return false;
        }

        if self.exclude_regexes.iter().any(|r| r.is_match(&file_name)) {
            return false;
        }

        true
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}
