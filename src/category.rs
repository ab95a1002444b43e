/// Extension-based file categorization.
///
/// A [`CategoryTable`] is an explicit, ordered list of categories, each
/// owning a set of file extensions. Lookup walks the declared order and the
/// first category claiming an extension wins, so the table's semantics do
/// not depend on any map iteration order.
///
/// # Examples
///
/// ```
/// use sortify::category::CategoryTable;
///
/// let table = CategoryTable::default();
/// assert_eq!(table.classify(".png"), Some("Images"));
/// assert_eq!(table.classify("PDF"), Some("Documents"));
/// assert_eq!(table.classify(".xyz"), None);
/// ```
use std::path::Path;

/// A named group of file extensions, mapped to a destination folder of the
/// same name.
#[derive(Debug, Clone)]
pub struct Category {
    /// The category name, used verbatim as the subdirectory name.
    pub name: String,
    /// Extensions claimed by this category, normalized to `.ext` lower-case.
    pub extensions: Vec<String>,
}

impl Category {
    /// Creates a category, normalizing every extension.
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|e| normalize_extension(e)).collect(),
        }
    }

    /// Returns true if this category claims the given normalized extension.
    fn claims(&self, normalized: &str) -> bool {
        self.extensions.iter().any(|e| e == normalized)
    }
}

/// Normalizes an extension to lower-case with a leading dot.
///
/// Accepts `"PDF"`, `".pdf"`, `" .PdF "` and friends; all become `".pdf"`.
pub fn normalize_extension(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

/// Extracts the normalized extension of a path, if it has one.
///
/// The extension is the final dot-suffix: `photo.backup.PNG` yields
/// `".png"`. Files without an extension (including bare dotfiles such as
/// `.bashrc`) yield `None` and therefore never match a category.
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// An ordered list of categories with first-match lookup.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    /// Builds a table from an ordered list of categories.
    ///
    /// Construction itself does not reject duplicate extension assignments;
    /// [`classify`](Self::classify) resolves them first-match. Tables built
    /// from configuration are validated for uniqueness at load time instead
    /// (see [`crate::config`]).
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The categories in declared order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Maps an extension to a category name.
    ///
    /// The input is normalized first, so `"PDF"`, `".pdf"` and `".PDF"` are
    /// equivalent. The first category in declared order that claims the
    /// extension wins.
    pub fn classify(&self, extension: &str) -> Option<&str> {
        let normalized = normalize_extension(extension);
        self.categories
            .iter()
            .find(|c| c.claims(&normalized))
            .map(|c| c.name.as_str())
    }

    /// Maps a file path to a category name via its extension.
    pub fn classify_path(&self, path: &Path) -> Option<&str> {
        file_extension(path).and_then(|ext| self.classify(&ext))
    }
}

impl Default for CategoryTable {
    /// The reference table: Images, Documents, Videos, Scripts, Archives.
    fn default() -> Self {
        Self::new(vec![
            Category::new("Images", &["png", "jpg", "jpeg"]),
            Category::new("Documents", &["pdf", "docx", "txt"]),
            Category::new("Videos", &["mp4", "mkv"]),
            Category::new("Scripts", &["py", "sh"]),
            Category::new("Archives", &["zip", "rar"]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("pdf"), ".pdf");
        assert_eq!(normalize_extension(".pdf"), ".pdf");
        assert_eq!(normalize_extension("PDF"), ".pdf");
        assert_eq!(normalize_extension(" .PnG "), ".png");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension(Path::new("report.PDF")), Some(".pdf".into()));
        assert_eq!(
            file_extension(Path::new("photo.backup.PNG")),
            Some(".png".into())
        );
        assert_eq!(file_extension(Path::new("README")), None);
        assert_eq!(file_extension(Path::new(".bashrc")), None);
    }

    #[test]
    fn test_default_table_reference_mappings() {
        let table = CategoryTable::default();
        assert_eq!(table.classify(".png"), Some("Images"));
        assert_eq!(table.classify(".jpg"), Some("Images"));
        assert_eq!(table.classify(".jpeg"), Some("Images"));
        assert_eq!(table.classify(".pdf"), Some("Documents"));
        assert_eq!(table.classify(".docx"), Some("Documents"));
        assert_eq!(table.classify(".txt"), Some("Documents"));
        assert_eq!(table.classify(".mp4"), Some("Videos"));
        assert_eq!(table.classify(".mkv"), Some("Videos"));
        assert_eq!(table.classify(".py"), Some("Scripts"));
        assert_eq!(table.classify(".sh"), Some("Scripts"));
        assert_eq!(table.classify(".zip"), Some("Archives"));
        assert_eq!(table.classify(".rar"), Some("Archives"));
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let table = CategoryTable::default();
        assert_eq!(table.classify(".JPG"), Some("Images"));
        assert_eq!(table.classify("Pdf"), Some("Documents"));
    }

    #[test]
    fn test_classify_unknown_extension() {
        let table = CategoryTable::default();
        assert_eq!(table.classify(".xyz"), None);
        assert_eq!(table.classify(".log"), None);
    }

    #[test]
    fn test_classify_first_match_wins() {
        // A malformed table assigning one extension twice: declared order
        // decides.
        let table = CategoryTable::new(vec![
            Category::new("First", &["dup"]),
            Category::new("Second", &["dup", "only"]),
        ]);
        assert_eq!(table.classify(".dup"), Some("First"));
        assert_eq!(table.classify(".only"), Some("Second"));
    }

    #[test]
    fn test_classify_path() {
        let table = CategoryTable::default();
        assert_eq!(
            table.classify_path(&PathBuf::from("/tmp/photo.JPG")),
            Some("Images")
        );
        assert_eq!(table.classify_path(&PathBuf::from("/tmp/README")), None);
        assert_eq!(table.classify_path(&PathBuf::from("/tmp/data.xyz")), None);
    }
}
