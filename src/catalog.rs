use std::fs;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::errors::AnnotationError;

/// One file discovered by a catalog scan.
///
/// Both path forms are derived from the same directory entry, so they always
/// name the same file even when the directory is mutated between scans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    /// The catalogued directory as supplied by the caller, joined with the
    /// file name (relative when the caller passed a relative directory).
    pub relative_path: PathBuf,
    /// Absolute form of the same entry.
    pub absolute_path: PathBuf,
}

impl CatalogEntry {
    /// Bare file name of the entry.
    pub fn file_name(&self) -> &str {
        self.relative_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }
}

/// Lists the files directly under one dataset directory.
///
/// Ordering is the host's directory-enumeration order, not lexicographic.
/// A single scan produces both path forms of every entry; callers never pair
/// separate relative and absolute listings positionally.
pub struct PathCatalog {
    root: PathBuf,
    follow_links: bool,
}

impl PathCatalog {
    /// Create a catalog over `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
        }
    }

    /// Configure symlink traversal.
    pub fn with_follow_symlinks(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Scan the directory once and return one entry per file, in
    /// enumeration order. Read-only; fails with [`AnnotationError::NotFound`]
    /// when the directory is missing.
    pub fn list(&self) -> Result<Vec<CatalogEntry>, AnnotationError> {
        if !self.root.is_dir() {
            return Err(AnnotationError::NotFound(self.root.clone()));
        }
        let absolute_root = fs::canonicalize(&self.root)?;
        let mut walker = WalkDir::new(&self.root).min_depth(1).max_depth(1);
        if self.follow_links {
            walker = walker.follow_links(true);
        }
        let mut entries = Vec::new();
        for entry in walker {
            let entry = entry.map_err(io_error)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_os_string();
            entries.push(CatalogEntry {
                relative_path: self.root.join(&name),
                absolute_path: absolute_root.join(&name),
            });
        }
        Ok(entries)
    }
}

fn io_error(err: walkdir::Error) -> AnnotationError {
    AnnotationError::Io(err.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::tempdir;

    #[test]
    fn list_fails_on_missing_directory() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("absent");
        let result = PathCatalog::new(&missing).list();
        assert!(matches!(result, Err(AnnotationError::NotFound(path)) if path == missing));
    }

    #[test]
    fn list_pairs_relative_and_absolute_forms() {
        let temp = tempdir().unwrap();
        for name in ["0000.jpg", "0001.jpg", "0002.jpg"] {
            fs::write(temp.path().join(name), b"img").unwrap();
        }
        fs::create_dir(temp.path().join("nested")).unwrap();

        let entries = PathCatalog::new(temp.path()).list().unwrap();
        assert_eq!(entries.len(), 3, "subdirectories are not catalogued");
        for entry in &entries {
            assert!(entry.absolute_path.is_absolute());
            assert_eq!(
                entry.relative_path.file_name(),
                entry.absolute_path.file_name()
            );
            assert!(entry.absolute_path.is_file());
        }
        let names: HashSet<&str> = entries.iter().map(CatalogEntry::file_name).collect();
        assert_eq!(names.len(), 3);
    }
}
