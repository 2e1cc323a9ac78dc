//! Source-tree scanner for TODO markers.
//!
//! Walks each configured directory under the repository root, inspects files
//! whose name ends with a configured suffix, and yields one [`TodoRecord`] per
//! line containing the marker.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::ScanSection;
use crate::errors::SyncError;

/// One marker occurrence in the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRecord {
    /// Path relative to the repository root, with a leading separator (`/src/a.cpp`).
    pub path: String,
    /// 1-based line number.
    pub line: usize,
    /// Marker plus the rest of the line, trimmed.
    pub title: String,
}

impl TodoRecord {
    /// `path:line`, as used in issue bodies and scan listings.
    pub fn location(&self) -> String {
        format!("{}:{}", self.path, self.line)
    }
}

/// Return the text from the first occurrence of `marker` to end of line, trimmed.
///
/// `None` if the line does not contain the marker.
pub fn extract_title<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.find(marker).map(|offset| line[offset..].trim())
}

pub struct Scanner {
    root: PathBuf,
    settings: ScanSection,
}

impl Scanner {
    pub fn new(root: &Path, settings: &ScanSection) -> Self {
        Self {
            root: root.to_path_buf(),
            settings: settings.clone(),
        }
    }

    /// Scan every configured directory, in configuration order.
    ///
    /// Within a directory, entries are visited sorted by file name so a run
    /// over an unchanged tree lists records in the same order.
    pub fn scan(&self) -> Result<Vec<TodoRecord>, SyncError> {
        let mut records = Vec::new();

        for dir in &self.settings.directories {
            let current = self.root.join(dir);
            if !current.is_dir() {
                tracing::debug!(dir = %current.display(), "skipping missing directory");
                continue;
            }

            for entry in WalkDir::new(&current).sort_by_file_name() {
                // Unreadable directories are skipped; only matched files are fatal.
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!(
                            path = %e.path().unwrap_or(current.as_path()).display(),
                            error = %e,
                            "skipping unreadable entry"
                        );
                        continue;
                    }
                };

                if self.is_source_file(&entry) {
                    self.scan_file(entry.path(), &mut records)?;
                }
            }
        }

        Ok(records)
    }

    /// Regular files and links to regular files. Directory links are not followed.
    fn is_source_file(&self, entry: &DirEntry) -> bool {
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        is_file && self.matches_extension(entry.path())
    }

    fn matches_extension(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy();
        self.settings
            .extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
    }

    fn scan_file(&self, path: &Path, records: &mut Vec<TodoRecord>) -> Result<(), SyncError> {
        let fs_error = |source| SyncError::Filesystem {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(fs_error)?;
        let relative = self.relative_path(path);

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(fs_error)?;
            if let Some(title) = extract_title(&line, &self.settings.marker) {
                records.push(TodoRecord {
                    path: relative.clone(),
                    line: index + 1,
                    title: title.to_string(),
                });
            }
        }

        Ok(())
    }

    fn relative_path(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => format!("{}{}", MAIN_SEPARATOR, rel.display()),
            Err(_) => path.display().to_string(),
        }
    }
}
