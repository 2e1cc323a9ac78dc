//! README/example consistency check.
//!
//! Verifies that an example source file appears verbatim inside the README.
//! Shares nothing with the reconciler beyond the repository root.

use std::path::Path;

use crate::errors::SyncError;

pub const DEFAULT_EXAMPLE: &str = "examples/main.cpp";
pub const DEFAULT_README: &str = "README.md";

fn read(path: &Path) -> Result<String, SyncError> {
    std::fs::read_to_string(path).map_err(|source| SyncError::Filesystem {
        path: path.to_path_buf(),
        source,
    })
}

/// True if the full text of `example` is a substring of `readme`.
pub fn example_in_readme(example: &Path, readme: &Path) -> Result<bool, SyncError> {
    let example_text = read(example)?;
    let readme_text = read(readme)?;
    Ok(readme_text.contains(&example_text))
}
