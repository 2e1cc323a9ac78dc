use git2::Repository;
use std::path::{Path, PathBuf};

use crate::errors::SyncError;

/// Resolve the work-tree root of the git repository containing `start`.
///
/// Searches `start` and its parents. Bare repositories have no work-tree and
/// are rejected.
pub fn find_repo_root(start: &Path) -> Result<PathBuf, SyncError> {
    let repo = Repository::discover(start)
        .map_err(|e| SyncError::Repository(format!("{}: {}", start.display(), e.message())))?;

    let workdir = repo.workdir().ok_or_else(|| {
        SyncError::Repository(format!("{} is a bare repository", repo.path().display()))
    })?;

    // workdir() carries a trailing separator; rebuilding from components drops it.
    Ok(workdir.components().collect())
}
