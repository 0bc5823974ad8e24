//! Image name resolution from a build-context directory.

use std::fs;
use std::path::Path;

use crate::errors::WorkflowError;
use crate::identity::IdentityProvider;

/// Derive the canonical image name for a build-context directory.
///
/// The basename of the canonicalized path names the image; an authenticated
/// registry username, when present, is prefixed as `username/basename`. The
/// same derivation backs build, push, prune and run, so the tags they act on
/// always agree.
pub fn resolve_image_name(
    path: &Path,
    identity: &dyn IdentityProvider,
) -> Result<String, WorkflowError> {
    let canonical =
        fs::canonicalize(path).map_err(|_| WorkflowError::NotADirectory(path.to_path_buf()))?;
    if !canonical.is_dir() {
        return Err(WorkflowError::NotADirectory(path.to_path_buf()));
    }
    let basename = canonical
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| WorkflowError::NotADirectory(path.to_path_buf()))?;
    match identity.current_username()? {
        Some(user) => Ok(format!("{user}/{basename}")),
        None => Ok(basename),
    }
}
