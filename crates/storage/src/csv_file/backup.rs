use std::fs;
use std::path::{Path, PathBuf};

use pose_core::Clock;

use crate::repository::StorageError;

const BACKUP_SUFFIX: &str = "_annotations_backup.csv";

/// Copy `source` into `backup_dir` as `<timestamp>_annotations_backup.csv`.
///
/// Returns the path of the copy.
///
/// # Errors
///
/// Returns `StorageError::Io` if the directory cannot be created or the copy fails.
pub fn backup_copy(source: &Path, backup_dir: &Path, clock: &Clock) -> Result<PathBuf, StorageError> {
    fs::create_dir_all(backup_dir)?;
    let target = backup_dir.join(format!("{}{BACKUP_SUFFIX}", clock.file_stamp()));
    fs::copy(source, &target)?;
    Ok(target)
}
