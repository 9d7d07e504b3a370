use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pose_core::Clock;
use pose_core::model::{AnnotationRecord, CompletionStatus, Keypoints};

use crate::mapping::{self, ColumnMap};
use crate::repository::{
    AnnotationRepository, RawRow, SessionLogRepository, Storage, StorageError, check_lengths,
};
use crate::session_log::CsvSessionLog;

mod backup;

pub use backup::backup_copy;

/// What to do with an annotation file that already exists when opening it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupPolicy {
    /// Leave the file alone (training runs, ground truth).
    Skip,
    /// Copy it into the given directory before any write.
    CopyInto(PathBuf),
}

/// Annotation table stored as a comma-separated file.
#[derive(Debug, Clone)]
pub struct CsvDatastore {
    path: PathBuf,
}

impl CsvDatastore {
    /// Open the table at `path`, creating it with only the header row if absent.
    ///
    /// An existing file is backed up first when `backup` asks for it. A
    /// zero-length file gets its header back after the backup.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file, its parent directory, or the
    /// backup cannot be created.
    pub fn initialize(
        path: impl Into<PathBuf>,
        backup: &BackupPolicy,
        clock: &Clock,
    ) -> Result<Self, StorageError> {
        let store = Self { path: path.into() };

        if !store.path.is_file() {
            log::info!("creating annotation file {}", store.path.display());
            store.write_rows(std::iter::empty())?;
            return Ok(store);
        }

        if let BackupPolicy::CopyInto(dir) = backup {
            let copy = backup_copy(&store.path, dir, clock)?;
            log::info!("backed up {} to {}", store.path.display(), copy.display());
        }
        if fs::metadata(&store.path)?.len() == 0 {
            log::warn!("{} is empty, rewriting the header", store.path.display());
            store.write_rows(std::iter::empty())?;
        }

        Ok(store)
    }

    /// Remove any existing table at `path` and start from a header-only file.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the old file cannot be removed or the new one written.
    pub fn reset(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let store = Self { path: path.into() };
        if store.path.is_file() {
            fs::remove_file(&store.path)?;
        }
        store.write_rows(std::iter::empty())?;
        Ok(store)
    }

    /// Open an existing table without creating or backing it up.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` with `NotFound` if the file does not exist.
    pub fn open_existing(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if !path.is_file() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("annotation file not found: {}", path.display()),
            )));
        }
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_rows<I>(&self, rows: I) -> Result<(), StorageError>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(mapping::header())?;
        for row in rows {
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn reader(&self) -> Result<csv::Reader<fs::File>, StorageError> {
        Ok(csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?)
    }
}

impl AnnotationRepository for CsvDatastore {
    fn save_all(
        &self,
        filenames: &[String],
        annotations: &[Keypoints],
        statuses: &[CompletionStatus],
    ) -> Result<(), StorageError> {
        check_lengths(filenames, annotations, statuses)?;
        let rows = filenames
            .iter()
            .zip(annotations)
            .zip(statuses)
            .enumerate()
            .map(|(index, ((file, keypoints), status))| {
                mapping::row_cells(index, file, keypoints, status)
            });
        self.write_rows(rows)?;
        log::debug!("saved {} rows to {}", filenames.len(), self.path.display());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<RawRow>, StorageError> {
        let mut reader = self.reader()?;
        let headers = reader.headers()?.clone();
        reader
            .records()
            .map(|row| -> Result<RawRow, StorageError> { Ok(mapping::raw_row(&headers, &row?)) })
            .collect()
    }

    fn records(&self) -> Result<Vec<AnnotationRecord>, StorageError> {
        let mut reader = self.reader()?;
        let headers = reader.headers()?;
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        let columns = ColumnMap::from_headers(headers)?;
        reader
            .records()
            .enumerate()
            .map(|(row_no, row)| columns.decode(&row?, row_no))
            .collect()
    }
}

impl Storage {
    /// Build a `Storage` backed by CSV files.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the annotation file cannot be created or backed up.
    pub fn csv(
        annotations_path: impl Into<PathBuf>,
        sessions_path: impl Into<PathBuf>,
        backup: &BackupPolicy,
        clock: &Clock,
    ) -> Result<Self, StorageError> {
        let annotations: Arc<dyn AnnotationRepository> =
            Arc::new(CsvDatastore::initialize(annotations_path, backup, clock)?);
        let sessions: Arc<dyn SessionLogRepository> = Arc::new(CsvSessionLog::new(sessions_path));
        Ok(Self {
            annotations,
            sessions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_core::time::fixed_clock;

    #[test]
    fn creates_header_only_file_in_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("annotations.csv");
        let store = CsvDatastore::initialize(&path, &BackupPolicy::Skip, &fixed_clock()).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("index,file,head_top,nose,"));
        assert!(text.trim_end().ends_with(",left_ankle,done"));
        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(store.last_completed_index().unwrap(), None);
    }

    #[test]
    fn zero_length_file_is_backed_up_then_given_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.csv");
        fs::write(&path, b"").unwrap();
        let backups = dir.path().join("backups");

        let store = CsvDatastore::initialize(
            &path,
            &BackupPolicy::CopyInto(backups.clone()),
            &fixed_clock(),
        )
        .unwrap();

        assert_eq!(fs::read_dir(&backups).unwrap().count(), 1);
        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(store.records().unwrap().is_empty());
    }

    #[test]
    fn reset_discards_previous_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training.csv");
        let store = CsvDatastore::initialize(&path, &BackupPolicy::Skip, &fixed_clock()).unwrap();
        store
            .save_records(&[AnnotationRecord::completed(0, "a.png", Keypoints::unset())])
            .unwrap();

        let store = CsvDatastore::reset(&path).unwrap();
        assert!(store.records().unwrap().is_empty());
    }

    #[test]
    fn open_existing_requires_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvDatastore::open_existing(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, StorageError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn coordinate_cells_are_quoted_tuples() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvDatastore::reset(dir.path().join("a.csv")).unwrap();
        store
            .save_records(&[AnnotationRecord::completed(0, "a.png", Keypoints::unset())])
            .unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        let data = text.lines().nth(1).unwrap();
        assert!(data.starts_with("0,a.png,\"(0.0, 0.0)\","));
        assert!(data.ends_with(",True"));
    }
}
