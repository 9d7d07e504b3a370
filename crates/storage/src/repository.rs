use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use pose_core::model::{
    AnnotationRecord, CompletionStatus, CoordinateParseError, Keypoints, SessionLogEntry,
};
use thiserror::Error;

use crate::mapping;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}, column {column}: {source}")]
    Parse {
        row: usize,
        column: &'static str,
        #[source]
        source: CoordinateParseError,
    },

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("row {row}: invalid index {raw:?}")]
    InvalidIndex { row: usize, raw: String },

    #[error("input length mismatch: {filenames} filenames, {annotations} annotations, {statuses} statuses")]
    LengthMismatch {
        filenames: usize,
        annotations: usize,
        statuses: usize,
    },

    #[error("connection error: {0}")]
    Connection(String),
}

/// Column name to raw cell text, as read from the file.
pub type RawRow = BTreeMap<String, String>;

/// Persistence contract for the annotation table.
///
/// Writes always replace the whole table; there is no per-row update.
pub trait AnnotationRepository: Send + Sync {
    /// Replace the stored table with one row per `(filename, keypoints, status)`
    /// triple, in input order. The row index is the position in the input.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::LengthMismatch` if the slices differ in length,
    /// or an I/O error if the table cannot be written.
    fn save_all(
        &self,
        filenames: &[String],
        annotations: &[Keypoints],
        statuses: &[CompletionStatus],
    ) -> Result<(), StorageError>;

    /// All rows as raw column/value maps.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the table cannot be read.
    fn read_all(&self) -> Result<Vec<RawRow>, StorageError>;

    /// All rows as typed records.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Parse` for a malformed coordinate cell and
    /// `StorageError::MissingColumn` if the header lacks a required column.
    fn records(&self) -> Result<Vec<AnnotationRecord>, StorageError>;

    /// Keypoints of every row, in row order.
    ///
    /// # Errors
    ///
    /// See [`AnnotationRepository::records`].
    fn annotations(&self) -> Result<Vec<Keypoints>, StorageError> {
        Ok(self.records()?.into_iter().map(|r| r.keypoints).collect())
    }

    /// Raw `done` cell of every row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::MissingColumn` if a row lacks the `done` column.
    fn statuses(&self) -> Result<Vec<String>, StorageError> {
        self.read_all()?
            .into_iter()
            .map(|mut row| {
                row.remove(mapping::DONE_COLUMN)
                    .ok_or_else(|| StorageError::MissingColumn(mapping::DONE_COLUMN.into()))
            })
            .collect()
    }

    /// Highest stored `index` whose `done` cell is `True`; `None` when no row is done.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidIndex` if a done row has a non-numeric index.
    fn last_completed_index(&self) -> Result<Option<usize>, StorageError> {
        let mut last = None;
        for (row_no, row) in self.read_all()?.iter().enumerate() {
            if row.get(mapping::DONE_COLUMN).map(String::as_str)
                != Some(CompletionStatus::DONE_LITERAL)
            {
                continue;
            }
            let raw = row.get(mapping::INDEX_COLUMN).cloned().unwrap_or_default();
            let index: usize = raw
                .trim()
                .parse()
                .map_err(|_| StorageError::InvalidIndex { row: row_no, raw })?;
            last = Some(last.map_or(index, |prev: usize| prev.max(index)));
        }
        Ok(last)
    }

    /// Convenience wrapper over [`AnnotationRepository::save_all`].
    ///
    /// # Errors
    ///
    /// See [`AnnotationRepository::save_all`].
    fn save_records(&self, records: &[AnnotationRecord]) -> Result<(), StorageError> {
        let filenames: Vec<String> = records.iter().map(|r| r.file.clone()).collect();
        let annotations: Vec<Keypoints> = records.iter().map(|r| r.keypoints).collect();
        let statuses: Vec<CompletionStatus> = records.iter().map(|r| r.status.clone()).collect();
        self.save_all(&filenames, &annotations, &statuses)
    }
}

/// Append-only log of finished annotation sessions.
pub trait SessionLogRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be written.
    fn append(&self, entry: &SessionLogEntry) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    fn entries(&self) -> Result<Vec<SessionLogEntry>, StorageError>;
}

pub(crate) fn check_lengths(
    filenames: &[String],
    annotations: &[Keypoints],
    statuses: &[CompletionStatus],
) -> Result<(), StorageError> {
    if filenames.len() == annotations.len() && annotations.len() == statuses.len() {
        Ok(())
    } else {
        Err(StorageError::LengthMismatch {
            filenames: filenames.len(),
            annotations: annotations.len(),
            statuses: statuses.len(),
        })
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<Mutex<Vec<AnnotationRecord>>>,
    sessions: Arc<Mutex<Vec<SessionLogEntry>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the table, e.g. with ground truth for a training run.
    #[must_use]
    pub fn with_records(records: Vec<AnnotationRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            sessions: Arc::default(),
        }
    }
}

impl AnnotationRepository for InMemoryRepository {
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
            .map(|(index, ((file, keypoints), status))| AnnotationRecord {
                index,
                file: file.clone(),
                keypoints: *keypoints,
                status: status.clone(),
            })
            .collect();

        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = rows;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<RawRow>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().map(mapping::record_to_raw_row).collect())
    }

    fn records(&self) -> Result<Vec<AnnotationRecord>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

impl SessionLogRepository for InMemoryRepository {
    fn append(&self, entry: &SessionLogEntry) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(entry.clone());
        Ok(())
    }

    fn entries(&self) -> Result<Vec<SessionLogEntry>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub annotations: Arc<dyn AnnotationRepository>,
    pub sessions: Arc<dyn SessionLogRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let annotations: Arc<dyn AnnotationRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionLogRepository> = Arc::new(repo);
        Self {
            annotations,
            sessions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_core::model::{BodyPart, Coordinate};

    fn keypoints(seed: f64) -> Keypoints {
        let mut kp = Keypoints::unset();
        for part in BodyPart::ALL {
            #[allow(clippy::cast_precision_loss)]
            let offset = part.index() as f64 / 100.0;
            kp.set(part, Coordinate::new(seed + offset, seed / 2.0 + offset));
        }
        kp
    }

    #[test]
    fn in_memory_round_trips_rows_and_statuses() {
        let repo = InMemoryRepository::new();
        let files = vec!["a.png".to_owned(), "b.png".to_owned()];
        let kps = vec![keypoints(0.1), keypoints(0.3)];
        let statuses = vec![
            CompletionStatus::Done,
            CompletionStatus::Pending("False".into()),
        ];
        repo.save_all(&files, &kps, &statuses).unwrap();

        assert_eq!(repo.annotations().unwrap(), kps);
        assert_eq!(repo.statuses().unwrap(), vec!["True", "False"]);
        assert_eq!(repo.last_completed_index().unwrap(), Some(0));

        let raw = repo.read_all().unwrap();
        assert_eq!(raw[1]["file"], "b.png");
        assert_eq!(raw[1]["index"], "1");
    }

    #[test]
    fn empty_repository_has_no_resume_point() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.last_completed_index().unwrap(), None);
        assert!(repo.read_all().unwrap().is_empty());
    }

    #[test]
    fn mismatched_inputs_are_rejected() {
        let repo = InMemoryRepository::new();
        let err = repo
            .save_all(&["a.png".to_owned()], &[], &[CompletionStatus::Done])
            .unwrap_err();
        assert!(matches!(err, StorageError::LengthMismatch { annotations: 0, .. }));
    }

    #[test]
    fn storage_handles_share_backend() {
        let storage = Storage::in_memory();
        storage
            .annotations
            .save_records(&[AnnotationRecord::completed(0, "x.jpg", Keypoints::unset())])
            .unwrap();
        assert_eq!(storage.annotations.records().unwrap().len(), 1);
        assert!(storage.sessions.entries().unwrap().is_empty());
    }
}
