use csv::StringRecord;
use pose_core::model::{AnnotationRecord, BodyPart, CompletionStatus, Keypoints, NUM_BODY_PARTS};

use crate::repository::{RawRow, StorageError};

pub(crate) const INDEX_COLUMN: &str = "index";
pub(crate) const FILE_COLUMN: &str = "file";
pub(crate) const DONE_COLUMN: &str = "done";

/// `index,file,<body part columns>,done`
pub(crate) fn header() -> Vec<&'static str> {
    let mut columns = Vec::with_capacity(NUM_BODY_PARTS + 3);
    columns.push(INDEX_COLUMN);
    columns.push(FILE_COLUMN);
    columns.extend(BodyPart::ALL.iter().map(|part| part.column_name()));
    columns.push(DONE_COLUMN);
    columns
}

/// Cells of one data row, in header order.
pub(crate) fn row_cells(
    index: usize,
    file: &str,
    keypoints: &Keypoints,
    status: &CompletionStatus,
) -> Vec<String> {
    let mut cells = Vec::with_capacity(NUM_BODY_PARTS + 3);
    cells.push(index.to_string());
    cells.push(file.to_owned());
    cells.extend(keypoints.iter().map(|(_, coord)| coord.to_string()));
    cells.push(status.as_str().to_owned());
    cells
}

pub(crate) fn record_to_raw_row(record: &AnnotationRecord) -> RawRow {
    header()
        .into_iter()
        .map(str::to_owned)
        .zip(row_cells(
            record.index,
            &record.file,
            &record.keypoints,
            &record.status,
        ))
        .collect()
}

pub(crate) fn raw_row(headers: &StringRecord, row: &StringRecord) -> RawRow {
    headers
        .iter()
        .zip(row.iter())
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

/// Column positions resolved once from the header row.
#[derive(Debug, Clone)]
pub(crate) struct ColumnMap {
    index: usize,
    file: usize,
    parts: [usize; NUM_BODY_PARTS],
    done: usize,
}

impl ColumnMap {
    pub(crate) fn from_headers(headers: &StringRecord) -> Result<Self, StorageError> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| StorageError::MissingColumn(name.to_owned()))
        };

        let mut parts = [0_usize; NUM_BODY_PARTS];
        for part in BodyPart::ALL {
            parts[part.index()] = position(part.column_name())?;
        }

        Ok(Self {
            index: position(INDEX_COLUMN)?,
            file: position(FILE_COLUMN)?,
            parts,
            done: position(DONE_COLUMN)?,
        })
    }

    /// Decode a data row. `row_no` is zero-based and only used for error reporting.
    pub(crate) fn decode(
        &self,
        row: &StringRecord,
        row_no: usize,
    ) -> Result<AnnotationRecord, StorageError> {
        let cell = |pos: usize| row.get(pos).unwrap_or_default();

        let raw_index = cell(self.index);
        let index = raw_index
            .trim()
            .parse()
            .map_err(|_| StorageError::InvalidIndex {
                row: row_no,
                raw: raw_index.to_owned(),
            })?;

        let mut keypoints = Keypoints::unset();
        for part in BodyPart::ALL {
            let coord = cell(self.parts[part.index()])
                .parse()
                .map_err(|source| StorageError::Parse {
                    row: row_no,
                    column: part.column_name(),
                    source,
                })?;
            keypoints.set(part, coord);
        }

        Ok(AnnotationRecord {
            index,
            file: cell(self.file).to_owned(),
            keypoints,
            status: CompletionStatus::from_raw(cell(self.done)),
        })
    }
}
