use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use pose_core::model::SessionLogEntry;

use crate::repository::{SessionLogRepository, StorageError};

const HEADER: [&str; 3] = ["Number of images annotated", "Seconds spent", "Date"];

/// Session log kept as an append-only CSV file.
#[derive(Debug, Clone)]
pub struct CsvSessionLog {
    path: PathBuf,
}

impl CsvSessionLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionLogRepository for CsvSessionLog {
    fn append(&self, entry: &SessionLogEntry) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let existing = match fs::read(&self.path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let needs_header = existing.as_ref().is_none_or(Vec::is_empty);
        // Older logs end without a trailing newline.
        if let Some(bytes) = &existing {
            if !bytes.is_empty() && !bytes.ends_with(b"\n") {
                file.write_all(b"\n")?;
            }
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer.write_record(HEADER)?;
        }
        writer.serialize(entry)?;
        writer.flush()?;
        Ok(())
    }

    fn entries(&self) -> Result<Vec<SessionLogEntry>, StorageError> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        reader
            .deserialize()
            .map(|row| row.map_err(StorageError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pose_core::time::fixed_now;

    fn entry(start: usize, last: Option<usize>, secs: i64) -> SessionLogEntry {
        SessionLogEntry::from_progress(start, last, fixed_now(), fixed_now() + Duration::seconds(secs))
            .unwrap()
    }

    #[test]
    fn writes_header_once_then_appends() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvSessionLog::new(dir.path().join("sessions.txt"));

        log.append(&entry(0, Some(2), 30)).unwrap();
        log.append(&entry(3, Some(4), 12)).unwrap();

        let text = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Number of images annotated,Seconds spent,Date");
        assert_eq!(lines[1], "3,30.0,2023-11-14");
        assert_eq!(lines.len(), 3);

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].images_annotated(), 2);
    }

    #[test]
    fn continues_log_without_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.txt");
        fs::write(&path, "Number of images annotated,Seconds spent,Date\n1,5.5,2023-01-02").unwrap();

        CsvSessionLog::new(&path).append(&entry(0, Some(0), 1)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("1,5.5,2023-01-02\n1,1.0,2023-11-14"));
    }

    #[test]
    fn missing_log_has_no_entries() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CsvSessionLog::new(dir.path().join("none.txt")).entries().unwrap().is_empty());
    }
}
