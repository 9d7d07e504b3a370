#![forbid(unsafe_code)]

pub mod csv_file;
pub mod images;
mod mapping;
pub mod repository;
pub mod session_log;

pub use csv_file::{BackupPolicy, CsvDatastore};
pub use images::list_images;
pub use repository::{
    AnnotationRepository, InMemoryRepository, RawRow, SessionLogRepository, Storage, StorageError,
};
pub use session_log::CsvSessionLog;
