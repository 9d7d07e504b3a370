//! Shared error types for the services crate.

use thiserror::Error;

use pose_core::model::SessionLogError;
use storage::StorageError;

/// Errors emitted by the annotation session and its workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnnotationError {
    #[error("no images to annotate")]
    NoImages,
    #[error("ground truth covers {ground_truth} images but training has {images}")]
    MissingGroundTruth { images: usize, ground_truth: usize },
    #[error("session is not in training mode")]
    NotTraining,
    #[error(transparent)]
    SessionLog(#[from] SessionLogError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
