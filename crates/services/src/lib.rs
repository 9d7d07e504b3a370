#![forbid(unsafe_code)]

pub mod annotation;
pub mod annotator;
pub mod error;

pub use pose_core::Clock;

pub use annotation::{
    AnnotationLoopService, AnnotationProgress, AnnotationSession, ConfirmOutcome, DragOutcome,
    PlaceOutcome, SessionPhase,
};
pub use annotator::Annotator;
pub use error::AnnotationError;
