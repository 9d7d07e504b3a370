mod progress;
mod service;
mod workflow;

// Public API of the annotation subsystem.
pub use crate::error::AnnotationError;
pub use progress::{AnnotationProgress, SessionPhase};
pub use service::{AnnotationSession, ConfirmOutcome, DragOutcome, PlaceOutcome};
pub use workflow::AnnotationLoopService;
