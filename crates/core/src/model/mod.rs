mod annotation;
mod body_part;
mod config;
mod coordinate;
mod image_name;
mod marker;
mod session;

pub use annotation::{AnnotationRecord, CompletionStatus, Keypoints, last_completed_index};
pub use body_part::{BodyPart, NUM_BODY_PARTS};
pub use config::{
    AnnotatorConfig, AnnotatorConfigDraft, ConfigError, DEFAULT_SHUFFLE_SEED, DEFAULT_TOLERANCE,
    ImageOrder,
};
pub use coordinate::{Coordinate, CoordinateParseError};
pub use image_name::ImageName;
pub use marker::{MarkerHandle, MarkerRegistry};
pub use session::{SessionLogEntry, SessionLogError};
