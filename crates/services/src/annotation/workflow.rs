use std::sync::Arc;

use pose_core::model::{ImageName, SessionLogEntry};
use storage::repository::{AnnotationRepository, SessionLogRepository};

use super::service::{AnnotationSession, ConfirmOutcome};
use crate::Clock;
use crate::error::AnnotationError;

/// Orchestrates session start, persisted confirms and the exit log.
#[derive(Clone)]
pub struct AnnotationLoopService {
    clock: Clock,
    annotations: Arc<dyn AnnotationRepository>,
    sessions: Arc<dyn SessionLogRepository>,
}

impl AnnotationLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        annotations: Arc<dyn AnnotationRepository>,
        sessions: Arc<dyn SessionLogRepository>,
    ) -> Self {
        Self {
            clock,
            annotations,
            sessions,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Load every stored record and resume after the last completed image.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError::Storage` if the stored table cannot be parsed,
    /// or `AnnotationError::NoImages` for an empty image list.
    pub fn resume(
        &self,
        images: Vec<ImageName>,
        tolerance: f64,
    ) -> Result<AnnotationSession, AnnotationError> {
        let records = self.annotations.records()?;
        AnnotationSession::resume(images, records, tolerance, self.clock.now())
    }

    /// Start a training run; `ground_truth` holds the reference keypoints.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError` if the reference cannot be read or does not
    /// cover every image.
    pub fn start_training(
        &self,
        images: Vec<ImageName>,
        ground_truth: &dyn AnnotationRepository,
        tolerance: f64,
    ) -> Result<AnnotationSession, AnnotationError> {
        let reference = ground_truth.annotations()?;
        AnnotationSession::training(images, reference, tolerance, self.clock.now())
    }

    /// Confirm the current image, persist the whole set, then advance.
    ///
    /// Nothing is written while parts are still missing. If the write fails
    /// the session stays on the confirmed image.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError::Storage` if the table cannot be written.
    pub fn confirm(
        &self,
        session: &mut AnnotationSession,
    ) -> Result<ConfirmOutcome, AnnotationError> {
        let Some(index) = session.record_current() else {
            return Ok(ConfirmOutcome::NotReady);
        };

        let (filenames, annotations, statuses) = session.snapshot();
        self.annotations.save_all(&filenames, &annotations, &statuses)?;
        log::debug!("confirmed image {} ({} rows stored)", index, filenames.len());

        session.advance();
        Ok(ConfirmOutcome::Confirmed {
            index,
            phase: session.phase(),
        })
    }

    /// Append the session log row for a live session. Training writes nothing.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError` if the resume point cannot be read or the log
    /// cannot be written.
    pub fn finish(
        &self,
        session: &AnnotationSession,
    ) -> Result<Option<SessionLogEntry>, AnnotationError> {
        if session.is_training() {
            return Ok(None);
        }
        let last = self.annotations.last_completed_index()?;
        let entry = SessionLogEntry::from_progress(
            session.start_index(),
            last,
            session.started_at(),
            self.clock.now(),
        )?;
        self.sessions.append(&entry)?;
        log::info!(
            "session finished: {} images in {:.0}s",
            entry.images_annotated(),
            entry.seconds_spent()
        );
        Ok(Some(entry))
    }
}
