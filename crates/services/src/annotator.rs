use std::sync::Arc;

use pose_core::model::{AnnotatorConfig, ImageOrder, SessionLogEntry};
use storage::repository::{AnnotationRepository, SessionLogRepository};
use storage::{BackupPolicy, CsvDatastore, CsvSessionLog, Storage, list_images};

use crate::Clock;
use crate::annotation::{AnnotationLoopService, AnnotationSession, ConfirmOutcome};
use crate::error::AnnotationError;

/// Wires CSV storage to an annotation session and owns the training to live switch.
pub struct Annotator {
    config: AnnotatorConfig,
    clock: Clock,
    workflow: AnnotationLoopService,
    session: AnnotationSession,
}

impl Annotator {
    /// Start in training when `with_training` is set and training material
    /// exists, otherwise go straight to live annotation.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError` if storage cannot be opened or images listed.
    pub fn start(
        config: AnnotatorConfig,
        clock: Clock,
        with_training: bool,
    ) -> Result<Self, AnnotationError> {
        if with_training {
            if config.has_training_material() {
                return Self::training(config, clock);
            }
            log::warn!(
                "no training material in {}, starting live annotation",
                config.training_dir().display()
            );
        }
        Self::live(config, clock)
    }

    /// Open the real annotation file (backing it up first) and resume.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError` if storage cannot be opened, the image
    /// directory cannot be read, or the stored table is malformed.
    pub fn live(config: AnnotatorConfig, clock: Clock) -> Result<Self, AnnotationError> {
        let (workflow, session) = Self::live_parts(&config, clock)?;
        Ok(Self {
            config,
            clock,
            workflow,
            session,
        })
    }

    /// Start a training run on a fresh throwaway annotation file.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError` if the ground truth is missing or malformed.
    pub fn training(config: AnnotatorConfig, clock: Clock) -> Result<Self, AnnotationError> {
        let ground_truth = CsvDatastore::open_existing(config.ground_truth_path())?;
        let scratch: Arc<dyn AnnotationRepository> =
            Arc::new(CsvDatastore::reset(config.training_annotations_path())?);
        let sessions: Arc<dyn SessionLogRepository> =
            Arc::new(CsvSessionLog::new(config.sessions_path()));
        let workflow = AnnotationLoopService::new(clock, scratch, sessions);

        let images = list_images(&config.training_image_dir(), ImageOrder::Sorted)?;
        let session = workflow.start_training(images, &ground_truth, config.tolerance())?;
        log::info!("training started with {} images", session.images().len());

        Ok(Self {
            config,
            clock,
            workflow,
            session,
        })
    }

    fn live_parts(
        config: &AnnotatorConfig,
        clock: Clock,
    ) -> Result<(AnnotationLoopService, AnnotationSession), AnnotationError> {
        let storage = Storage::csv(
            config.annotations_path(),
            config.sessions_path(),
            &BackupPolicy::CopyInto(config.backup_dir()),
            &clock,
        )?;
        let workflow = AnnotationLoopService::new(clock, storage.annotations, storage.sessions);
        let images = list_images(config.image_dir(), config.image_order())?;
        let session = workflow.resume(images, config.tolerance())?;
        Ok((workflow, session))
    }

    /// Leave training and set up live annotation. Only session state is rebuilt.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError::NotTraining` outside training, or any error
    /// from opening live storage.
    pub fn skip_training(&mut self) -> Result<(), AnnotationError> {
        if !self.session.is_training() {
            return Err(AnnotationError::NotTraining);
        }
        let (workflow, session) = Self::live_parts(&self.config, self.clock)?;
        self.workflow = workflow;
        self.session = session;
        log::info!("switched to live annotation");
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &AnnotationSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut AnnotationSession {
        &mut self.session
    }

    /// Confirm the current image through the persisting workflow.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError::Storage` if the table cannot be written.
    pub fn confirm(&mut self) -> Result<ConfirmOutcome, AnnotationError> {
        self.workflow.confirm(&mut self.session)
    }

    /// Write the session log row on exit (live sessions only).
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError` if the log cannot be written.
    pub fn finish(&self) -> Result<Option<SessionLogEntry>, AnnotationError> {
        self.workflow.finish(&self.session)
    }
}
