use pose_core::model::BodyPart;

/// Where a session currently is in its image sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Annotating,
    /// Every image of a live session is confirmed.
    AllDone,
    /// Every training image is confirmed; live annotation can start.
    TrainingComplete,
}

impl SessionPhase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Annotating)
    }
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationProgress {
    pub phase: SessionPhase,
    pub training: bool,
    /// Zero-based index of the image on screen.
    pub image_index: usize,
    pub total_images: usize,
    /// Next part to place; `None` once every part of the image is placed.
    pub next_part: Option<BodyPart>,
    pub placed: usize,
}

impl AnnotationProgress {
    /// Prompt shown under the image.
    ///
    /// Live sessions show the next part and the image position; training only
    /// names the next part.
    #[must_use]
    pub fn status_line(&self) -> String {
        match self.phase {
            SessionPhase::AllDone => return "Annotation completed!".to_owned(),
            SessionPhase::TrainingComplete => return "Training completed!".to_owned(),
            SessionPhase::Annotating => {}
        }

        let position = format!("Image: {} out of {}", self.image_index + 1, self.total_images);
        match (self.training, self.next_part) {
            (true, Some(part)) => part.name().to_owned(),
            (true, None) => String::new(),
            (false, Some(part)) => format!("{}\n{position}", part.name()),
            (false, None) => position,
        }
    }
}
