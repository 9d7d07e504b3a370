use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use pose_core::model::{
    AnnotationRecord, BodyPart, CompletionStatus, Coordinate, ImageName, Keypoints, MarkerHandle,
    MarkerRegistry, NUM_BODY_PARTS, last_completed_index,
};

use super::progress::{AnnotationProgress, SessionPhase};
use crate::error::AnnotationError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of a click that tries to place the next marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaceOutcome {
    /// Marker stored; `next` is the part to place now, `None` when all are placed.
    Placed { next: Option<BodyPart> },
    /// Training only: stored but too far from the reference, the part stays current.
    OffTarget { part: BodyPart },
    /// Wrong part, nothing left to place, or the session is finished.
    Rejected,
}

/// Result of releasing a dragged marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    Moved,
    /// Training only: the current part landed on target and the session advanced.
    Advanced { next: Option<BodyPart> },
    /// Still outside the tolerance in training.
    OffTarget,
    /// No marker exists for that part yet.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Not every part is placed; nothing changed.
    NotReady,
    /// The image at `index` was recorded and the session moved on.
    Confirmed { index: usize, phase: SessionPhase },
}

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    Live,
    Training { ground_truth: Vec<Keypoints> },
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory annotation state for an ordered list of images.
///
/// Parts of an image are placed strictly in `BodyPart` order; placed markers
/// can be dragged freely. Persistence is left to the caller.
pub struct AnnotationSession {
    mode: Mode,
    images: Vec<ImageName>,
    records: Vec<AnnotationRecord>,
    image_index: usize,
    part_index: usize,
    current: Keypoints,
    absent: BTreeSet<BodyPart>,
    off_target: Option<BodyPart>,
    markers: MarkerRegistry,
    tolerance: f64,
    start_index: usize,
    started_at: DateTime<Utc>,
    phase: SessionPhase,
}

impl AnnotationSession {
    /// Resume a live session from previously persisted records.
    ///
    /// The first image shown is the one after the last completed record; if
    /// every image is already done the session opens in `AllDone`.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError::NoImages` if `images` is empty.
    pub fn resume(
        images: Vec<ImageName>,
        mut records: Vec<AnnotationRecord>,
        tolerance: f64,
        started_at: DateTime<Utc>,
    ) -> Result<Self, AnnotationError> {
        if images.is_empty() {
            return Err(AnnotationError::NoImages);
        }
        if records.len() > images.len() {
            log::warn!(
                "{} stored rows but only {} images, dropping the excess",
                records.len(),
                images.len()
            );
            records.truncate(images.len());
        }

        let start = last_completed_index(&records)
            .map_or(0, |last| last + 1)
            .min(images.len());

        let mut session = Self::build(Mode::Live, images, records, tolerance, started_at);
        session.start_index = start;
        session.image_index = start;
        if start == session.images.len() {
            session.phase = SessionPhase::AllDone;
        } else {
            session.open_image();
        }
        log::info!(
            "resuming at image {} of {}",
            start + 1,
            session.images.len()
        );
        Ok(session)
    }

    /// Start a training run over `images`, checked against `ground_truth`.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError::NoImages` if `images` is empty and
    /// `AnnotationError::MissingGroundTruth` if some image has no reference.
    pub fn training(
        images: Vec<ImageName>,
        ground_truth: Vec<Keypoints>,
        tolerance: f64,
        started_at: DateTime<Utc>,
    ) -> Result<Self, AnnotationError> {
        if images.is_empty() {
            return Err(AnnotationError::NoImages);
        }
        if ground_truth.len() < images.len() {
            return Err(AnnotationError::MissingGroundTruth {
                images: images.len(),
                ground_truth: ground_truth.len(),
            });
        }
        let mut session = Self::build(
            Mode::Training { ground_truth },
            images,
            Vec::new(),
            tolerance,
            started_at,
        );
        session.open_image();
        Ok(session)
    }

    fn build(
        mode: Mode,
        images: Vec<ImageName>,
        records: Vec<AnnotationRecord>,
        tolerance: f64,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            mode,
            images,
            records,
            image_index: 0,
            part_index: 0,
            current: Keypoints::unset(),
            absent: BTreeSet::new(),
            off_target: None,
            markers: MarkerRegistry::new(),
            tolerance,
            start_index: 0,
            started_at,
            phase: SessionPhase::Annotating,
        }
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn is_training(&self) -> bool {
        matches!(self.mode, Mode::Training { .. })
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn images(&self) -> &[ImageName] {
        &self.images
    }

    /// Zero-based index of the image on screen. Equals the image count once finished.
    #[must_use]
    pub fn image_index(&self) -> usize {
        self.image_index
    }

    #[must_use]
    pub fn current_image(&self) -> Option<&ImageName> {
        self.images.get(self.image_index)
    }

    /// Number of parts placed on the current image (19 when all are placed).
    #[must_use]
    pub fn part_index(&self) -> usize {
        self.part_index
    }

    #[must_use]
    pub fn current_part(&self) -> Option<BodyPart> {
        BodyPart::from_index(self.part_index)
    }

    #[must_use]
    pub fn keypoints(&self) -> &Keypoints {
        &self.current
    }

    #[must_use]
    pub fn records(&self) -> &[AnnotationRecord] {
        &self.records
    }

    #[must_use]
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Part whose last placement missed the reference, if any.
    #[must_use]
    pub fn off_target(&self) -> Option<BodyPart> {
        self.off_target
    }

    #[must_use]
    pub fn is_absent(&self, part: BodyPart) -> bool {
        self.absent.contains(&part)
    }

    pub fn absent_parts(&self) -> impl Iterator<Item = BodyPart> + '_ {
        self.absent.iter().copied()
    }

    /// True if a marker is drawn for `part` on the current image.
    #[must_use]
    pub fn has_marker(&self, part: BodyPart) -> bool {
        part.index() < self.part_index || self.off_target == Some(part)
    }

    #[must_use]
    pub fn progress(&self) -> AnnotationProgress {
        AnnotationProgress {
            phase: self.phase,
            training: self.is_training(),
            image_index: self.image_index,
            total_images: self.images.len(),
            next_part: self.current_part(),
            placed: self.part_index,
        }
    }

    /// Reference coordinate for `part` on the current training image.
    #[must_use]
    pub fn ground_truth(&self, part: BodyPart) -> Option<Coordinate> {
        match &self.mode {
            Mode::Training { ground_truth } => {
                ground_truth.get(self.image_index).map(|kp| kp.get(part))
            }
            Mode::Live => None,
        }
    }

    //
    // ─── MARKERS ───────────────────────────────────────────────────────────────
    //

    /// Bind a frontend marker handle to the part it draws.
    pub fn register_marker(&mut self, handle: MarkerHandle, part: BodyPart) {
        self.markers.register(handle, part);
    }

    #[must_use]
    pub fn part_for_marker(&self, handle: MarkerHandle) -> Option<BodyPart> {
        self.markers.part_for(handle)
    }

    /// Place the marker of `part` at `coord`.
    ///
    /// Only the next unplaced part is accepted. In training the placement must
    /// also land within the tolerance of the reference on both axes.
    pub fn place_marker(&mut self, part: BodyPart, coord: Coordinate) -> PlaceOutcome {
        if self.phase.is_terminal()
            || self.part_index >= NUM_BODY_PARTS
            || part.index() != self.part_index
        {
            log::debug!("rejected placement of {part} while expecting part {}", self.part_index);
            return PlaceOutcome::Rejected;
        }

        let coord = Coordinate::clamped(coord.x, coord.y);
        self.current.set(part, coord);

        if !self.on_target(part, coord) {
            log::warn!("{part} placed off target at {coord}");
            self.off_target = Some(part);
            return PlaceOutcome::OffTarget { part };
        }

        self.off_target = None;
        self.part_index += 1;
        log::debug!("placed {part} at {coord}");
        PlaceOutcome::Placed {
            next: self.current_part(),
        }
    }

    /// Move an existing marker to `coord`, clamped to the image.
    ///
    /// In training, dragging the current part onto its reference advances the
    /// session like a placement would.
    pub fn drag_marker(&mut self, part: BodyPart, coord: Coordinate) -> DragOutcome {
        if self.phase.is_terminal() || !self.has_marker(part) {
            return DragOutcome::Rejected;
        }

        let coord = Coordinate::clamped(coord.x, coord.y);
        self.current.set(part, coord);

        if !self.is_training() || part.index() != self.part_index {
            return DragOutcome::Moved;
        }

        if self.on_target(part, coord) {
            self.off_target = None;
            self.part_index += 1;
            DragOutcome::Advanced {
                next: self.current_part(),
            }
        } else {
            self.off_target = Some(part);
            DragOutcome::OffTarget
        }
    }

    /// Drag addressed by a registered marker handle.
    pub fn drag_marker_handle(&mut self, handle: MarkerHandle, coord: Coordinate) -> DragOutcome {
        match self.markers.part_for(handle) {
            Some(part) => self.drag_marker(part, coord),
            None => DragOutcome::Rejected,
        }
    }

    /// Flip whether `part` is flagged as not visible in the image.
    ///
    /// Returns the new state. Does not affect placement order.
    pub fn toggle_absent(&mut self, part: BodyPart) -> bool {
        if self.absent.remove(&part) {
            false
        } else {
            self.absent.insert(part);
            true
        }
    }

    fn on_target(&self, part: BodyPart, coord: Coordinate) -> bool {
        match self.ground_truth(part) {
            Some(truth) => coord.within_margin(&truth, self.tolerance),
            None => true,
        }
    }

    //
    // ─── IMAGE TRANSITIONS ─────────────────────────────────────────────────────
    //

    /// Record the current image and move to the next one.
    ///
    /// A no-op returning `NotReady` until every part is placed.
    pub fn confirm(&mut self) -> ConfirmOutcome {
        match self.record_current() {
            Some(index) => {
                self.advance();
                ConfirmOutcome::Confirmed {
                    index,
                    phase: self.phase,
                }
            }
            None => ConfirmOutcome::NotReady,
        }
    }

    /// Write the current keypoints into the record set without advancing.
    ///
    /// Returns the recorded index, or `None` if parts are still missing.
    pub(crate) fn record_current(&mut self) -> Option<usize> {
        if self.phase.is_terminal() || self.part_index != NUM_BODY_PARTS {
            return None;
        }
        let index = self.image_index;
        let file = self.images[index].to_string();
        let record = AnnotationRecord::completed(index, file, self.current);

        // Keep row i aligned with image i even if earlier rows are missing.
        while self.records.len() < index {
            let pad = self.records.len();
            self.records.push(AnnotationRecord {
                index: pad,
                file: self.images[pad].to_string(),
                keypoints: Keypoints::unset(),
                status: CompletionStatus::Pending(String::new()),
            });
        }

        if index == self.records.len() {
            self.records.push(record);
        } else {
            self.records[index] = record;
        }
        Some(index)
    }

    /// Move to the next image, or into the terminal phase after the last one.
    pub fn advance(&mut self) {
        if self.image_index < self.images.len() {
            self.image_index += 1;
        }
        if self.image_index == self.images.len() {
            self.phase = if self.is_training() {
                SessionPhase::TrainingComplete
            } else {
                SessionPhase::AllDone
            };
            self.reset_image_state();
            self.part_index = NUM_BODY_PARTS;
            log::info!("all {} images confirmed", self.images.len());
            return;
        }
        self.open_image();
    }

    /// Step back one image and show it fully placed. No-op on the first image.
    pub fn go_back(&mut self) -> bool {
        if self.image_index == 0 {
            return false;
        }
        self.image_index -= 1;
        self.phase = SessionPhase::Annotating;
        self.reset_image_state();
        self.current = self
            .records
            .get(self.image_index)
            .map_or_else(Keypoints::unset, |r| r.keypoints);
        self.part_index = NUM_BODY_PARTS;
        true
    }

    /// Load the stored annotation of the current image, if it has a completed one.
    fn open_image(&mut self) {
        self.reset_image_state();
        match self.records.get(self.image_index) {
            Some(record) if record.is_done() => {
                self.current = record.keypoints;
                self.part_index = NUM_BODY_PARTS;
            }
            _ => {
                self.current = Keypoints::unset();
                self.part_index = 0;
            }
        }
    }

    fn reset_image_state(&mut self) {
        self.absent.clear();
        self.off_target = None;
    }

    /// Filenames, keypoints and statuses of every recorded image, in order.
    #[must_use]
    pub fn snapshot(&self) -> (Vec<String>, Vec<Keypoints>, Vec<CompletionStatus>) {
        let filenames = self
            .images
            .iter()
            .zip(&self.records)
            .map(|(image, _)| image.to_string())
            .collect();
        let annotations = self.records.iter().map(|r| r.keypoints).collect();
        let statuses = self.records.iter().map(|r| r.status.clone()).collect();
        (filenames, annotations, statuses)
    }
}

impl fmt::Debug for AnnotationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationSession")
            .field("training", &self.is_training())
            .field("images_len", &self.images.len())
            .field("records_len", &self.records.len())
            .field("image_index", &self.image_index)
            .field("part_index", &self.part_index)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use pose_core::time::fixed_now;

    fn images(n: usize) -> Vec<ImageName> {
        (0..n).map(|i| ImageName::new(format!("{i:03}.png"))).collect()
    }

    fn point(part: BodyPart) -> Coordinate {
        #[allow(clippy::cast_precision_loss)]
        let step = part.index() as f64;
        Coordinate::new(0.05 + step * 0.04, 0.9 - step * 0.04)
    }

    fn place_all(session: &mut AnnotationSession) {
        for part in BodyPart::ALL {
            assert!(matches!(
                session.place_marker(part, point(part)),
                PlaceOutcome::Placed { .. }
            ));
        }
    }

    fn live(n: usize) -> AnnotationSession {
        AnnotationSession::resume(images(n), Vec::new(), 0.02, fixed_now()).unwrap()
    }

    fn training(n: usize) -> AnnotationSession {
        let mut truth = Keypoints::unset();
        for part in BodyPart::ALL {
            truth.set(part, Coordinate::new(0.5, 0.5));
        }
        AnnotationSession::training(images(n), vec![truth; n], 0.02, fixed_now()).unwrap()
    }

    #[test]
    fn out_of_order_placement_is_rejected() {
        let mut session = live(2);
        let outcome = session.place_marker(BodyPart::Nose, Coordinate::new(0.4, 0.4));
        assert_eq!(outcome, PlaceOutcome::Rejected);
        assert_eq!(session.part_index(), 0);
        assert!(!session.keypoints().get(BodyPart::Nose).is_set());
    }

    #[test]
    fn in_order_placement_advances_by_one_and_clamps() {
        let mut session = live(2);
        let outcome = session.place_marker(BodyPart::HeadTop, Coordinate::new(1.4, -0.2));
        assert_eq!(
            outcome,
            PlaceOutcome::Placed {
                next: Some(BodyPart::Nose)
            }
        );
        assert_eq!(session.part_index(), 1);
        assert_eq!(session.keypoints().get(BodyPart::HeadTop), Coordinate::new(1.0, 0.0));
    }

    #[test]
    fn nothing_to_place_after_last_part() {
        let mut session = live(1);
        place_all(&mut session);
        assert_eq!(session.current_part(), None);
        assert_eq!(
            session.place_marker(BodyPart::LeftAnkle, Coordinate::new(0.1, 0.1)),
            PlaceOutcome::Rejected
        );
    }

    #[test]
    fn training_gate_uses_strict_margin() {
        let mut session = training(1);
        let miss = session.place_marker(BodyPart::HeadTop, Coordinate::new(0.53, 0.5));
        assert_eq!(miss, PlaceOutcome::OffTarget { part: BodyPart::HeadTop });
        assert_eq!(session.part_index(), 0);
        assert_eq!(session.off_target(), Some(BodyPart::HeadTop));

        let hit = session.place_marker(BodyPart::HeadTop, Coordinate::new(0.515, 0.5));
        assert!(matches!(hit, PlaceOutcome::Placed { .. }));
        assert_eq!(session.part_index(), 1);
        assert_eq!(session.off_target(), None);
    }

    #[test]
    fn training_drag_onto_target_advances() {
        let mut session = training(1);
        session.place_marker(BodyPart::HeadTop, Coordinate::new(0.9, 0.9));
        assert_eq!(
            session.drag_marker(BodyPart::HeadTop, Coordinate::new(0.6, 0.6)),
            DragOutcome::OffTarget
        );
        assert_eq!(
            session.drag_marker(BodyPart::HeadTop, Coordinate::new(0.51, 0.49)),
            DragOutcome::Advanced {
                next: Some(BodyPart::Nose)
            }
        );
        assert_eq!(session.part_index(), 1);
    }

    #[test]
    fn live_drag_moves_placed_markers_only() {
        let mut session = live(1);
        session.place_marker(BodyPart::HeadTop, Coordinate::new(0.2, 0.2));
        session.place_marker(BodyPart::Nose, Coordinate::new(0.3, 0.3));

        assert_eq!(
            session.drag_marker(BodyPart::HeadTop, Coordinate::new(-3.0, 0.25)),
            DragOutcome::Moved
        );
        assert_eq!(session.keypoints().get(BodyPart::HeadTop), Coordinate::new(0.0, 0.25));
        assert_eq!(session.part_index(), 2);

        assert_eq!(
            session.drag_marker(BodyPart::LeftAnkle, Coordinate::new(0.5, 0.5)),
            DragOutcome::Rejected
        );
    }

    #[test]
    fn drag_by_handle_uses_registry() {
        let mut session = live(1);
        session.place_marker(BodyPart::HeadTop, Coordinate::new(0.2, 0.2));
        session.register_marker(MarkerHandle::new(77), BodyPart::HeadTop);

        assert_eq!(
            session.drag_marker_handle(MarkerHandle::new(77), Coordinate::new(0.4, 0.6)),
            DragOutcome::Moved
        );
        assert_eq!(session.keypoints().get(BodyPart::HeadTop), Coordinate::new(0.4, 0.6));
        assert_eq!(
            session.drag_marker_handle(MarkerHandle::new(3), Coordinate::new(0.4, 0.6)),
            DragOutcome::Rejected
        );
    }

    #[test]
    fn absent_toggle_is_idempotent_pairwise() {
        let mut session = live(2);
        assert!(session.toggle_absent(BodyPart::LeftEar));
        assert!(session.is_absent(BodyPart::LeftEar));
        assert!(!session.toggle_absent(BodyPart::LeftEar));
        assert!(!session.is_absent(BodyPart::LeftEar));
        assert_eq!(session.part_index(), 0);
    }

    #[test]
    fn confirm_before_all_parts_is_noop() {
        let mut session = live(2);
        session.place_marker(BodyPart::HeadTop, Coordinate::new(0.2, 0.2));
        assert_eq!(session.confirm(), ConfirmOutcome::NotReady);
        assert_eq!(session.image_index(), 0);
        assert!(session.records().is_empty());
    }

    #[test]
    fn confirm_records_and_opens_next_image() {
        let mut session = live(2);
        session.toggle_absent(BodyPart::Nose);
        place_all(&mut session);
        assert_eq!(
            session.confirm(),
            ConfirmOutcome::Confirmed {
                index: 0,
                phase: SessionPhase::Annotating
            }
        );
        assert_eq!(session.image_index(), 1);
        assert_eq!(session.part_index(), 0);
        assert!(!session.keypoints().get(BodyPart::HeadTop).is_set());
        assert!(!session.is_absent(BodyPart::Nose));
        assert_eq!(session.records().len(), 1);
        assert!(session.records()[0].is_done());
        assert_eq!(session.records()[0].file, "000.png");
    }

    #[test]
    fn go_back_is_noop_at_first_image() {
        let mut session = live(3);
        assert!(!session.go_back());
        assert_eq!(session.image_index(), 0);
        assert_eq!(session.part_index(), 0);
    }

    #[test]
    fn go_back_shows_previous_image_fully_placed() {
        let mut session = live(3);
        place_all(&mut session);
        session.confirm();
        place_all(&mut session);
        session.confirm();
        assert_eq!(session.image_index(), 2);

        assert!(session.go_back());
        assert_eq!(session.image_index(), 1);
        assert_eq!(session.part_index(), NUM_BODY_PARTS);
        assert_eq!(
            session.keypoints().get(BodyPart::LeftKnee),
            point(BodyPart::LeftKnee)
        );
    }

    #[test]
    fn reconfirming_overwrites_in_place() {
        let mut session = live(2);
        place_all(&mut session);
        session.confirm();
        session.go_back();

        session.drag_marker(BodyPart::Nose, Coordinate::new(0.11, 0.22));
        assert_eq!(
            session.confirm(),
            ConfirmOutcome::Confirmed {
                index: 0,
                phase: SessionPhase::Annotating
            }
        );
        assert_eq!(session.records().len(), 1);
        assert_eq!(
            session.records()[0].keypoints.get(BodyPart::Nose),
            Coordinate::new(0.11, 0.22)
        );
    }

    #[test]
    fn last_confirm_reaches_terminal_phase() {
        let mut session = live(1);
        place_all(&mut session);
        assert_eq!(
            session.confirm(),
            ConfirmOutcome::Confirmed {
                index: 0,
                phase: SessionPhase::AllDone
            }
        );
        session.advance();
        assert_eq!(session.phase(), SessionPhase::AllDone);
        assert_eq!(session.image_index(), 1);

        assert!(session.go_back());
        assert_eq!(session.phase(), SessionPhase::Annotating);
        assert_eq!(session.image_index(), 0);
    }

    #[test]
    fn training_finishes_in_its_own_phase() {
        let mut session = training(1);
        for part in BodyPart::ALL {
            session.place_marker(part, Coordinate::new(0.5, 0.5));
        }
        session.confirm();
        assert_eq!(session.phase(), SessionPhase::TrainingComplete);
    }

    #[test]
    fn resume_starts_after_last_done_record() {
        let records = vec![
            AnnotationRecord::completed(0, "000.png", Keypoints::unset()),
            AnnotationRecord::completed(1, "001.png", Keypoints::unset()),
        ];
        let session = AnnotationSession::resume(images(4), records, 0.02, fixed_now()).unwrap();
        assert_eq!(session.start_index(), 2);
        assert_eq!(session.image_index(), 2);
        assert_eq!(session.part_index(), 0);
    }

    #[test]
    fn resume_of_finished_set_is_all_done() {
        let records = vec![AnnotationRecord::completed(0, "000.png", Keypoints::unset())];
        let session = AnnotationSession::resume(images(1), records, 0.02, fixed_now()).unwrap();
        assert_eq!(session.phase(), SessionPhase::AllDone);
    }

    #[test]
    fn confirm_pads_missing_rows() {
        let records = vec![AnnotationRecord {
            index: 2,
            file: "002.png".into(),
            keypoints: Keypoints::unset(),
            status: CompletionStatus::Done,
        }];
        let mut session = AnnotationSession::resume(images(5), records, 0.02, fixed_now()).unwrap();
        assert_eq!(session.image_index(), 3);
        place_all(&mut session);
        session.confirm();

        let (files, kps, statuses) = session.snapshot();
        assert_eq!(files.len(), 4);
        assert_eq!(kps.len(), 4);
        assert!(statuses[3].is_done());
        assert!(!statuses[1].is_done());
    }

    #[test]
    fn empty_image_list_is_an_error() {
        let err = AnnotationSession::resume(Vec::new(), Vec::new(), 0.02, fixed_now()).unwrap_err();
        assert!(matches!(err, AnnotationError::NoImages));
    }

    #[test]
    fn training_requires_ground_truth_per_image() {
        let err = AnnotationSession::training(images(2), vec![Keypoints::unset()], 0.02, fixed_now())
            .unwrap_err();
        assert!(matches!(
            err,
            AnnotationError::MissingGroundTruth {
                images: 2,
                ground_truth: 1
            }
        ));
    }
}
