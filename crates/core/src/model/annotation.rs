use std::ops::{Index, IndexMut};

use crate::model::{BodyPart, Coordinate, NUM_BODY_PARTS};

//
// ─── KEYPOINTS ─────────────────────────────────────────────────────────────────
//

/// One coordinate per body part, indexed in annotation order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Keypoints([Coordinate; NUM_BODY_PARTS]);

impl Keypoints {
    /// All parts unset.
    #[must_use]
    pub fn unset() -> Self {
        Self([Coordinate::UNSET; NUM_BODY_PARTS])
    }

    #[must_use]
    pub fn from_array(coords: [Coordinate; NUM_BODY_PARTS]) -> Self {
        Self(coords)
    }

    #[must_use]
    pub fn get(&self, part: BodyPart) -> Coordinate {
        self.0[part.index()]
    }

    pub fn set(&mut self, part: BodyPart, coord: Coordinate) {
        self.0[part.index()] = coord;
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyPart, Coordinate)> + '_ {
        BodyPart::ALL.into_iter().zip(self.0.iter().copied())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Coordinate] {
        &self.0
    }
}

impl Index<BodyPart> for Keypoints {
    type Output = Coordinate;

    fn index(&self, part: BodyPart) -> &Coordinate {
        &self.0[part.index()]
    }
}

impl IndexMut<BodyPart> for Keypoints {
    fn index_mut(&mut self, part: BodyPart) -> &mut Coordinate {
        &mut self.0[part.index()]
    }
}

//
// ─── COMPLETION STATUS ─────────────────────────────────────────────────────────
//

/// Value of the `done` column. Anything other than `True` is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionStatus {
    Done,
    Pending(String),
}

impl CompletionStatus {
    pub const DONE_LITERAL: &'static str = "True";

    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        if raw == Self::DONE_LITERAL {
            Self::Done
        } else {
            Self::Pending(raw.to_owned())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Done => Self::DONE_LITERAL,
            Self::Pending(raw) => raw,
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Persisted annotation for a single image.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    pub index: usize,
    pub file: String,
    pub keypoints: Keypoints,
    pub status: CompletionStatus,
}

impl AnnotationRecord {
    #[must_use]
    pub fn completed(index: usize, file: impl Into<String>, keypoints: Keypoints) -> Self {
        Self {
            index,
            file: file.into(),
            keypoints,
            status: CompletionStatus::Done,
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }
}

/// Highest record index marked done, if any. This is the resume point.
#[must_use]
pub fn last_completed_index(records: &[AnnotationRecord]) -> Option<usize> {
    records
        .iter()
        .filter(|record| record.is_done())
        .map(|record| record.index)
        .max()
}
