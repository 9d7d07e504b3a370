use std::fmt;

/// Number of keypoints annotated per image.
pub const NUM_BODY_PARTS: usize = 19;

/// One of the fixed skeletal keypoints, in annotation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyPart {
    HeadTop,
    Nose,
    RightEar,
    LeftEar,
    UpperNeck,
    RightShoulder,
    RightElbow,
    RightWrist,
    UpperChest,
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    MidPelvis,
    RightPelvis,
    RightKnee,
    RightAnkle,
    LeftPelvis,
    LeftKnee,
    LeftAnkle,
}

//
// ─── STATIC TABLE ──────────────────────────────────────────────────────────────
//

struct PartSpec {
    name: &'static str,
    column: &'static str,
    parent: BodyPart,
    color: &'static str,
}

use BodyPart::{
    HeadTop, LeftAnkle, LeftEar, LeftElbow, LeftKnee, LeftPelvis, LeftShoulder, LeftWrist,
    MidPelvis, Nose, RightAnkle, RightEar, RightElbow, RightKnee, RightPelvis, RightShoulder,
    RightWrist, UpperChest, UpperNeck,
};

const TABLE: [PartSpec; NUM_BODY_PARTS] = [
    PartSpec { name: "Head top", column: "head_top", parent: HeadTop, color: "#fff142" },
    PartSpec { name: "Nose", column: "nose", parent: HeadTop, color: "#fff142" },
    PartSpec { name: "Right ear", column: "right_ear", parent: Nose, color: "#a8cf74" },
    PartSpec { name: "Left ear", column: "left_ear", parent: Nose, color: "#a8cf74" },
    PartSpec { name: "Upper neck", column: "upper_neck", parent: Nose, color: "#fff142" },
    PartSpec { name: "Right shoulder", column: "right_shoulder", parent: UpperNeck, color: "#576ab1" },
    PartSpec { name: "Right elbow", column: "right_elbow", parent: RightShoulder, color: "#5883c4" },
    PartSpec { name: "Right wrist", column: "right_wrist", parent: RightElbow, color: "#56bdef" },
    PartSpec { name: "Upper chest", column: "upper_chest", parent: UpperNeck, color: "#f19718" },
    PartSpec { name: "Left shoulder", column: "left_shoulder", parent: UpperNeck, color: "#d33592" },
    PartSpec { name: "Left elbow", column: "left_elbow", parent: LeftShoulder, color: "#d962a6" },
    PartSpec { name: "Left wrist", column: "left_wrist", parent: LeftElbow, color: "#e18abd" },
    PartSpec { name: "Mid pelvis", column: "mid_pelvis", parent: UpperChest, color: "#f19718" },
    PartSpec { name: "Right pelvis", column: "right_pelvis", parent: MidPelvis, color: "#8ac691" },
    PartSpec { name: "Right knee", column: "right_knee", parent: RightPelvis, color: "#a3d091" },
    PartSpec { name: "Right ankle", column: "right_ankle", parent: RightKnee, color: "#c0dc92" },
    PartSpec { name: "Left pelvis", column: "left_pelvis", parent: MidPelvis, color: "#7b76b7" },
    PartSpec { name: "Left knee", column: "left_knee", parent: LeftPelvis, color: "#907ab8" },
    PartSpec { name: "Left ankle", column: "left_ankle", parent: LeftKnee, color: "#a97fb9" },
];

impl BodyPart {
    /// All body parts in annotation order.
    pub const ALL: [BodyPart; NUM_BODY_PARTS] = [
        HeadTop,
        Nose,
        RightEar,
        LeftEar,
        UpperNeck,
        RightShoulder,
        RightElbow,
        RightWrist,
        UpperChest,
        LeftShoulder,
        LeftElbow,
        LeftWrist,
        MidPelvis,
        RightPelvis,
        RightKnee,
        RightAnkle,
        LeftPelvis,
        LeftKnee,
        LeftAnkle,
    ];

    /// Position of this part in annotation order (0..19).
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a part by its position, `None` if out of range.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Look up a part by its CSV column name (`right_knee`).
    #[must_use]
    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|part| part.column_name() == column)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        TABLE[self.index()].name
    }

    /// Lower snake case name used as the CSV header.
    #[must_use]
    pub fn column_name(self) -> &'static str {
        TABLE[self.index()].column
    }

    /// Skeleton parent. The head top is its own parent.
    #[must_use]
    pub fn parent(self) -> BodyPart {
        TABLE[self.index()].parent
    }

    #[must_use]
    pub fn is_root(self) -> bool {
        self.parent() == self
    }

    /// Display colour as a `#rrggbb` hex string.
    #[must_use]
    pub fn color(self) -> &'static str {
        TABLE[self.index()].color
    }

    /// Skeleton line segments as `(part, parent)` pairs, root excluded.
    pub fn skeleton_edges() -> impl Iterator<Item = (BodyPart, BodyPart)> {
        Self::ALL
            .into_iter()
            .filter(|part| !part.is_root())
            .map(|part| (part, part.parent()))
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_enum_order() {
        for (i, part) in BodyPart::ALL.iter().enumerate() {
            assert_eq!(part.index(), i);
            assert_eq!(BodyPart::from_index(i), Some(*part));
        }
        assert_eq!(BodyPart::from_index(NUM_BODY_PARTS), None);
    }

    #[test]
    fn column_names_are_snake_case_of_display_names() {
        for part in BodyPart::ALL {
            let expected = part.name().to_lowercase().replace(' ', "_");
            assert_eq!(part.column_name(), expected);
            assert_eq!(BodyPart::from_column(&expected), Some(part));
        }
    }

    #[test]
    fn hierarchy_is_consistent() {
        assert!(BodyPart::HeadTop.is_root());
        assert_eq!(BodyPart::ALL.iter().filter(|p| p.is_root()).count(), 1);

        assert_eq!(BodyPart::RightShoulder.parent(), BodyPart::UpperNeck);
        assert_eq!(BodyPart::LeftAnkle.parent(), BodyPart::LeftKnee);
        assert_eq!(BodyPart::skeleton_edges().count(), NUM_BODY_PARTS - 1);
    }

    #[test]
    fn parents_precede_children() {
        for (part, parent) in BodyPart::skeleton_edges() {
            assert!(parent.index() < part.index(), "{part} before {parent}");
        }
    }
}
