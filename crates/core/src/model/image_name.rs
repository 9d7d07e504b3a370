use std::fmt;

/// Filename of an image in the annotation list.
///
/// Frames extracted from videos are named `<video>[<frame>]...`, e.g.
/// `clip_07[0042].png`; the accessors return `None` for other names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageName(String);

impl ImageName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the first `[`.
    #[must_use]
    pub fn video_name(&self) -> Option<&str> {
        self.0.split_once('[').map(|(video, _)| video)
    }

    /// The four digits right after the first `[`.
    #[must_use]
    pub fn frame_number(&self) -> Option<u32> {
        let (_, rest) = self.0.split_once('[')?;
        let digits = rest.get(..4)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ImageName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for ImageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_video_frames() {
        let name = ImageName::new("clip_07[0042].png");
        assert_eq!(name.video_name(), Some("clip_07"));
        assert_eq!(name.frame_number(), Some(42));
    }

    #[test]
    fn plain_names_have_no_frame() {
        let name = ImageName::new("portrait.jpg");
        assert_eq!(name.video_name(), None);
        assert_eq!(name.frame_number(), None);
        assert_eq!(ImageName::new("a[12].png").frame_number(), None);
    }
}
