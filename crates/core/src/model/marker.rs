use std::collections::HashMap;
use std::fmt;

use crate::model::BodyPart;

/// Opaque identifier a frontend assigns to a drawn marker.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for MarkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MarkerHandle({})", self.0)
    }
}

impl fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owned mapping from marker handles to the body part they represent.
///
/// Handles are whatever the frontend allocates; the registry never derives a
/// part from the numeric value of a handle.
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    by_handle: HashMap<MarkerHandle, BodyPart>,
    by_part: HashMap<BodyPart, MarkerHandle>,
}

impl MarkerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handle` to `part`, replacing any previous binding of either side.
    pub fn register(&mut self, handle: MarkerHandle, part: BodyPart) {
        if let Some(old_part) = self.by_handle.insert(handle, part) {
            self.by_part.remove(&old_part);
        }
        if let Some(old_handle) = self.by_part.insert(part, handle) {
            if old_handle != handle {
                self.by_handle.remove(&old_handle);
            }
        }
    }

    #[must_use]
    pub fn part_for(&self, handle: MarkerHandle) -> Option<BodyPart> {
        self.by_handle.get(&handle).copied()
    }

    #[must_use]
    pub fn handle_for(&self, part: BodyPart) -> Option<MarkerHandle> {
        self.by_part.get(&part).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_handle.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_handle.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_handle.clear();
        self.by_part.clear();
    }
}
