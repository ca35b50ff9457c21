//! Allocation policy knobs.

/// How the fill loop treats accessibility-flagged students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocationPolicy {
    /// When the current room is not accessible, leave a flagged student
    /// unseated instead of placing them there with a warning.
    ///
    /// Rooms are ordered accessible-first and the cursor only advances past
    /// full rooms, so reaching an inaccessible room means no accessible seat
    /// is left.
    pub strict_accessibility: bool,
}

impl AllocationPolicy {
    /// Policy that never places a flagged student in an inaccessible room.
    pub fn strict() -> Self {
        Self { strict_accessibility: true }
    }
}
