//! Operations for model-based testing.
//!
//! Operations represent every mutation staff can make between allocation
//! runs, plus the runs themselves. They are generated randomly by proptest
//! and applied to both the model and the real allocator.

use arbitrary::Arbitrary;
use seatplan_core::ReportCounts;

/// Student index (u8 keeps the test space manageable).
pub type ModelStudent = u8;

/// Course index.
pub type ModelCourse = u8;

/// Exam index.
pub type ModelExam = u8;

/// Room index.
pub type ModelRoom = u8;

/// Operations that can be applied to the system.
#[derive(Debug, Clone, Arbitrary)]
pub enum Operation {
    /// Run the allocator for one exam.
    Allocate {
        /// Exam to allocate.
        exam: ModelExam,
    },

    /// Enroll a student in a course.
    Enroll {
        /// Student to enroll.
        student: ModelStudent,
        /// Target course.
        course: ModelCourse,
    },

    /// Drop an enrollment.
    Withdraw {
        /// Student withdrawing.
        student: ModelStudent,
        /// Course to leave.
        course: ModelCourse,
    },

    /// Add a room to the inventory.
    AddRoom {
        /// New room index.
        room: ModelRoom,
        /// Seat count.
        capacity: u8,
        /// Wheelchair accessible.
        accessible: bool,
    },

    /// Change a student's accessibility flag.
    SetAccessibility {
        /// Student to update.
        student: ModelStudent,
        /// New flag value.
        flagged: bool,
    },
}

/// Result of applying an operation.
///
/// Used to compare model and real system behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// Mutation succeeded.
    Ok,

    /// Allocation ran with these totals.
    Allocated(ReportCounts),

    /// Operation failed with expected error.
    Error(OperationError),
}

/// Expected errors that can occur during operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationError {
    /// Exam index out of range.
    ExamNotFound,

    /// Student index out of range.
    UnknownStudent,

    /// Course index out of range.
    UnknownCourse,

    /// Room index already used.
    DuplicateRoom,

    /// Zero-capacity room.
    InvalidCapacity,

    /// Backend failure. The model never produces it, so seeing it is a
    /// divergence.
    Unavailable,
}
