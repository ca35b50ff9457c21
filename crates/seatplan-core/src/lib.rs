//! Exam seat allocation core.
//!
//! Pure, deterministic allocation logic with no I/O:
//! - Domain model (students, courses, exams, rooms, seat assignments)
//! - Priority ordering (accessibility-flagged students first)
//! - Room ordering and the first-fit seat cursor
//! - The fill loop, reaching storage only through [`SeatLedger`]
//!
//! ## Architecture
//!
//! ```text
//! seatplan-core
//!   ├─ model       (entities and identifiers)
//!   ├─ ordering    (student queue, room order, roster dedup)
//!   ├─ cursor      (current room + filled seats)
//!   ├─ fill        (per-student loop, SeatLedger seam)
//!   ├─ policy      (strict vs soft accessibility)
//!   └─ report      (outcomes, warnings, counts)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cursor;
pub mod error;
pub mod fill;
pub mod model;
pub mod ordering;
pub mod policy;
pub mod report;

pub use cursor::SeatCursor;
pub use error::ModelError;
pub use fill::{Recorded, SeatLedger, fill};
pub use model::{Course, CourseCode, Exam, ExamId, Room, RoomId, SeatAssignment, Student, StudentId};
pub use ordering::{distinct_roster, order_rooms, priority_queue};
pub use policy::AllocationPolicy;
pub use report::{
    AllocationReport, AllocationWarning, Outcome, ReportCounts, StudentOutcome, UnseatedReason,
};
