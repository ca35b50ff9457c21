//! Exam seat allocation service.
//!
//! Wires the pure allocation core to its inputs and its storage:
//! - Catalog providers for exams, rosters and rooms
//! - An assignment store that enforces one exam per student per start instant
//! - The allocator, which resets and rebuilds one exam's seating per run
//! - A batch runtime over JSON snapshots, used by the `seatplan` binary
//!
//! ## Architecture
//!
//! ```text
//! seatplan-service
//!   ├─ Catalog            (ExamDirectory + RosterProvider + RoomInventory)
//!   ├─ Snapshot           (JSON document -> Catalog + seed assignments)
//!   ├─ AssignmentStore    (cross-exam seat table, atomic slot check)
//!   ├─ ExamLocks          (one run at a time per exam)
//!   ├─ Allocator          (allocate, seat_for, attendance)
//!   └─ runtime            (snapshot in, reports and attendance out)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod allocator;
pub mod catalog;
mod config;
mod error;
mod locks;
pub mod runtime;
pub mod snapshot;
pub mod storage;

pub use allocator::{Allocator, AttendanceEntry};
pub use catalog::{Catalog, CatalogError, ExamDirectory, RoomInventory, RosterProvider};
pub use config::{AllocatorConfig, RuntimeConfig};
pub use error::{AllocationError, ServiceError};
pub use locks::ExamLocks;
pub use runtime::{ExamAttendance, RunSummary, execute, write_summary};
pub use snapshot::{Snapshot, SnapshotDocument};
pub use storage::{AssignmentStore, MemoryStore, StorageError};
