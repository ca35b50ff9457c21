//! Allocator
//!
//! Runs the seat allocation for one exam against the catalog and the
//! assignment store.
//!
//! ## Responsibilities
//!
//! - Exam resolution: unknown exams fail before anything is touched
//! - Reset: every stale row of the exam is deleted before the fill
//! - Eligibility: roster derived from course enrollment, or injected
//! - Fill: delegated to [`seatplan_core::fill`] through a store-backed ledger
//! - Lookups: a student's seats, an exam's attendance sheet
//!
//! ## Design
//!
//! - Full recompute: re-running with unchanged inputs rebuilds the identical
//!   plan
//! - Per-exam run lock: the reset-then-rebuild of one exam never interleaves
//!   with another run of the same exam
//! - Atomic slot insert: the store rejects a second exam at the same instant
//!   for a student, which the fill loop reports as a conflict

use std::{collections::HashMap, sync::PoisonError};

use seatplan_core::{
    AllocationReport, AllocationWarning, Exam, ExamId, Recorded, RoomId, SeatAssignment,
    SeatLedger, Student, StudentId, distinct_roster, fill,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    catalog::{ExamDirectory, RoomInventory, RosterProvider},
    config::AllocatorConfig,
    error::AllocationError,
    locks::ExamLocks,
    storage::{AssignmentStore, StorageError},
};

/// One line of an exam's attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceEntry {
    /// Room of the seat.
    pub room: RoomId,
    /// Room display name.
    pub room_name: String,
    /// Seat label.
    pub seat: String,
    /// Seated student.
    pub student: StudentId,
    /// Student's full name, empty if unknown to the roster.
    pub student_name: String,
}

/// Seat allocator over a catalog `C` and an assignment store `S`.
pub struct Allocator<C, S> {
    catalog: C,
    store: S,
    config: AllocatorConfig,
    locks: ExamLocks,
}

impl<C, S> Allocator<C, S>
where
    C: ExamDirectory + RosterProvider + RoomInventory,
    S: AssignmentStore,
{
    /// Create an allocator.
    pub fn new(catalog: C, store: S, config: AllocatorConfig) -> Self {
        Self { catalog, store, config, locks: ExamLocks::new() }
    }

    /// Allocate seats for `exam_id`, seating every student enrolled in the
    /// exam's course.
    ///
    /// # Errors
    ///
    /// - `AllocationError::ExamNotFound` if the exam does not resolve
    /// - `AllocationError::Catalog` if the roster or rooms cannot be read
    /// - `AllocationError::Storage` if the store fails mid-run
    pub fn allocate(&self, exam_id: ExamId) -> Result<AllocationReport, AllocationError> {
        let exam = self.resolve(exam_id)?;
        let roster = self.catalog.enrolled(&exam.course)?;
        self.run(&exam, roster)
    }

    /// Allocate seats for `exam_id`, seating exactly `eligible` in the given
    /// order instead of deriving the roster from enrollment.
    pub fn allocate_with_roster(
        &self,
        exam_id: ExamId,
        eligible: Vec<Student>,
    ) -> Result<AllocationReport, AllocationError> {
        let exam = self.resolve(exam_id)?;
        self.run(&exam, eligible)
    }

    /// Every seat a student holds, ordered by exam start.
    pub fn seat_for(&self, student: &StudentId) -> Result<Vec<SeatAssignment>, AllocationError> {
        let mut seats = self.store.load_student(student)?;
        seats.sort_by_key(|a| (a.starts_at, a.exam));
        Ok(seats)
    }

    /// Attendance sheet of an exam, ordered by room name then seat number.
    pub fn attendance(&self, exam_id: ExamId) -> Result<Vec<AttendanceEntry>, AllocationError> {
        let exam = self.resolve(exam_id)?;
        let rooms: HashMap<RoomId, String> =
            self.catalog.rooms()?.into_iter().map(|r| (r.id, r.name)).collect();
        let names: HashMap<StudentId, String> = self
            .catalog
            .enrolled(&exam.course)?
            .into_iter()
            .map(|s| {
                let name = format!("{} {}", s.first_name, s.last_name).trim().to_owned();
                (s.registration, name)
            })
            .collect();

        let mut rows = self.store.load_exam(exam.id)?;
        rows.sort_by(|a, b| {
            let room_a = rooms.get(&a.room).map_or("", String::as_str);
            let room_b = rooms.get(&b.room).map_or("", String::as_str);
            room_a
                .cmp(room_b)
                .then_with(|| a.room.cmp(&b.room))
                .then_with(|| a.seat_number().cmp(&b.seat_number()))
                .then_with(|| a.seat.cmp(&b.seat))
        });

        Ok(rows
            .into_iter()
            .map(|row| AttendanceEntry {
                room: row.room,
                room_name: rooms.get(&row.room).cloned().unwrap_or_default(),
                seat: row.seat,
                student_name: names.get(&row.student).cloned().unwrap_or_default(),
                student: row.student,
            })
            .collect())
    }

    /// Catalog the allocator reads from.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Mutable catalog access, for roster and inventory changes between runs.
    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    /// Store the allocator writes to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active configuration.
    pub fn config(&self) -> AllocatorConfig {
        self.config
    }

    fn resolve(&self, exam_id: ExamId) -> Result<Exam, AllocationError> {
        self.catalog.exam(exam_id)?.ok_or(AllocationError::ExamNotFound(exam_id))
    }

    fn run(&self, exam: &Exam, roster: Vec<Student>) -> Result<AllocationReport, AllocationError> {
        // Inputs are read before the reset so a catalog failure leaves the
        // store untouched.
        let rooms = self.catalog.rooms()?;

        let slot = self.locks.slot(exam.id);
        let _run = slot.lock().unwrap_or_else(PoisonError::into_inner);

        info!(
            exam = %exam.id,
            course = %exam.course,
            starts_at = %exam.starts_at,
            rooms = rooms.len(),
            "starting allocation"
        );

        let cleared = self.store.clear_exam(exam.id)?;
        if cleared > 0 {
            debug!(exam = %exam.id, cleared, "cleared stale assignments");
        }

        let mut report = AllocationReport::new(exam.id, cleared);
        let (eligible, duplicates) = distinct_roster(roster);
        for student in duplicates {
            warn!(exam = %exam.id, student = %student, "duplicate roster entry ignored");
            report.warn(AllocationWarning::DuplicateEnrollment { student });
        }

        if eligible.is_empty() {
            info!(exam = %exam.id, "no eligible students");
            return Ok(report);
        }

        let mut ledger = StoreLedger { store: &self.store };
        fill(exam, &eligible, &rooms, self.config.policy, &mut ledger, &mut report)?;

        let counts = report.counts();
        info!(
            exam = %exam.id,
            assigned = counts.assigned,
            conflicted = counts.conflicted,
            unseated = counts.unseated,
            no_accessible_seat = counts.no_accessible_seat,
            "allocation complete"
        );
        Ok(report)
    }
}

impl<C, S> std::fmt::Debug for Allocator<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Allocator").field("config", &self.config).finish_non_exhaustive()
    }
}

/// [`SeatLedger`] over an [`AssignmentStore`].
struct StoreLedger<'a, S> {
    store: &'a S,
}

impl<S: AssignmentStore> SeatLedger for StoreLedger<'_, S> {
    type Error = StorageError;

    fn find_clash(&self, student: &StudentId, exam: &Exam) -> Result<Option<ExamId>, Self::Error> {
        self.store.find_clash(student, exam.starts_at, exam.id)
    }

    fn record(&mut self, assignment: SeatAssignment) -> Result<Recorded, Self::Error> {
        match self.store.insert(assignment) {
            Ok(()) => Ok(Recorded::Seated),
            Err(StorageError::SlotTaken { exam, .. }) => Ok(Recorded::Clash(exam)),
            Err(e) => Err(e),
        }
    }
}
