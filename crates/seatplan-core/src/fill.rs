//! The allocation fill loop.
//!
//! Walks the priority queue once, handing each student the next seat under
//! the [`SeatCursor`]. Persistence is reached only through [`SeatLedger`],
//! so the loop is the same whether it writes to a database, an in-memory
//! store or a test double.
//!
//! ## Per-student steps
//!
//! 1. Clash check against other exams with the same start instant
//! 2. Room exhaustion: this and every remaining student is unseated
//! 3. Accessibility mismatch: warn (soft) or leave unseated (strict)
//! 4. Record the assignment; the ledger may still report a clash if another
//!    run took the slot after step 1
//! 5. Advance the cursor

use tracing::{debug, warn};

use crate::{
    cursor::SeatCursor,
    model::{Exam, ExamId, Room, SeatAssignment, Student, StudentId},
    ordering::priority_queue,
    policy::AllocationPolicy,
    report::{AllocationReport, AllocationWarning, Outcome, UnseatedReason},
};

/// Result of asking the ledger to record an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// The assignment was stored.
    Seated,
    /// The (student, start instant) slot is already held by another exam.
    Clash(ExamId),
}

/// Read/write access to the cross-exam assignment table.
pub trait SeatLedger {
    /// Error type of the backing store.
    type Error;

    /// Another exam, starting exactly when `exam` starts, that already seats
    /// `student`.
    fn find_clash(&self, student: &StudentId, exam: &Exam) -> Result<Option<ExamId>, Self::Error>;

    /// Store an assignment.
    ///
    /// Implementations that can race with other runs must check the
    /// (student, start instant) slot atomically with the insert and answer
    /// [`Recorded::Clash`] instead of double-booking.
    fn record(&mut self, assignment: SeatAssignment) -> Result<Recorded, Self::Error>;
}

/// Seat `eligible` students for `exam`, appending outcomes to `report`.
///
/// The roster must already be free of duplicate registrations. Stale
/// assignments for `exam` must have been cleared by the caller.
///
/// # Errors
///
/// Only ledger errors are returned. Outcomes recorded before the error stay
/// in `report`.
pub fn fill<L: SeatLedger>(
    exam: &Exam,
    eligible: &[Student],
    rooms: &[Room],
    policy: AllocationPolicy,
    ledger: &mut L,
    report: &mut AllocationReport,
) -> Result<(), L::Error> {
    let mut cursor = SeatCursor::new(rooms);
    let mut queue = priority_queue(eligible).into_iter();

    while let Some(student) = queue.next() {
        let id = &student.registration;

        if let Some(clashing_exam) = ledger.find_clash(id, exam)? {
            warn!(
                exam = %exam.id,
                student = %id,
                clashing_exam = %clashing_exam,
                starts_at = %exam.starts_at,
                "scheduling conflict, student skipped"
            );
            report.record(id.clone(), Outcome::Conflict { clashing_exam });
            continue;
        }

        let Some(room) = cursor.current() else {
            let remaining = queue.len() + 1;
            warn!(exam = %exam.id, remaining, "out of rooms, remaining students not seated");
            report.record(id.clone(), Outcome::Unseated { reason: UnseatedReason::RoomsExhausted });
            for rest in queue.by_ref() {
                report.record(
                    rest.registration.clone(),
                    Outcome::Unseated { reason: UnseatedReason::RoomsExhausted },
                );
            }
            break;
        };

        let mismatch = student.accessibility && !room.accessible;
        if mismatch && policy.strict_accessibility {
            warn!(exam = %exam.id, student = %id, room = %room.id, "no accessible seat left");
            let outcome = Outcome::Unseated { reason: UnseatedReason::NoAccessibleSeat };
            report.record(id.clone(), outcome);
            continue;
        }

        let seat = cursor.next_label();
        let assignment = SeatAssignment {
            exam: exam.id,
            student: id.clone(),
            room: room.id,
            seat: seat.clone(),
            starts_at: exam.starts_at,
        };

        match ledger.record(assignment)? {
            Recorded::Seated => {
                if mismatch {
                    warn!(
                        exam = %exam.id,
                        student = %id,
                        room = %room.id,
                        "accessible room not available"
                    );
                    report.warn(AllocationWarning::AccessibilityMismatch {
                        student: id.clone(),
                        room: room.id,
                    });
                }
                debug!(
                    exam = %exam.id,
                    student = %id,
                    room = %room.id,
                    seat = %seat,
                    "seat assigned"
                );
                report.record(id.clone(), Outcome::Seated { room: room.id, seat });

                if cursor.consume() {
                    debug!(exam = %exam.id, room = %room.id, "room full");
                }
            },
            Recorded::Clash(clashing_exam) => {
                warn!(
                    exam = %exam.id,
                    student = %id,
                    clashing_exam = %clashing_exam,
                    "slot taken concurrently, student skipped"
                );
                report.record(id.clone(), Outcome::Conflict { clashing_exam });
            },
        }
    }

    Ok(())
}
