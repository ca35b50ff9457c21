//! Fill loop tests against an in-memory ledger.

use chrono::{DateTime, TimeZone, Utc};
use seatplan_core::{
    AllocationPolicy, AllocationReport, AllocationWarning, CourseCode, Exam, ExamId, Outcome,
    Recorded, Room, RoomId, SeatAssignment, SeatLedger, Student, StudentId, UnseatedReason, fill,
};

/// Ledger over a plain vector, checking the slot on every insert.
#[derive(Default)]
struct VecLedger {
    rows: Vec<SeatAssignment>,
}

impl SeatLedger for VecLedger {
    type Error = std::convert::Infallible;

    fn find_clash(&self, student: &StudentId, exam: &Exam) -> Result<Option<ExamId>, Self::Error> {
        Ok(self
            .rows
            .iter()
            .find(|a| &a.student == student && a.starts_at == exam.starts_at && a.exam != exam.id)
            .map(|a| a.exam))
    }

    fn record(&mut self, assignment: SeatAssignment) -> Result<Recorded, Self::Error> {
        if let Some(other) = self.rows.iter().find(|a| {
            a.student == assignment.student
                && a.starts_at == assignment.starts_at
                && a.exam != assignment.exam
        }) {
            return Ok(Recorded::Clash(other.exam));
        }
        self.rows.push(assignment);
        Ok(Recorded::Seated)
    }
}

/// Ledger whose clash pre-check misses a concurrent booking of one student.
struct RacingLedger {
    inner: VecLedger,
    raced: StudentId,
}

impl SeatLedger for RacingLedger {
    type Error = std::convert::Infallible;

    fn find_clash(
        &self,
        _student: &StudentId,
        _exam: &Exam,
    ) -> Result<Option<ExamId>, Self::Error> {
        Ok(None)
    }

    fn record(&mut self, assignment: SeatAssignment) -> Result<Recorded, Self::Error> {
        if assignment.student == self.raced {
            return Ok(Recorded::Clash(ExamId(99)));
        }
        self.inner.record(assignment)
    }
}

/// Ledger that fails after a fixed number of writes.
struct FailingLedger {
    writes_left: usize,
}

impl SeatLedger for FailingLedger {
    type Error = &'static str;

    fn find_clash(
        &self,
        _student: &StudentId,
        _exam: &Exam,
    ) -> Result<Option<ExamId>, Self::Error> {
        Ok(None)
    }

    fn record(&mut self, _assignment: SeatAssignment) -> Result<Recorded, Self::Error> {
        if self.writes_left == 0 {
            return Err("disk full");
        }
        self.writes_left -= 1;
        Ok(Recorded::Seated)
    }
}

fn t(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap()
}

fn exam(id: u64, starts_at: DateTime<Utc>) -> Exam {
    Exam {
        id: ExamId(id),
        course: CourseCode::new("BIT 111").unwrap(),
        starts_at,
        duration_minutes: 120,
    }
}

fn sid(raw: &str) -> StudentId {
    StudentId::new(raw).unwrap()
}

fn student(reg: &str, flagged: bool) -> Student {
    Student::new(sid(reg)).with_accessibility(flagged)
}

fn room(id: u64, capacity: u32, accessible: bool) -> Room {
    Room::new(RoomId(id), format!("R{id}"), capacity).unwrap().with_accessibility(accessible)
}

fn run(
    exam: &Exam,
    roster: &[Student],
    rooms: &[Room],
    policy: AllocationPolicy,
    ledger: &mut VecLedger,
) -> AllocationReport {
    let mut report = AllocationReport::new(exam.id, 0);
    fill(exam, roster, rooms, policy, ledger, &mut report).unwrap();
    report
}

#[test]
fn three_students_one_room_of_two() {
    let exam = exam(1, t(9));
    let roster = [student("a", false), student("b", false), student("c", false)];
    let rooms = [room(1, 2, false)];
    let mut ledger = VecLedger::default();

    let report = run(&exam, &roster, &rooms, AllocationPolicy::default(), &mut ledger);

    assert_eq!(report.counts().assigned, 2);
    assert_eq!(report.counts().unseated, 1);
    let seats: Vec<&str> = ledger.rows.iter().map(|a| a.seat.as_str()).collect();
    assert_eq!(seats, ["1", "2"]);
    assert_eq!(report.unseated().collect::<Vec<_>>(), [&sid("c")]);
}

#[test]
fn clash_at_same_instant_skips_student() {
    let mut ledger = VecLedger::default();
    ledger.rows.push(SeatAssignment {
        exam: ExamId(1),
        student: sid("x"),
        room: RoomId(1),
        seat: "1".to_owned(),
        starts_at: t(9),
    });

    let exam2 = exam(2, t(9));
    let roster = [student("x", false), student("y", false)];
    let rooms = [room(1, 5, false)];
    let report = run(&exam2, &roster, &rooms, AllocationPolicy::default(), &mut ledger);

    assert_eq!(
        report.outcome_of(&sid("x")),
        Some(&Outcome::Conflict { clashing_exam: ExamId(1) })
    );
    assert!(!ledger.rows.iter().any(|a| a.exam == ExamId(2) && a.student == sid("x")));
    // the clash consumed no seat
    assert_eq!(
        report.outcome_of(&sid("y")),
        Some(&Outcome::Seated { room: RoomId(1), seat: "1".to_owned() })
    );
}

#[test]
fn different_start_is_not_a_clash() {
    let mut ledger = VecLedger::default();
    ledger.rows.push(SeatAssignment {
        exam: ExamId(1),
        student: sid("x"),
        room: RoomId(1),
        seat: "1".to_owned(),
        starts_at: t(9),
    });

    // overlapping but not identical start
    let exam2 = exam(2, t(10));
    let roster = [student("x", false)];
    let rooms = [room(1, 5, false)];
    let report = run(&exam2, &roster, &rooms, AllocationPolicy::default(), &mut ledger);

    assert_eq!(report.counts().assigned, 1);
}

#[test]
fn flagged_student_takes_accessible_room() {
    let exam = exam(1, t(9));
    let roster = [student("r1", false), student("acc", true), student("r2", false)];
    let rooms = [room(10, 5, false), room(20, 1, true)];
    let mut ledger = VecLedger::default();

    let report = run(&exam, &roster, &rooms, AllocationPolicy::default(), &mut ledger);

    assert_eq!(
        report.outcome_of(&sid("acc")),
        Some(&Outcome::Seated { room: RoomId(20), seat: "1".to_owned() })
    );
    assert_eq!(
        report.outcome_of(&sid("r1")),
        Some(&Outcome::Seated { room: RoomId(10), seat: "1".to_owned() })
    );
    assert!(report.warnings().is_empty());
}

#[test]
fn soft_policy_warns_on_mismatch() {
    let exam = exam(1, t(9));
    let roster = [student("a", true), student("b", true)];
    let rooms = [room(1, 1, true), room(2, 5, false)];
    let mut ledger = VecLedger::default();

    let report = run(&exam, &roster, &rooms, AllocationPolicy::default(), &mut ledger);

    assert_eq!(report.counts().assigned, 2);
    assert_eq!(
        report.warnings(),
        [AllocationWarning::AccessibilityMismatch { student: sid("b"), room: RoomId(2) }]
    );
}

#[test]
fn strict_policy_leaves_flagged_student_unseated() {
    let exam = exam(1, t(9));
    let roster = [student("a", true), student("b", true), student("c", false)];
    let rooms = [room(1, 1, true), room(2, 5, false)];
    let mut ledger = VecLedger::default();

    let report = run(&exam, &roster, &rooms, AllocationPolicy::strict(), &mut ledger);

    assert_eq!(
        report.outcome_of(&sid("b")),
        Some(&Outcome::Unseated { reason: UnseatedReason::NoAccessibleSeat })
    );
    // regular student still gets the first seat of the inaccessible room
    assert_eq!(
        report.outcome_of(&sid("c")),
        Some(&Outcome::Seated { room: RoomId(2), seat: "1".to_owned() })
    );
    assert_eq!(report.counts().no_accessible_seat, 1);
    assert_eq!(report.counts().unseated, 0);
    assert!(report.warnings().is_empty());
}

#[test]
fn exhaustion_reports_every_remaining_student() {
    let exam = exam(1, t(9));
    let roster: Vec<Student> = (0..5).map(|i| student(&format!("s{i}"), false)).collect();
    let mut ledger = VecLedger::default();

    let rooms = [room(1, 1, false)];
    let report = run(&exam, &roster, &rooms, AllocationPolicy::default(), &mut ledger);

    assert_eq!(report.counts().assigned, 1);
    assert_eq!(report.counts().unseated, 4);
    assert_eq!(report.outcomes().len(), roster.len());
}

#[test]
fn no_rooms_unseats_everyone() {
    let exam = exam(1, t(9));
    let roster = [student("a", true), student("b", false)];
    let mut ledger = VecLedger::default();

    let report = run(&exam, &roster, &[], AllocationPolicy::default(), &mut ledger);

    assert_eq!(report.counts().unseated, 2);
    assert!(ledger.rows.is_empty());
}

#[test]
fn concurrent_clash_does_not_consume_seat() {
    let exam = exam(1, t(9));
    let roster = [student("a", false), student("b", false)];
    let rooms = [room(1, 1, false), room(2, 1, false)];
    let mut ledger = RacingLedger { inner: VecLedger::default(), raced: sid("a") };
    let mut report = AllocationReport::new(exam.id, 0);

    fill(&exam, &roster, &rooms, AllocationPolicy::default(), &mut ledger, &mut report).unwrap();

    assert_eq!(
        report.outcome_of(&sid("a")),
        Some(&Outcome::Conflict { clashing_exam: ExamId(99) })
    );
    assert_eq!(
        report.outcome_of(&sid("b")),
        Some(&Outcome::Seated { room: RoomId(1), seat: "1".to_owned() })
    );
}

#[test]
fn ledger_error_keeps_partial_report() {
    let exam = exam(1, t(9));
    let roster = [student("a", false), student("b", false), student("c", false)];
    let mut ledger = FailingLedger { writes_left: 2 };
    let mut report = AllocationReport::new(exam.id, 0);

    let rooms = [room(1, 10, false)];
    let policy = AllocationPolicy::default();
    let result = fill(&exam, &roster, &rooms, policy, &mut ledger, &mut report);

    assert_eq!(result, Err("disk full"));
    assert_eq!(report.counts().assigned, 2);
}

#[test]
fn rerun_is_identical() {
    let exam = exam(1, t(9));
    let roster = [student("a", false), student("b", true), student("c", false), student("d", true)];
    let rooms = [room(1, 2, false), room(2, 1, true), room(3, 3, false)];

    let mut first = VecLedger::default();
    let mut second = VecLedger::default();
    let r1 = run(&exam, &roster, &rooms, AllocationPolicy::default(), &mut first);
    let r2 = run(&exam, &roster, &rooms, AllocationPolicy::default(), &mut second);

    assert_eq!(first.rows, second.rows);
    assert_eq!(r1, r2);
}
