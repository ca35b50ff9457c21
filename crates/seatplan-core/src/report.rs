//! Allocation outcome report.
//!
//! Every soft failure of a run (clash, room shortage, accessibility
//! mismatch) is accumulated here instead of being raised, so staff get one
//! complete picture per run.

use std::fmt;

use serde::Serialize;

use crate::model::{ExamId, RoomId, StudentId};

/// Why a student was left without a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnseatedReason {
    /// Every room was full before the student's turn.
    RoomsExhausted,
    /// Strict accessibility policy and no accessible seat was left.
    NoAccessibleSeat,
}

/// What happened to one student in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Student got a seat.
    Seated {
        /// Room of the seat.
        room: RoomId,
        /// Seat label.
        seat: String,
    },

    /// Student already sits another exam starting at the same instant.
    Conflict {
        /// The exam already holding the student.
        clashing_exam: ExamId,
    },

    /// Student was not seated.
    Unseated {
        /// Why no seat was given.
        reason: UnseatedReason,
    },
}

/// Outcome for one student, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentOutcome {
    /// The student.
    pub student: StudentId,
    /// What happened.
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Advisory conditions that did not stop an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationWarning {
    /// A flagged student was seated in an inaccessible room.
    AccessibilityMismatch {
        /// The student.
        student: StudentId,
        /// The inaccessible room.
        room: RoomId,
    },

    /// The roster listed a registration more than once.
    DuplicateEnrollment {
        /// The repeated registration.
        student: StudentId,
    },
}

/// Per-category totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportCounts {
    /// Students seated.
    pub assigned: usize,
    /// Students skipped because of a timestamp clash.
    pub conflicted: usize,
    /// Students left without a seat because every room was full.
    pub unseated: usize,
    /// Flagged students left without a seat by the strict policy.
    pub no_accessible_seat: usize,
}

/// Structured result of one allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationReport {
    exam: ExamId,
    cleared: usize,
    counts: ReportCounts,
    outcomes: Vec<StudentOutcome>,
    warnings: Vec<AllocationWarning>,
}

impl AllocationReport {
    /// Empty report for a run that removed `cleared` stale assignments.
    pub fn new(exam: ExamId, cleared: usize) -> Self {
        Self {
            exam,
            cleared,
            counts: ReportCounts::default(),
            outcomes: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record one student's outcome.
    pub fn record(&mut self, student: StudentId, outcome: Outcome) {
        match outcome {
            Outcome::Seated { .. } => self.counts.assigned += 1,
            Outcome::Conflict { .. } => self.counts.conflicted += 1,
            Outcome::Unseated { reason: UnseatedReason::RoomsExhausted } => {
                self.counts.unseated += 1;
            },
            Outcome::Unseated { reason: UnseatedReason::NoAccessibleSeat } => {
                self.counts.no_accessible_seat += 1;
            },
        }
        self.outcomes.push(StudentOutcome { student, outcome });
    }

    /// Record an advisory warning.
    pub fn warn(&mut self, warning: AllocationWarning) {
        self.warnings.push(warning);
    }

    /// Exam the run targeted.
    pub fn exam(&self) -> ExamId {
        self.exam
    }

    /// Stale assignments deleted before the fill.
    pub fn cleared(&self) -> usize {
        self.cleared
    }

    /// Totals per category.
    pub fn counts(&self) -> ReportCounts {
        self.counts
    }

    /// Every outcome in processing order.
    pub fn outcomes(&self) -> &[StudentOutcome] {
        &self.outcomes
    }

    /// Advisory warnings in the order they were raised.
    pub fn warnings(&self) -> &[AllocationWarning] {
        &self.warnings
    }

    /// Seated students in processing order.
    pub fn assigned(&self) -> impl Iterator<Item = &StudentId> {
        self.select(|o| matches!(o, Outcome::Seated { .. }))
    }

    /// Students skipped because of a clash.
    pub fn conflicted(&self) -> impl Iterator<Item = &StudentId> {
        self.select(|o| matches!(o, Outcome::Conflict { .. }))
    }

    /// Students left without a seat, for any reason.
    pub fn unseated(&self) -> impl Iterator<Item = &StudentId> {
        self.select(|o| matches!(o, Outcome::Unseated { .. }))
    }

    /// Outcome recorded for a student, if the student was processed.
    pub fn outcome_of(&self, student: &StudentId) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| &o.student == student).map(|o| &o.outcome)
    }

    /// Whether every eligible student got a seat.
    pub fn is_complete(&self) -> bool {
        self.counts.conflicted == 0
            && self.counts.unseated == 0
            && self.counts.no_accessible_seat == 0
    }

    fn select(&self, keep: impl Fn(&Outcome) -> bool) -> impl Iterator<Item = &StudentId> {
        self.outcomes.iter().filter(move |o| keep(&o.outcome)).map(|o| &o.student)
    }
}

impl fmt::Display for AllocationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exam {}: {} assigned, {} conflicted, {} unseated, {} without accessible seat \
             ({} warnings, {} cleared)",
            self.exam,
            self.counts.assigned,
            self.counts.conflicted,
            self.counts.unseated,
            self.counts.no_accessible_seat,
            self.warnings.len(),
            self.cleared
        )
    }
}
