//! Assignment storage.
//!
//! The store is the only state shared between allocation runs. Rows of the
//! exam being allocated belong to that run; rows of every other exam are
//! read for clash detection only.
//!
//! # Invariants
//!
//! - At most one row per (exam, student)
//! - At most one exam per (student, start instant): the slot check and the
//!   insert happen under one lock, so two runs for different exams sharing
//!   a start instant cannot both seat the same student

use std::{
    collections::{BTreeMap, HashMap},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::{DateTime, Utc};
use seatplan_core::{ExamId, SeatAssignment, StudentId};
use thiserror::Error;

/// Errors from assignment storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The (exam, student) pair already has a row.
    #[error("student {student} already has a seat for exam {exam}")]
    DuplicateAssignment {
        /// Exam of the existing row.
        exam: ExamId,
        /// Student of the existing row.
        student: StudentId,
    },

    /// The student already sits another exam starting at the same instant.
    #[error("student {student} already sits exam {exam} at {starts_at}")]
    SlotTaken {
        /// Student being inserted.
        student: StudentId,
        /// Start instant of both exams.
        starts_at: DateTime<Utc>,
        /// Exam already holding the slot.
        exam: ExamId,
    },

    /// The backend cannot serve requests.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable table of seat assignments across all exams.
pub trait AssignmentStore: Send + Sync {
    /// Delete every row of `exam`. Returns how many rows were removed.
    fn clear_exam(&self, exam: ExamId) -> Result<usize, StorageError>;

    /// Insert a row, atomically checking both uniqueness invariants.
    ///
    /// # Errors
    ///
    /// - `StorageError::DuplicateAssignment` for a second row of the same
    ///   (exam, student)
    /// - `StorageError::SlotTaken` when another exam at the same instant
    ///   already seats the student
    fn insert(&self, assignment: SeatAssignment) -> Result<(), StorageError>;

    /// Exam other than `exclude`, starting at `starts_at`, that seats
    /// `student`.
    fn find_clash(
        &self,
        student: &StudentId,
        starts_at: DateTime<Utc>,
        exclude: ExamId,
    ) -> Result<Option<ExamId>, StorageError>;

    /// Every row of one exam.
    fn load_exam(&self, exam: ExamId) -> Result<Vec<SeatAssignment>, StorageError>;

    /// Every row of one student, across exams.
    fn load_student(&self, student: &StudentId) -> Result<Vec<SeatAssignment>, StorageError>;

    /// Total number of rows.
    fn count(&self) -> Result<usize, StorageError>;
}

#[derive(Debug, Default)]
struct Tables {
    /// exam -> student -> row
    rows: BTreeMap<ExamId, BTreeMap<StudentId, SeatAssignment>>,
    /// (student, start) -> exam holding the slot
    slots: HashMap<(StudentId, DateTime<Utc>), ExamId>,
}

/// In-memory assignment store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row, ordered by exam then student.
    pub fn snapshot(&self) -> Result<Vec<SeatAssignment>, StorageError> {
        let tables = self.read()?;
        Ok(tables.rows.values().flat_map(|rows| rows.values().cloned()).collect())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StorageError> {
        self.tables.read().map_err(|_| StorageError::Unavailable("lock poisoned".to_owned()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StorageError> {
        self.tables.write().map_err(|_| StorageError::Unavailable("lock poisoned".to_owned()))
    }
}

impl AssignmentStore for MemoryStore {
    fn clear_exam(&self, exam: ExamId) -> Result<usize, StorageError> {
        let mut tables = self.write()?;
        let Some(removed) = tables.rows.remove(&exam) else {
            return Ok(0);
        };

        for row in removed.values() {
            let key = (row.student.clone(), row.starts_at);
            if tables.slots.get(&key) == Some(&exam) {
                tables.slots.remove(&key);
            }
        }

        Ok(removed.len())
    }

    fn insert(&self, assignment: SeatAssignment) -> Result<(), StorageError> {
        let mut tables = self.write()?;

        let exists = tables
            .rows
            .get(&assignment.exam)
            .is_some_and(|rows| rows.contains_key(&assignment.student));
        if exists {
            return Err(StorageError::DuplicateAssignment {
                exam: assignment.exam,
                student: assignment.student,
            });
        }

        let slot = (assignment.student.clone(), assignment.starts_at);
        if let Some(&holder) = tables.slots.get(&slot) {
            return Err(StorageError::SlotTaken {
                student: assignment.student,
                starts_at: assignment.starts_at,
                exam: holder,
            });
        }

        tables.slots.insert(slot, assignment.exam);
        tables
            .rows
            .entry(assignment.exam)
            .or_default()
            .insert(assignment.student.clone(), assignment);

        Ok(())
    }

    fn find_clash(
        &self,
        student: &StudentId,
        starts_at: DateTime<Utc>,
        exclude: ExamId,
    ) -> Result<Option<ExamId>, StorageError> {
        let tables = self.read()?;
        let holder = tables.slots.get(&(student.clone(), starts_at)).copied();
        Ok(holder.filter(|exam| *exam != exclude))
    }

    fn load_exam(&self, exam: ExamId) -> Result<Vec<SeatAssignment>, StorageError> {
        let tables = self.read()?;
        Ok(tables.rows.get(&exam).map(|rows| rows.values().cloned().collect()).unwrap_or_default())
    }

    fn load_student(&self, student: &StudentId) -> Result<Vec<SeatAssignment>, StorageError> {
        let tables = self.read()?;
        Ok(tables.rows.values().filter_map(|rows| rows.get(student)).cloned().collect())
    }

    fn count(&self) -> Result<usize, StorageError> {
        let tables = self.read()?;
        Ok(tables.rows.values().map(BTreeMap::len).sum())
    }
}
