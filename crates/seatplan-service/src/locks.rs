//! Per-exam run locks.
//!
//! A run deletes and rebuilds every row of its exam, so two runs for the
//! same exam must not interleave. Runs for different exams proceed in
//! parallel; their shared (student, start instant) slots are protected by
//! the store's atomic insert.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use seatplan_core::ExamId;

/// Registry of one mutex per exam.
#[derive(Debug, Default)]
pub struct ExamLocks {
    slots: Mutex<HashMap<ExamId, Arc<Mutex<()>>>>,
}

impl ExamLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex guarding runs of `exam`, created on first use.
    ///
    /// A poisoned registry is recovered: it only maps ids to mutexes and a
    /// panic cannot leave it half-updated.
    pub fn slot(&self, exam: ExamId) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(exam).or_default())
    }
}
