//! Processing order for students and rooms.
//!
//! Both orderings are stable: ties keep the order in which the roster or the
//! room inventory enumerated them. That is what makes a re-run with unchanged
//! inputs produce the identical seat plan.

use std::collections::HashSet;

use crate::model::{Room, Student, StudentId};

/// Accessibility-flagged students first, then everyone else.
///
/// A stable two-bucket partition, not a general priority sort.
pub fn priority_queue(students: &[Student]) -> Vec<&Student> {
    let (flagged, regular): (Vec<&Student>, Vec<&Student>) =
        students.iter().partition(|s| s.accessibility);
    flagged.into_iter().chain(regular).collect()
}

/// Accessible rooms first, then larger rooms first.
pub fn order_rooms(rooms: &[Room]) -> Vec<&Room> {
    let mut ordered: Vec<&Room> = rooms.iter().collect();
    ordered.sort_by(|a, b| {
        b.accessible.cmp(&a.accessible).then_with(|| b.capacity.cmp(&a.capacity))
    });
    ordered
}

/// Collapse repeated registrations to their first occurrence.
///
/// Returns the distinct roster and the identifiers that were dropped, in the
/// order they were encountered.
pub fn distinct_roster(students: Vec<Student>) -> (Vec<Student>, Vec<StudentId>) {
    let mut seen = HashSet::with_capacity(students.len());
    let mut duplicates = Vec::new();
    let mut distinct = Vec::with_capacity(students.len());

    for student in students {
        if seen.insert(student.registration.clone()) {
            distinct.push(student);
        } else {
            duplicates.push(student.registration);
        }
    }

    (distinct, duplicates)
}
