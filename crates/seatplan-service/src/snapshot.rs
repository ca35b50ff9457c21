//! JSON snapshot documents.
//!
//! A snapshot is everything the allocator needs from the outside world:
//! courses, students with their enrollments, rooms, scheduled exams, and
//! assignments already made for other exams. Every assignment must match a
//! scheduled exam, including its start instant.
//!
//! ```json
//! {
//!   "courses": [{ "code": "BIT 111", "name": "Intro to Programming" }],
//!   "students": [
//!     { "registration": "S-001", "accessibility": true, "courses": ["BIT 111"] }
//!   ],
//!   "rooms": [{ "id": 1, "name": "LT-1", "capacity": 40, "accessible": true }],
//!   "exams": [{
//!     "id": 1,
//!     "course": "BIT 111",
//!     "starts_at": "2025-06-02T09:00:00Z",
//!     "duration_minutes": 120
//!   }],
//!   "assignments": []
//! }
//! ```

use std::path::Path;

use seatplan_core::{Course, Exam, Room, SeatAssignment, Student};
use serde::Deserialize;

use crate::{
    catalog::{Catalog, CatalogError},
    storage::{AssignmentStore, StorageError},
};

/// Raw snapshot document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotDocument {
    /// Courses.
    #[serde(default)]
    pub courses: Vec<Course>,
    /// Students and their enrollments.
    #[serde(default)]
    pub students: Vec<Student>,
    /// Room inventory.
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// Scheduled exams.
    #[serde(default)]
    pub exams: Vec<Exam>,
    /// Assignments that already exist.
    #[serde(default)]
    pub assignments: Vec<SeatAssignment>,
}

/// Validated snapshot: a catalog plus pre-existing assignments.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Courses, students, rooms and exams.
    pub catalog: Catalog,
    assignments: Vec<SeatAssignment>,
}

impl Snapshot {
    /// Parse and validate a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: SnapshotDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Read, parse and validate a JSON snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&json)
    }

    /// Validate a parsed document.
    ///
    /// Courses are registered first so students and exams can reference them
    /// regardless of their order in the document. Assignments are checked
    /// against the finished catalog.
    pub fn from_document(document: SnapshotDocument) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::new();
        for course in document.courses {
            catalog.add_course(course)?;
        }
        for student in document.students {
            catalog.add_student(student)?;
        }
        for room in document.rooms {
            catalog.add_room(room)?;
        }
        for exam in document.exams {
            catalog.add_exam(exam)?;
        }
        for assignment in &document.assignments {
            catalog.check_assignment(assignment)?;
        }

        Ok(Self { catalog, assignments: document.assignments })
    }

    /// Pre-existing assignments, in document order.
    pub fn assignments(&self) -> &[SeatAssignment] {
        &self.assignments
    }

    /// Insert the pre-existing assignments into `store`.
    pub fn seed(&self, store: &impl AssignmentStore) -> Result<usize, StorageError> {
        for assignment in &self.assignments {
            store.insert(assignment.clone())?;
        }
        Ok(self.assignments.len())
    }
}
