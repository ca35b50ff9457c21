//! Domain model: students, courses, exams, rooms and seat assignments.
//!
//! Identifiers are newtypes so a room id can never be passed where an exam id
//! is expected. String identifiers validate on construction and on
//! deserialization, so every value reaching the allocator is well formed.
//!
//! # Invariants
//!
//! - Registration identifiers and course codes are non-empty and trimmed
//! - Room capacity is strictly positive (enforced by [`NonZeroU32`])
//! - A [`SeatAssignment`] carries its exam's start timestamp so stores can
//!   index the (student, timestamp) slot without a join

use std::{collections::BTreeSet, fmt, num::NonZeroU32};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Exam identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExamId(pub u64);

impl fmt::Display for ExamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Student registration identifier (globally unique).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentId(String);

impl StudentId {
    /// Validate and wrap a registration identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, ModelError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyRegistration);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StudentId {
    type Error = ModelError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<StudentId> for String {
    fn from(id: StudentId) -> Self {
        id.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Course code (e.g. `BIT 111`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseCode(String);

impl CourseCode {
    /// Validate and wrap a course code.
    pub fn new(raw: impl Into<String>) -> Result<Self, ModelError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyCourseCode);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CourseCode {
    type Error = ModelError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<CourseCode> for String {
    fn from(code: CourseCode) -> Self {
        code.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A course students enroll in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course code.
    pub code: CourseCode,
    /// Human readable title.
    #[serde(default)]
    pub name: String,
}

impl Course {
    /// Create a course with an empty title.
    pub fn new(code: CourseCode) -> Self {
        Self { code, name: String::new() }
    }

    /// Set the course title.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// A registered student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Registration identifier.
    pub registration: StudentId,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Contact address.
    #[serde(default)]
    pub email: String,
    /// Whether the student needs an accessible room.
    #[serde(default)]
    pub accessibility: bool,
    /// Free-text description of the accessibility need.
    #[serde(default)]
    pub accessibility_details: Option<String>,
    /// Courses the student is enrolled in.
    #[serde(default)]
    pub courses: BTreeSet<CourseCode>,
}

impl Student {
    /// Create a student with no enrollments and no accessibility need.
    pub fn new(registration: StudentId) -> Self {
        Self {
            registration,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            accessibility: false,
            accessibility_details: None,
            courses: BTreeSet::new(),
        }
    }

    /// Set the accessibility flag.
    #[must_use]
    pub fn with_accessibility(mut self, accessibility: bool) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Add an enrollment.
    #[must_use]
    pub fn enrolled_in(mut self, course: CourseCode) -> Self {
        self.courses.insert(course);
        self
    }

    /// Whether the student takes the given course.
    pub fn is_enrolled(&self, course: &CourseCode) -> bool {
        self.courses.contains(course)
    }
}

/// A scheduled sitting of one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    /// Exam identifier.
    pub id: ExamId,
    /// Course whose enrolled students sit this exam.
    pub course: CourseCode,
    /// Start of the sitting. Clashes are detected on exact equality.
    pub starts_at: DateTime<Utc>,
    /// Length of the sitting in minutes.
    pub duration_minutes: u32,
}

impl Exam {
    /// End of the sitting, or `None` if it falls outside the representable
    /// calendar.
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        self.starts_at.checked_add_signed(TimeDelta::minutes(i64::from(self.duration_minutes)))
    }
}

/// A physical room seats can be assigned in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier.
    pub id: RoomId,
    /// Display name (e.g. `LT-1`).
    #[serde(default)]
    pub name: String,
    /// Number of seats.
    pub capacity: NonZeroU32,
    /// Whether the room is accessible.
    #[serde(default)]
    pub accessible: bool,
}

impl Room {
    /// Create an inaccessible room.
    pub fn new(id: RoomId, name: impl Into<String>, capacity: u32) -> Result<Self, ModelError> {
        let capacity = NonZeroU32::new(capacity).ok_or(ModelError::ZeroCapacity { room: id.0 })?;
        Ok(Self { id, name: name.into(), capacity, accessible: false })
    }

    /// Set the accessibility flag.
    #[must_use]
    pub fn with_accessibility(mut self, accessible: bool) -> Self {
        self.accessible = accessible;
        self
    }
}

/// One student's seat for one exam.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeatAssignment {
    /// Exam the seat belongs to.
    pub exam: ExamId,
    /// Seated student.
    pub student: StudentId,
    /// Room the seat is in.
    pub room: RoomId,
    /// Seat label within the room, `"1"` for the first seat filled.
    pub seat: String,
    /// Start of the exam, copied from [`Exam::starts_at`].
    pub starts_at: DateTime<Utc>,
}

impl SeatAssignment {
    /// Numeric value of the seat label, if it is numeric.
    pub fn seat_number(&self) -> Option<u32> {
        self.seat.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn student_id_rejects_blank() {
        assert_eq!(StudentId::new("   "), Err(ModelError::EmptyRegistration));
        assert_eq!(StudentId::new(""), Err(ModelError::EmptyRegistration));
    }

    #[test]
    fn student_id_trims_whitespace() {
        let id = StudentId::new("  S-001 ").unwrap();
        assert_eq!(id.as_str(), "S-001");
    }

    #[test]
    fn course_code_rejects_blank() {
        assert_eq!(CourseCode::new("\t"), Err(ModelError::EmptyCourseCode));
    }

    #[test]
    fn room_rejects_zero_capacity() {
        let result = Room::new(RoomId(9), "broom cupboard", 0);
        assert_eq!(result, Err(ModelError::ZeroCapacity { room: 9 }));
    }

    #[test]
    fn exam_end_adds_duration() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let exam = Exam {
            id: ExamId(1),
            course: CourseCode::new("BIT 111").unwrap(),
            starts_at: start,
            duration_minutes: 90,
        };
        assert_eq!(exam.ends_at(), Some(Utc.with_ymd_and_hms(2025, 6, 2, 10, 30, 0).unwrap()));
    }

    #[test]
    fn student_deserializes_with_defaults() {
        let student: Student =
            serde_json::from_str(r#"{"registration":"S-1","courses":["BIT 111"]}"#).unwrap();
        assert!(!student.accessibility);
        assert!(student.is_enrolled(&CourseCode::new("BIT 111").unwrap()));
    }

    #[test]
    fn room_capacity_zero_fails_deserialization() {
        let room: Result<Room, _> = serde_json::from_str(r#"{"id":1,"capacity":0}"#);
        assert!(room.is_err());
    }

    #[test]
    fn seat_number_parses_label() {
        let assignment = SeatAssignment {
            exam: ExamId(1),
            student: StudentId::new("S-1").unwrap(),
            room: RoomId(1),
            seat: "12".to_owned(),
            starts_at: Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap(),
        };
        assert_eq!(assignment.seat_number(), Some(12));
    }
}
