//! Input providers: exams, rosters and rooms.
//!
//! The allocator only sees these traits, so the roster can come from course
//! enrollment, an explicit exam list, or any external system without
//! touching allocation logic. [`Catalog`] is the in-memory implementation.

use std::{collections::BTreeMap, path::PathBuf};

use chrono::{DateTime, Utc};
use seatplan_core::{
    Course, CourseCode, Exam, ExamId, ModelError, Room, RoomId, SeatAssignment, Student,
    StudentId,
};
use thiserror::Error;

/// Errors from input providers.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Course code registered twice.
    #[error("duplicate course: {0}")]
    DuplicateCourse(CourseCode),

    /// Registration identifier registered twice.
    #[error("duplicate student: {0}")]
    DuplicateStudent(StudentId),

    /// Room identifier registered twice.
    #[error("duplicate room: {0}")]
    DuplicateRoom(RoomId),

    /// Exam identifier registered twice.
    #[error("duplicate exam: {0}")]
    DuplicateExam(ExamId),

    /// An exam or enrollment references a course that does not exist.
    #[error("unknown course {course} referenced by {referenced_by}")]
    UnknownCourse {
        /// Missing course code.
        course: CourseCode,
        /// Who referenced it.
        referenced_by: String,
    },

    /// Student lookup failed.
    #[error("unknown student: {0}")]
    UnknownStudent(StudentId),

    /// An assignment references an exam that is not scheduled.
    #[error("unknown exam: {0}")]
    UnknownExam(ExamId),

    /// An assignment references a room missing from the inventory.
    #[error("unknown room: {0}")]
    UnknownRoom(RoomId),

    /// An assignment was recorded for a different start instant than the
    /// exam is scheduled at.
    #[error("exam {exam} starts at {scheduled}, assignment of {student} says {recorded}")]
    StaleAssignment {
        /// The exam.
        exam: ExamId,
        /// The seated student.
        student: StudentId,
        /// Start instant carried by the assignment.
        recorded: DateTime<Utc>,
        /// Start instant of the scheduled exam.
        scheduled: DateTime<Utc>,
    },

    /// A value failed domain validation.
    #[error("invalid value: {0}")]
    Invalid(#[from] ModelError),

    /// Snapshot file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Snapshot document is malformed.
    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    /// External provider failure.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Resolves exam identifiers.
pub trait ExamDirectory {
    /// Look up one exam.
    fn exam(&self, id: ExamId) -> Result<Option<Exam>, CatalogError>;

    /// Every exam in schedule order (start instant, then id).
    fn exams(&self) -> Result<Vec<Exam>, CatalogError>;
}

/// Supplies the students enrolled in a course.
pub trait RosterProvider {
    /// Enrolled students in roster order.
    fn enrolled(&self, course: &CourseCode) -> Result<Vec<Student>, CatalogError>;
}

/// Supplies the room inventory.
pub trait RoomInventory {
    /// Every room in inventory order.
    fn rooms(&self) -> Result<Vec<Room>, CatalogError>;
}

/// In-memory catalog of courses, students, rooms and exams.
///
/// Enumeration order is insertion order, which is what the allocator treats
/// as "natural" order when breaking ties.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    students: Vec<Student>,
    rooms: Vec<Room>,
    exams: BTreeMap<ExamId, Exam>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a course.
    pub fn add_course(&mut self, course: Course) -> Result<(), CatalogError> {
        if self.has_course(&course.code) {
            return Err(CatalogError::DuplicateCourse(course.code));
        }
        self.courses.push(course);
        Ok(())
    }

    /// Register a student. Every enrolled course must already exist.
    pub fn add_student(&mut self, student: Student) -> Result<(), CatalogError> {
        if self.student(&student.registration).is_some() {
            return Err(CatalogError::DuplicateStudent(student.registration));
        }
        if let Some(missing) = student.courses.iter().find(|c| !self.has_course(c)) {
            return Err(CatalogError::UnknownCourse {
                course: missing.clone(),
                referenced_by: format!("student {}", student.registration),
            });
        }
        self.students.push(student);
        Ok(())
    }

    /// Register a room.
    pub fn add_room(&mut self, room: Room) -> Result<(), CatalogError> {
        if self.rooms.iter().any(|r| r.id == room.id) {
            return Err(CatalogError::DuplicateRoom(room.id));
        }
        self.rooms.push(room);
        Ok(())
    }

    /// Build and register a room from raw inventory values.
    pub fn register_room(
        &mut self,
        id: RoomId,
        name: impl Into<String>,
        capacity: u32,
        accessible: bool,
    ) -> Result<(), CatalogError> {
        let room = Room::new(id, name, capacity)?.with_accessibility(accessible);
        self.add_room(room)
    }

    /// Schedule an exam. Its course must already exist.
    pub fn add_exam(&mut self, exam: Exam) -> Result<(), CatalogError> {
        if self.exams.contains_key(&exam.id) {
            return Err(CatalogError::DuplicateExam(exam.id));
        }
        if !self.has_course(&exam.course) {
            return Err(CatalogError::UnknownCourse {
                course: exam.course,
                referenced_by: format!("exam {}", exam.id),
            });
        }
        self.exams.insert(exam.id, exam);
        Ok(())
    }

    /// Enroll a student in a course. Enrolling twice is a no-op.
    pub fn enroll(&mut self, student: &StudentId, course: &CourseCode) -> Result<(), CatalogError> {
        if !self.has_course(course) {
            return Err(CatalogError::UnknownCourse {
                course: course.clone(),
                referenced_by: format!("student {student}"),
            });
        }
        self.student_mut(student)?.courses.insert(course.clone());
        Ok(())
    }

    /// Remove an enrollment. Returns whether the student was enrolled.
    pub fn withdraw(
        &mut self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<bool, CatalogError> {
        Ok(self.student_mut(student)?.courses.remove(course))
    }

    /// Change a student's accessibility flag.
    pub fn set_accessibility(
        &mut self,
        student: &StudentId,
        accessibility: bool,
    ) -> Result<(), CatalogError> {
        self.student_mut(student)?.accessibility = accessibility;
        Ok(())
    }

    /// Look up a student.
    pub fn student(&self, registration: &StudentId) -> Option<&Student> {
        self.students.iter().find(|s| &s.registration == registration)
    }

    /// All students in registration order.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// All courses in registration order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Check that an existing assignment points at a scheduled exam, a known
    /// student and a known room, and carries the exam's start instant.
    ///
    /// The store indexes clashes by the assignment's own timestamp, so a row
    /// with a drifted start would hide a real double booking.
    pub fn check_assignment(&self, assignment: &SeatAssignment) -> Result<(), CatalogError> {
        let exam =
            self.exams.get(&assignment.exam).ok_or(CatalogError::UnknownExam(assignment.exam))?;
        if self.student(&assignment.student).is_none() {
            return Err(CatalogError::UnknownStudent(assignment.student.clone()));
        }
        if !self.rooms.iter().any(|r| r.id == assignment.room) {
            return Err(CatalogError::UnknownRoom(assignment.room));
        }
        if assignment.starts_at != exam.starts_at {
            return Err(CatalogError::StaleAssignment {
                exam: exam.id,
                student: assignment.student.clone(),
                recorded: assignment.starts_at,
                scheduled: exam.starts_at,
            });
        }
        Ok(())
    }

    fn has_course(&self, code: &CourseCode) -> bool {
        self.courses.iter().any(|c| &c.code == code)
    }

    fn student_mut(&mut self, registration: &StudentId) -> Result<&mut Student, CatalogError> {
        self.students
            .iter_mut()
            .find(|s| &s.registration == registration)
            .ok_or_else(|| CatalogError::UnknownStudent(registration.clone()))
    }
}

impl ExamDirectory for Catalog {
    fn exam(&self, id: ExamId) -> Result<Option<Exam>, CatalogError> {
        Ok(self.exams.get(&id).cloned())
    }

    fn exams(&self) -> Result<Vec<Exam>, CatalogError> {
        let mut exams: Vec<Exam> = self.exams.values().cloned().collect();
        exams.sort_by_key(|e| (e.starts_at, e.id));
        Ok(exams)
    }
}

impl RosterProvider for Catalog {
    fn enrolled(&self, course: &CourseCode) -> Result<Vec<Student>, CatalogError> {
        Ok(self.students.iter().filter(|s| s.is_enrolled(course)).cloned().collect())
    }
}

impl RoomInventory for Catalog {
    fn rooms(&self) -> Result<Vec<Room>, CatalogError> {
        Ok(self.rooms.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn code(raw: &str) -> CourseCode {
        CourseCode::new(raw).unwrap()
    }

    fn sid(raw: &str) -> StudentId {
        StudentId::new(raw).unwrap()
    }

    fn exam(id: u64, course: &str, hour: u32) -> Exam {
        Exam {
            id: ExamId(id),
            course: code(course),
            starts_at: Utc.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap(),
            duration_minutes: 60,
        }
    }

    #[test]
    fn roster_follows_enrollment_in_insertion_order() {
        let mut catalog = Catalog::new();
        catalog.add_course(Course::new(code("A"))).unwrap();
        catalog.add_course(Course::new(code("B"))).unwrap();
        catalog.add_student(Student::new(sid("s2")).enrolled_in(code("A"))).unwrap();
        catalog.add_student(Student::new(sid("s1")).enrolled_in(code("B"))).unwrap();
        catalog.add_student(Student::new(sid("s3")).enrolled_in(code("A"))).unwrap();

        let roster: Vec<String> = catalog
            .enrolled(&code("A"))
            .unwrap()
            .into_iter()
            .map(|s| s.registration.into())
            .collect();
        assert_eq!(roster, ["s2", "s3"]);
    }

    #[test]
    fn rejects_duplicates() {
        let mut catalog = Catalog::new();
        catalog.add_course(Course::new(code("A"))).unwrap();
        assert!(matches!(
            catalog.add_course(Course::new(code("A"))),
            Err(CatalogError::DuplicateCourse(_))
        ));

        catalog.add_student(Student::new(sid("s1"))).unwrap();
        assert!(matches!(
            catalog.add_student(Student::new(sid("s1"))),
            Err(CatalogError::DuplicateStudent(_))
        ));

        catalog.add_exam(exam(1, "A", 9)).unwrap();
        assert!(matches!(catalog.add_exam(exam(1, "A", 10)), Err(CatalogError::DuplicateExam(_))));
    }

    #[test]
    fn exam_requires_known_course() {
        let mut catalog = Catalog::new();
        let err = catalog.add_exam(exam(1, "NOPE", 9)).unwrap_err();
        assert_eq!(err.to_string(), "unknown course NOPE referenced by exam 1");
    }

    #[test]
    fn enroll_and_withdraw() {
        let mut catalog = Catalog::new();
        catalog.add_course(Course::new(code("A"))).unwrap();
        catalog.add_student(Student::new(sid("s1"))).unwrap();

        catalog.enroll(&sid("s1"), &code("A")).unwrap();
        assert_eq!(catalog.enrolled(&code("A")).unwrap().len(), 1);

        assert!(catalog.withdraw(&sid("s1"), &code("A")).unwrap());
        assert!(!catalog.withdraw(&sid("s1"), &code("A")).unwrap());
        assert!(catalog.enrolled(&code("A")).unwrap().is_empty());

        assert!(matches!(
            catalog.enroll(&sid("ghost"), &code("A")),
            Err(CatalogError::UnknownStudent(_))
        ));
    }

    #[test]
    fn register_room_validates_capacity() {
        let mut catalog = Catalog::new();
        assert!(matches!(
            catalog.register_room(RoomId(1), "Broom cupboard", 0, false),
            Err(CatalogError::Invalid(ModelError::ZeroCapacity { room: 1 }))
        ));

        catalog.register_room(RoomId(1), "Hall", 30, true).unwrap();
        assert!(matches!(
            catalog.register_room(RoomId(1), "Hall again", 30, true),
            Err(CatalogError::DuplicateRoom(RoomId(1)))
        ));
        assert!(catalog.rooms().unwrap()[0].accessible);
    }

    #[test]
    fn exams_in_schedule_order() {
        let mut catalog = Catalog::new();
        catalog.add_course(Course::new(code("A"))).unwrap();
        catalog.add_exam(exam(3, "A", 9)).unwrap();
        catalog.add_exam(exam(1, "A", 14)).unwrap();
        catalog.add_exam(exam(2, "A", 9)).unwrap();

        let ids: Vec<u64> = catalog.exams().unwrap().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, [2, 3, 1]);
    }
}
