//! Seeded scenario setup.
//!
//! A [`Setup`] is the shared starting point of the model and the real
//! allocator: the same students, enrollments, rooms and exams, described
//! with small indices so proptest can shrink them.

use chrono::{DateTime, TimeDelta, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use seatplan_core::{
    AllocationPolicy, Course, CourseCode, Exam, ExamId, ModelError, RoomId, Student, StudentId,
};
use seatplan_service::{Catalog, CatalogError};

use crate::model::{ModelCourse, ModelExam, ModelRoom, ModelStudent};

/// Exam definition: course index and start slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamSpec {
    /// Course the exam belongs to.
    pub course: ModelCourse,
    /// Start slot. Exams sharing a slot start at the same instant.
    pub slot: u8,
}

/// Room definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomSpec {
    /// Room index.
    pub id: ModelRoom,
    /// Seat count (zero is rejected by the catalog).
    pub capacity: u8,
    /// Wheelchair accessible.
    pub accessible: bool,
}

/// Starting state of a simulated deployment.
#[derive(Debug, Clone)]
pub struct Setup {
    /// Number of students, indexed `0..students`.
    pub students: u8,
    /// Number of courses, indexed `0..courses`.
    pub courses: u8,
    /// Students with the accessibility flag.
    pub flagged: Vec<ModelStudent>,
    /// (student, course) enrollments.
    pub enrollments: Vec<(ModelStudent, ModelCourse)>,
    /// Initial room inventory.
    pub rooms: Vec<RoomSpec>,
    /// Scheduled exams, indexed by position.
    pub exams: Vec<ExamSpec>,
    /// Placement policy.
    pub policy: AllocationPolicy,
}

impl Setup {
    /// Generate a small scenario from a seed.
    ///
    /// Start slots are drawn from three values so same-instant clashes are
    /// common, and total capacity is often below demand.
    pub fn random(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let students = rng.gen_range(1..=12u8);
        let courses = rng.gen_range(1..=3u8);

        let flagged = (0..students).filter(|_| rng.gen_bool(0.25)).collect();
        let mut enrollments = Vec::new();
        for student in 0..students {
            for course in 0..courses {
                if rng.gen_bool(0.6) {
                    enrollments.push((student, course));
                }
            }
        }

        let rooms = (0..rng.gen_range(0..=3u8))
            .map(|id| RoomSpec {
                id,
                capacity: rng.gen_range(1..=6),
                accessible: rng.gen_bool(0.4),
            })
            .collect();

        let exams = (0..rng.gen_range(1..=4u8))
            .map(|_| ExamSpec { course: rng.gen_range(0..courses), slot: rng.gen_range(0..3) })
            .collect();

        let policy = AllocationPolicy { strict_accessibility: rng.gen_bool(0.3) };

        Self { students, courses, flagged, enrollments, rooms, exams, policy }
    }

    /// Build the real catalog for this setup.
    ///
    /// # Errors
    ///
    /// Fails if the setup itself is inconsistent (a zero-capacity room, a
    /// duplicate room index, an exam for a missing course).
    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        let mut catalog = Catalog::new();

        for course in 0..self.courses {
            let code = course_code(course)?;
            catalog.add_course(Course::new(code).named(format!("Course {course}")))?;
        }

        for index in 0..self.students {
            let mut student =
                Student::new(student_id(index)?).with_accessibility(self.flagged.contains(&index));
            for &(s, course) in &self.enrollments {
                if s == index {
                    student = student.enrolled_in(course_code(course)?);
                }
            }
            catalog.add_student(student)?;
        }

        for room in &self.rooms {
            catalog.register_room(
                room_id(room.id),
                format!("R{}", room.id),
                u32::from(room.capacity),
                room.accessible,
            )?;
        }

        for (index, spec) in (0..=ModelExam::MAX).zip(&self.exams) {
            catalog.add_exam(Exam {
                id: exam_id(index),
                course: course_code(spec.course)?,
                starts_at: slot_start(spec.slot),
                duration_minutes: 120,
            })?;
        }

        Ok(catalog)
    }
}

/// Registration string of a model student.
pub fn registration(student: ModelStudent) -> String {
    format!("S-{student:03}")
}

/// Real identifier of a model student.
pub fn student_id(student: ModelStudent) -> Result<StudentId, ModelError> {
    StudentId::new(registration(student))
}

/// Real code of a model course.
pub fn course_code(course: ModelCourse) -> Result<CourseCode, ModelError> {
    CourseCode::new(format!("C{course}"))
}

/// Real identifier of a model exam. Real ids start at 1.
pub fn exam_id(exam: ModelExam) -> ExamId {
    ExamId(u64::from(exam) + 1)
}

/// Real identifier of a model room. Real ids start at 1.
pub fn room_id(room: ModelRoom) -> RoomId {
    RoomId(u64::from(room) + 1)
}

/// Start instant of a slot, one hour apart.
pub fn slot_start(slot: u8) -> DateTime<Utc> {
    DateTime::<Utc>::default() + TimeDelta::hours(i64::from(slot))
}
