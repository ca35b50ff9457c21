//! Real allocator wrapped behind the model's operation interface.

use seatplan_core::{CourseCode, ModelError, StudentId};
use seatplan_service::{
    AllocationError, Allocator, AllocatorConfig, Catalog, CatalogError, MemoryStore,
};

use crate::{
    model::{ModelRoom, ObservableState, Operation, OperationError, OperationResult, SeatRow},
    setup::{Setup, course_code, exam_id, room_id, student_id},
};

/// Real allocator over an in-memory catalog and store.
#[derive(Debug)]
pub struct SimWorld {
    allocator: Allocator<Catalog, MemoryStore>,
    /// Identifiers for every possible model index, so operations never
    /// need fallible id construction.
    students: Vec<StudentId>,
    courses: Vec<CourseCode>,
}

impl SimWorld {
    /// Build the real system for a setup.
    ///
    /// # Errors
    ///
    /// Fails if the setup does not form a valid catalog.
    pub fn new(setup: &Setup) -> Result<Self, CatalogError> {
        let config = AllocatorConfig { policy: setup.policy };
        let allocator = Allocator::new(setup.catalog()?, MemoryStore::new(), config);
        let students = (0..=u8::MAX).map(student_id).collect::<Result<_, ModelError>>()?;
        let courses = (0..=u8::MAX).map(course_code).collect::<Result<_, ModelError>>()?;

        Ok(Self { allocator, students, courses })
    }

    /// The wrapped allocator.
    pub fn allocator(&self) -> &Allocator<Catalog, MemoryStore> {
        &self.allocator
    }

    /// Apply an operation to the real system.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        let result = match *op {
            Operation::Allocate { exam } => {
                return match self.allocator.allocate(exam_id(exam)) {
                    Ok(report) => OperationResult::Allocated(report.counts()),
                    Err(AllocationError::ExamNotFound(_)) => {
                        OperationResult::Error(OperationError::ExamNotFound)
                    },
                    Err(AllocationError::Catalog(e)) => catalog_result(Err(e)),
                    Err(AllocationError::Storage(_)) => {
                        OperationResult::Error(OperationError::Unavailable)
                    },
                };
            },
            Operation::Enroll { student, course } => {
                let (student, course) = self.ids(student, course);
                self.allocator.catalog_mut().enroll(&student, &course)
            },
            Operation::Withdraw { student, course } => {
                let (student, course) = self.ids(student, course);
                self.allocator.catalog_mut().withdraw(&student, &course).map(drop)
            },
            Operation::SetAccessibility { student, flagged } => {
                let student = self.students[usize::from(student)].clone();
                self.allocator.catalog_mut().set_accessibility(&student, flagged)
            },
            Operation::AddRoom { room, capacity, accessible } => {
                self.add_room(room, capacity, accessible)
            },
        };

        catalog_result(result)
    }

    /// Extract observable state for comparison.
    ///
    /// A store failure yields an empty state, which will not match a
    /// non-empty model.
    pub fn observable_state(&self) -> ObservableState {
        let mut assignments: Vec<SeatRow> = self
            .allocator
            .store()
            .snapshot()
            .unwrap_or_default()
            .into_iter()
            .map(|a| SeatRow {
                exam: a.exam.0,
                student: a.student.as_str().to_owned(),
                room: a.room.0,
                seat: a.seat,
            })
            .collect();
        assignments.sort();

        ObservableState { assignments }
    }

    fn ids(&self, student: u8, course: u8) -> (StudentId, CourseCode) {
        (self.students[usize::from(student)].clone(), self.courses[usize::from(course)].clone())
    }

    fn add_room(
        &mut self,
        room: ModelRoom,
        capacity: u8,
        accessible: bool,
    ) -> Result<(), CatalogError> {
        self.allocator.catalog_mut().register_room(
            room_id(room),
            format!("R{room}"),
            u32::from(capacity),
            accessible,
        )
    }
}

fn catalog_result(result: Result<(), CatalogError>) -> OperationResult {
    match result {
        Ok(()) => OperationResult::Ok,
        Err(e) => OperationResult::Error(match e {
            CatalogError::UnknownStudent(_) => OperationError::UnknownStudent,
            CatalogError::UnknownCourse { .. } => OperationError::UnknownCourse,
            CatalogError::DuplicateRoom(_) => OperationError::DuplicateRoom,
            CatalogError::Invalid(_) => OperationError::InvalidCapacity,
            _ => OperationError::Unavailable,
        }),
    }
}
