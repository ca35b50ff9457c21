//! Model world: the reference allocator.
//!
//! The world holds the model's view of students, rooms and seats and
//! applies operations to it. It is the oracle against which the real
//! allocator is verified.

use std::{
    cmp::Reverse,
    collections::{BTreeMap, BTreeSet},
};

use seatplan_core::{AllocationPolicy, ReportCounts};

use super::operation::{
    ModelCourse, ModelExam, ModelRoom, ModelStudent, Operation, OperationError, OperationResult,
};
use crate::setup::{ExamSpec, RoomSpec, Setup, registration};

/// One seat assignment, in real identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SeatRow {
    /// Real exam id.
    pub exam: u64,
    /// Registration string.
    pub student: String,
    /// Real room id.
    pub room: u64,
    /// Seat label.
    pub seat: String,
}

/// Observable state for oracle comparison.
///
/// Every stored assignment, sorted, so the model and the real store can be
/// compared directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// All assignments across exams.
    pub assignments: Vec<SeatRow>,
}

#[derive(Debug, Clone)]
struct ModelStudentState {
    flagged: bool,
    courses: BTreeSet<ModelCourse>,
}

/// Model world, the reference implementation.
#[derive(Debug, Clone)]
pub struct ModelWorld {
    courses: u8,
    students: Vec<ModelStudentState>,
    rooms: Vec<RoomSpec>,
    exams: Vec<ExamSpec>,
    policy: AllocationPolicy,
    /// (exam, student) -> (room, seat number)
    seats: BTreeMap<(ModelExam, ModelStudent), (ModelRoom, u32)>,
}

impl ModelWorld {
    /// Create a model world from a setup.
    pub fn new(setup: &Setup) -> Self {
        let students = (0..setup.students)
            .map(|s| ModelStudentState {
                flagged: setup.flagged.contains(&s),
                courses: setup
                    .enrollments
                    .iter()
                    .filter(|(e, _)| *e == s)
                    .map(|(_, c)| *c)
                    .collect(),
            })
            .collect();

        Self {
            courses: setup.courses,
            students,
            rooms: setup.rooms.clone(),
            exams: setup.exams.clone(),
            policy: setup.policy,
            seats: BTreeMap::new(),
        }
    }

    /// Apply an operation and return the result.
    ///
    /// The result should match the real implementation's result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        match *op {
            Operation::Allocate { exam } => self.apply_allocate(exam),
            Operation::Enroll { student, course } => {
                if course >= self.courses {
                    return OperationResult::Error(OperationError::UnknownCourse);
                }
                self.with_student(student, |s| {
                    s.courses.insert(course);
                })
            },
            Operation::Withdraw { student, course } => self.with_student(student, |s| {
                s.courses.remove(&course);
            }),
            Operation::SetAccessibility { student, flagged } => {
                self.with_student(student, |s| s.flagged = flagged)
            },
            Operation::AddRoom { room, capacity, accessible } => {
                if capacity == 0 {
                    return OperationResult::Error(OperationError::InvalidCapacity);
                }
                if self.rooms.iter().any(|r| r.id == room) {
                    return OperationResult::Error(OperationError::DuplicateRoom);
                }
                self.rooms.push(RoomSpec { id: room, capacity, accessible });
                OperationResult::Ok
            },
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        let assignments = self
            .seats
            .iter()
            .map(|(&(exam, student), &(room, seat))| SeatRow {
                exam: u64::from(exam) + 1,
                student: registration(student),
                room: u64::from(room) + 1,
                seat: seat.to_string(),
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        ObservableState { assignments }
    }

    /// Seats currently held by a student, as (exam, room, seat number).
    pub fn seats_of(&self, student: ModelStudent) -> Vec<(ModelExam, ModelRoom, u32)> {
        self.seats
            .iter()
            .filter(|((_, s), _)| *s == student)
            .map(|(&(exam, _), &(room, seat))| (exam, room, seat))
            .collect()
    }

    fn with_student(
        &mut self,
        student: ModelStudent,
        update: impl FnOnce(&mut ModelStudentState),
    ) -> OperationResult {
        match self.students.get_mut(usize::from(student)) {
            Some(state) => {
                update(state);
                OperationResult::Ok
            },
            None => OperationResult::Error(OperationError::UnknownStudent),
        }
    }

    /// Reference allocation.
    ///
    /// Every seat of every room is laid out in one list (accessible rooms
    /// first, then larger rooms, otherwise inventory order) and handed out
    /// front to back.
    fn apply_allocate(&mut self, exam: ModelExam) -> OperationResult {
        let Some(&target) = self.exams.get(usize::from(exam)) else {
            return OperationResult::Error(OperationError::ExamNotFound);
        };

        self.seats.retain(|&(e, _), _| e != exam);

        let roster: Vec<ModelStudent> = (0..=ModelStudent::MAX)
            .zip(&self.students)
            .filter(|(_, s)| s.courses.contains(&target.course))
            .map(|(id, _)| id)
            .collect();
        let flagged = |id: &ModelStudent| self.students[usize::from(*id)].flagged;
        let queue: Vec<ModelStudent> = roster
            .iter()
            .copied()
            .filter(|id| flagged(id))
            .chain(roster.iter().copied().filter(|id| !flagged(id)))
            .collect();

        let mut rooms = self.rooms.clone();
        rooms.sort_by_key(|r| (Reverse(r.accessible), Reverse(r.capacity)));
        let layout: Vec<(ModelRoom, u32, bool)> = rooms
            .iter()
            .flat_map(|r| (1..=u32::from(r.capacity)).map(move |seat| (r.id, seat, r.accessible)))
            .collect();

        let mut counts = ReportCounts::default();
        let mut next = 0;
        let mut exhausted = false;

        for student in queue {
            if exhausted {
                counts.unseated += 1;
                continue;
            }
            if self.clashes(student, exam, target.slot) {
                counts.conflicted += 1;
                continue;
            }
            let Some(&(room, seat, accessible)) = layout.get(next) else {
                exhausted = true;
                counts.unseated += 1;
                continue;
            };
            if flagged(&student) && !accessible && self.policy.strict_accessibility {
                counts.no_accessible_seat += 1;
                continue;
            }

            self.seats.insert((exam, student), (room, seat));
            next += 1;
            counts.assigned += 1;
        }

        OperationResult::Allocated(counts)
    }

    fn clashes(&self, student: ModelStudent, exam: ModelExam, slot: u8) -> bool {
        self.seats.keys().any(|&(e, s)| {
            s == student
                && e != exam
                && self.exams.get(usize::from(e)).is_some_and(|other| other.slot == slot)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Setup {
        Setup {
            students: 3,
            courses: 2,
            flagged: vec![2],
            enrollments: vec![(0, 0), (1, 0), (2, 0), (0, 1)],
            rooms: vec![
                RoomSpec { id: 0, capacity: 1, accessible: false },
                RoomSpec { id: 1, capacity: 1, accessible: true },
            ],
            exams: vec![ExamSpec { course: 0, slot: 0 }, ExamSpec { course: 1, slot: 0 }],
            policy: AllocationPolicy::default(),
        }
    }

    #[test]
    fn flagged_student_first_in_accessible_room() {
        let mut world = ModelWorld::new(&setup());

        let result = world.apply(&Operation::Allocate { exam: 0 });

        assert_eq!(
            result,
            OperationResult::Allocated(ReportCounts {
                assigned: 2,
                conflicted: 0,
                unseated: 1,
                no_accessible_seat: 0,
            })
        );
        assert_eq!(world.seats_of(2), [(0, 1, 1)]);
        assert_eq!(world.seats_of(0), [(0, 0, 1)]);
    }

    #[test]
    fn same_slot_clashes() {
        let mut world = ModelWorld::new(&setup());
        world.apply(&Operation::Allocate { exam: 0 });

        let result = world.apply(&Operation::Allocate { exam: 1 });

        assert_eq!(
            result,
            OperationResult::Allocated(ReportCounts {
                assigned: 0,
                conflicted: 1,
                unseated: 0,
                no_accessible_seat: 0,
            })
        );
    }

    #[test]
    fn mutations_validate_indices() {
        let mut world = ModelWorld::new(&setup());

        assert_eq!(
            world.apply(&Operation::Enroll { student: 9, course: 0 }),
            OperationResult::Error(OperationError::UnknownStudent)
        );
        assert_eq!(
            world.apply(&Operation::Enroll { student: 0, course: 9 }),
            OperationResult::Error(OperationError::UnknownCourse)
        );
        assert_eq!(
            world.apply(&Operation::AddRoom { room: 0, capacity: 3, accessible: false }),
            OperationResult::Error(OperationError::DuplicateRoom)
        );
        assert_eq!(
            world.apply(&Operation::AddRoom { room: 5, capacity: 0, accessible: false }),
            OperationResult::Error(OperationError::InvalidCapacity)
        );
        assert_eq!(
            world.apply(&Operation::Allocate { exam: 7 }),
            OperationResult::Error(OperationError::ExamNotFound)
        );
    }
}
