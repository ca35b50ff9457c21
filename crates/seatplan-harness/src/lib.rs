//! Deterministic test harness for seat allocation.
//!
//! Seeded scenario generation plus a reference model of the allocator, so
//! the real allocator can be checked against an obviously-correct oracle on
//! arbitrary inputs.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation for model-based
//! testing. Operations are applied to both the model and the real allocator
//! (wrapped by [`SimWorld`]), and their observable states are compared.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod setup;
pub mod sim_world;

pub use model::{
    ModelCourse, ModelExam, ModelRoom, ModelStudent, ModelWorld, ObservableState, Operation,
    OperationError, OperationResult, SeatRow,
};
pub use setup::{ExamSpec, RoomSpec, Setup};
pub use sim_world::SimWorld;
