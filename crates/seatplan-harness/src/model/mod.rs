//! Reference model for model-based testing.
//!
//! The model is a deliberately naive allocator: it flattens every room into
//! one list of seats and walks it with a single index. It shares no code
//! with the real fill loop and serves as the oracle the real allocator is
//! verified against.
//!
//! # Design Principles
//!
//! - Simplicity: the model should be obviously correct
//! - Independence: no `SeatCursor`, no `fill`, no store
//! - Deterministic: same inputs produce same outputs

pub mod operation;
mod world;

pub use operation::{
    ModelCourse, ModelExam, ModelRoom, ModelStudent, Operation, OperationError, OperationResult,
};
pub use world::{ModelWorld, ObservableState, SeatRow};
