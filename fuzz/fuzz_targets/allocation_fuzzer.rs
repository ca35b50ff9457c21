//! Fuzz target for the allocator against the reference model
//!
//! Catch divergence between the fill loop and the naive seat-list model
//!
//! # Strategy
//!
//! - Setup: seeded random catalog (students, enrollments, rooms, exams)
//! - Operation sequences: allocation runs interleaved with enrollment,
//!   inventory and accessibility changes
//! - Out-of-range indices: unknown students, courses, exams and rooms
//!
//! # Invariants
//!
//! - Every operation returns the same result in model and real allocator
//! - Stored seats are identical after every operation
//! - NEVER panic on any operation sequence

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use seatplan_harness::{ModelWorld, Operation, Setup, SimWorld};

#[derive(Debug, Arbitrary)]
struct Input {
    seed: u64,
    ops: Vec<Operation>,
}

fuzz_target!(|input: Input| {
    let setup = Setup::random(input.seed);
    let mut model = ModelWorld::new(&setup);
    let Ok(mut real) = SimWorld::new(&setup) else {
        panic!("generated setup rejected: {setup:?}");
    };

    for op in input.ops.iter().take(64) {
        let expected = model.apply(op);
        let actual = real.apply(op);
        assert_eq!(expected, actual, "result divergence on {op:?}");
        assert_eq!(model.observable_state(), real.observable_state(), "state divergence on {op:?}");
    }
});
