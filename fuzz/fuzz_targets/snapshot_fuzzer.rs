//! Fuzz target for snapshot parsing
//!
//! # Invariants
//!
//! - Arbitrary input is either rejected with a `CatalogError` or yields a
//!   catalog that can be allocated
//! - Seeding never panics, even with clashing pre-existing assignments
//! - NEVER panic on malformed JSON

#![no_main]

use libfuzzer_sys::fuzz_target;
use seatplan_service::{Allocator, AllocatorConfig, ExamDirectory, MemoryStore, Snapshot};

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(snapshot) = Snapshot::from_json(json) else {
        return;
    };

    let store = MemoryStore::new();
    if snapshot.seed(&store).is_err() {
        return;
    }

    let allocator = Allocator::new(snapshot.catalog, store, AllocatorConfig::default());
    let Ok(exams) = allocator.catalog().exams() else {
        return;
    };
    for exam in exams {
        let report = allocator.allocate(exam.id).expect("in-memory allocation cannot fail");
        let stored = allocator.store().load_exam(exam.id).map(|r| r.len()).ok();
        assert_eq!(stored, Some(report.counts().assigned));
    }
});
