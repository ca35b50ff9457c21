//! Batch runtime behind the `seatplan` binary.
//!
//! Loads a snapshot, seeds an in-memory store with its pre-existing
//! assignments and allocates the requested exams one after the other.

use std::{fs::File, io::Write};

use seatplan_core::{AllocationReport, ExamId};
use serde::Serialize;
use tracing::info;

use crate::{
    allocator::{Allocator, AttendanceEntry},
    catalog::{Catalog, ExamDirectory},
    config::RuntimeConfig,
    error::ServiceError,
    snapshot::Snapshot,
    storage::MemoryStore,
};

/// Attendance sheet of one exam.
#[derive(Debug, Clone, Serialize)]
pub struct ExamAttendance {
    /// The exam.
    pub exam: ExamId,
    /// Seated students, by room name then seat.
    pub entries: Vec<AttendanceEntry>,
}

/// Result of one runtime invocation.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// One report per allocated exam, in run order.
    pub reports: Vec<AllocationReport>,
    /// One attendance sheet per allocated exam, in run order.
    pub attendance: Vec<ExamAttendance>,
}

/// Run every exam named by `config`.
///
/// # Errors
///
/// Fails on the first snapshot, seeding or allocation error. Exams already
/// allocated by then keep their assignments in the discarded store.
pub fn execute(config: &RuntimeConfig) -> Result<RunSummary, ServiceError> {
    let snapshot = Snapshot::load(&config.snapshot_path)?;
    let store = MemoryStore::new();
    let seeded = snapshot.seed(&store)?;
    info!(path = %config.snapshot_path.display(), seeded, "snapshot loaded");

    let allocator = Allocator::new(snapshot.catalog, store, config.allocator);
    let exams = schedule(allocator.catalog(), &config.exams)?;

    let mut summary =
        RunSummary { reports: Vec::with_capacity(exams.len()), attendance: Vec::new() };
    for exam in exams {
        let report = allocator.allocate(exam)?;
        info!("{report}");
        summary.reports.push(report);
        summary.attendance.push(ExamAttendance { exam, entries: allocator.attendance(exam)? });
    }

    Ok(summary)
}

/// Write `summary` as pretty JSON to the configured output, or stdout.
pub fn write_summary(config: &RuntimeConfig, summary: &RunSummary) -> Result<(), ServiceError> {
    match &config.output {
        Some(path) => {
            let mut file = File::create(path)?;
            serde_json::to_writer_pretty(&mut file, summary)?;
            file.write_all(b"\n")?;
            info!(path = %path.display(), "result written");
        },
        None => {
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, summary)?;
            stdout.write_all(b"\n")?;
        },
    }
    Ok(())
}

fn schedule(catalog: &Catalog, requested: &[ExamId]) -> Result<Vec<ExamId>, ServiceError> {
    if requested.is_empty() {
        return Ok(catalog.exams()?.iter().map(|e| e.id).collect());
    }
    Ok(requested.to_vec())
}
