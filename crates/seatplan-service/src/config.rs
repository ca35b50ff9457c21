//! Runtime configuration.

use std::path::PathBuf;

use seatplan_core::{AllocationPolicy, ExamId};

/// Allocator configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocatorConfig {
    /// Placement policy for accessibility-flagged students.
    pub policy: AllocationPolicy,
}

/// Configuration for one invocation of the `seatplan` binary.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// JSON snapshot to load.
    pub snapshot_path: PathBuf,
    /// Exams to allocate, in order. Empty means every exam in schedule
    /// order.
    pub exams: Vec<ExamId>,
    /// Where to write the JSON result. `None` writes to stdout.
    pub output: Option<PathBuf>,
    /// Allocator settings.
    pub allocator: AllocatorConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("snapshot.json"),
            exams: Vec::new(),
            output: None,
            allocator: AllocatorConfig::default(),
        }
    }
}
