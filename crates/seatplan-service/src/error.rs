//! Service error types.

use seatplan_core::ExamId;
use thiserror::Error;

use crate::{catalog::CatalogError, storage::StorageError};

/// Errors that halt an allocation run.
///
/// Clashes, room shortages and accessibility mismatches are not errors; they
/// are reported in the `AllocationReport`.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// The exam identifier does not resolve. Nothing was changed.
    #[error("exam not found: {0}")]
    ExamNotFound(ExamId),

    /// Reading exams, rosters or rooms failed. Nothing was changed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The assignment store failed mid-run.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AllocationError {
    /// Whether the failure happened before any assignment was touched.
    pub fn is_side_effect_free(&self) -> bool {
        matches!(self, Self::ExamNotFound(_) | Self::Catalog(_))
    }
}

/// Errors from the `seatplan` runtime.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Snapshot could not be loaded.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] CatalogError),

    /// Pre-existing assignments could not be seeded.
    #[error("seeding error: {0}")]
    Seed(#[from] StorageError),

    /// An allocation run failed.
    #[error("allocation error: {0}")]
    Allocation(#[from] AllocationError),

    /// Writing the result failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// Encoding the result failed.
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exam_not_found_is_side_effect_free() {
        let err = AllocationError::ExamNotFound(ExamId(12));
        assert!(err.is_side_effect_free());
        assert_eq!(err.to_string(), "exam not found: 12");
    }

    #[test]
    fn storage_failure_is_not_side_effect_free() {
        let err = AllocationError::from(StorageError::Unavailable("down".to_owned()));
        assert!(!err.is_side_effect_free());
    }
}
