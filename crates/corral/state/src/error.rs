//! Repository error types

use corral_types::{EnvironmentId, RevisionId};
use thiserror::Error;

/// Repository errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Environment not found: {0}")]
    EnvironmentNotFound(EnvironmentId),

    #[error("Environment revision not found: {environment_id} revision {revision_id}")]
    RevisionNotFound {
        environment_id: EnvironmentId,
        revision_id: RevisionId,
    },

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Version conflict: current {actual}, expected {expected}")]
    VersionConflict { expected: u64, actual: u64 },

    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    /// Whether the record simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RepositoryError::EnvironmentNotFound(_) | RepositoryError::RevisionNotFound { .. }
        )
    }
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, RepositoryError>;
