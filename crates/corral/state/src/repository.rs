//! Environment repository trait

use crate::error::Result;
use async_trait::async_trait;
use corral_types::{Environment, EnvironmentId, EnvironmentRevision, RevisionId};

/// Read access to desired state
#[async_trait]
pub trait EnvironmentRepository: Send + Sync {
    /// Fetch an environment, failing with `EnvironmentNotFound` when absent
    async fn describe_environment(&self, environment_id: &EnvironmentId) -> Result<Environment>;

    /// Fetch one revision of an environment, failing with `RevisionNotFound`
    /// when absent
    async fn describe_environment_revision(
        &self,
        environment_id: &EnvironmentId,
        revision_id: &RevisionId,
    ) -> Result<EnvironmentRevision>;
}
