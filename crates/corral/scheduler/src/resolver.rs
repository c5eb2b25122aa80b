//! Desired-state resolution

use crate::error::Result;
use corral_state::EnvironmentRepository;
use corral_types::{EnvironmentDescription, EnvironmentId};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Reads an environment and its active revision
pub struct StateResolver {
    repository: Arc<dyn EnvironmentRepository>,
}

impl StateResolver {
    pub fn new(repository: Arc<dyn EnvironmentRepository>) -> Self {
        Self { repository }
    }

    /// Build the description of what should be running
    ///
    /// `Ok(None)` means the environment has no active revision and there is
    /// nothing to converge toward; the revision store is not queried in that
    /// case. Missing records and repository failures are errors.
    #[instrument(skip(self), fields(environment_id = %environment_id))]
    pub async fn resolve(
        &self,
        environment_id: &EnvironmentId,
    ) -> Result<Option<EnvironmentDescription>> {
        let environment = self.repository.describe_environment(environment_id).await?;

        let Some(revision_id) = environment.active_environment_revision_id.as_ref() else {
            debug!("Environment has no active revision");
            return Ok(None);
        };

        let revision = self
            .repository
            .describe_environment_revision(environment_id, revision_id)
            .await?;

        debug!(
            revision_id = %revision_id,
            task_definition = %revision.task_definition,
            "Resolved active revision"
        );

        Ok(EnvironmentDescription::from_parts(&environment, &revision))
    }
}
