//! Scheduler-facing projection of desired state

use crate::environment::{
    DeploymentConfiguration, DeploymentMethod, Environment, EnvironmentRevision, EnvironmentType,
};
use crate::ids::RevisionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Environment plus its active revision, flattened for schedulers
///
/// Built fresh for every pass and only when an active revision exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentDescription {
    pub cluster_name: String,
    pub environment_name: String,
    pub active_environment_revision_id: RevisionId,
    pub environment_type: EnvironmentType,
    pub task_definition_arn: String,
    pub deployment_method: DeploymentMethod,

    #[serde(default)]
    pub instance_attributes: BTreeMap<String, String>,

    #[serde(default)]
    pub deployment_configuration: DeploymentConfiguration,
}

impl EnvironmentDescription {
    /// Combine an environment with the revision its active pointer names.
    ///
    /// Returns `None` when the environment has no active revision.
    pub fn from_parts(environment: &Environment, revision: &EnvironmentRevision) -> Option<Self> {
        let active = environment.active_environment_revision_id.clone()?;

        Some(Self {
            cluster_name: environment.environment_id.cluster.clone(),
            environment_name: environment.environment_id.environment_name.clone(),
            active_environment_revision_id: active,
            environment_type: environment.environment_type,
            task_definition_arn: revision.task_definition.clone(),
            deployment_method: environment.deployment_method.clone(),
            instance_attributes: revision.instance_attributes.clone(),
            deployment_configuration: environment.deployment_configuration.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EnvironmentId;

    #[test]
    fn test_from_parts() {
        let id = EnvironmentId::new("123456789012", "cluster1", "environment1");
        let env = Environment::new(
            id.clone(),
            EnvironmentType::SingleTask,
            DeploymentMethod::replace_after_terminate(),
        )
        .with_active_revision("1");
        let revision = EnvironmentRevision::new(id, "1", "arn:::::task:1");

        let description = EnvironmentDescription::from_parts(&env, &revision).unwrap();
        assert_eq!(description.cluster_name, "cluster1");
        assert_eq!(description.environment_name, "environment1");
        assert_eq!(description.active_environment_revision_id, RevisionId::new("1"));
        assert_eq!(description.task_definition_arn, "arn:::::task:1");
        assert_eq!(description.deployment_method.as_str(), "ReplaceAfterTerminate");
    }

    #[test]
    fn test_from_parts_without_active_revision() {
        let id = EnvironmentId::new("123456789012", "cluster1", "environment1");
        let env = Environment::new(
            id.clone(),
            EnvironmentType::Daemon,
            DeploymentMethod::replace_after_terminate(),
        );
        let revision = EnvironmentRevision::new(id, "1", "arn:::::task:1");

        assert!(EnvironmentDescription::from_parts(&env, &revision).is_none());
    }
}
