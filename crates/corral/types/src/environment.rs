//! Desired-state records
//!
//! [`Environment`] and [`EnvironmentRevision`] are owned by the environment
//! repository. The reconciliation core only ever reads them.

use crate::ids::{EnvironmentId, RevisionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Placement shape of an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnvironmentType {
    /// Exactly one task somewhere in the cluster
    SingleTask,
    /// One task on every eligible container instance
    Daemon,
}

impl fmt::Display for EnvironmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentType::SingleTask => f.write_str("SingleTask"),
            EnvironmentType::Daemon => f.write_str("Daemon"),
        }
    }
}

/// Deployment method tag
///
/// Kept as an open string so a method unknown to this build still reaches the
/// scheduler registry and fails there instead of at deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentMethod(String);

impl DeploymentMethod {
    /// Stop every outdated task first, then start the replacement.
    pub const REPLACE_AFTER_TERMINATE: &'static str = "ReplaceAfterTerminate";

    pub fn new(method: impl Into<String>) -> Self {
        Self(method.into())
    }

    pub fn replace_after_terminate() -> Self {
        Self::new(Self::REPLACE_AFTER_TERMINATE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeploymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeploymentMethod {
    fn from(method: &str) -> Self {
        Self::new(method)
    }
}

/// Policy knobs for a deployment method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfiguration {
    /// Lower bound on running tasks during a deployment, as a percentage of
    /// the desired count
    #[serde(default = "default_min_healthy_percent")]
    pub min_healthy_percent: u32,

    /// Upper bound on running tasks during a deployment, as a percentage of
    /// the desired count
    #[serde(default = "default_max_running_percent")]
    pub max_running_percent: u32,
}

impl Default for DeploymentConfiguration {
    fn default() -> Self {
        Self {
            min_healthy_percent: default_min_healthy_percent(),
            max_running_percent: default_max_running_percent(),
        }
    }
}

fn default_min_healthy_percent() -> u32 {
    100
}

fn default_max_running_percent() -> u32 {
    200
}

/// Health as last reported for the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnvironmentHealth {
    Healthy,
    Unhealthy,
}

/// Lifecycle status of the environment record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnvironmentStatus {
    Active,
    Inactive,
    Deleting,
}

/// Desired-state record for an environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub environment_id: EnvironmentId,

    /// IAM-style role the environment's tasks assume
    #[serde(default)]
    pub role: String,

    pub environment_type: EnvironmentType,
    pub deployment_method: DeploymentMethod,

    #[serde(default)]
    pub deployment_configuration: DeploymentConfiguration,

    pub environment_health: EnvironmentHealth,
    pub environment_status: EnvironmentStatus,

    /// `None` until a revision has been deployed
    #[serde(default)]
    pub active_environment_revision_id: Option<RevisionId>,

    pub created_time: DateTime<Utc>,
    pub last_updated_time: DateTime<Utc>,

    /// Optimistic concurrency counter, bumped by the repository on every write
    #[serde(default)]
    pub version: u64,
}

impl Environment {
    /// A fresh, healthy, active environment with no deployed revision
    pub fn new(
        environment_id: EnvironmentId,
        environment_type: EnvironmentType,
        deployment_method: DeploymentMethod,
    ) -> Self {
        let now = Utc::now();
        Self {
            environment_id,
            role: String::new(),
            environment_type,
            deployment_method,
            deployment_configuration: DeploymentConfiguration::default(),
            environment_health: EnvironmentHealth::Healthy,
            environment_status: EnvironmentStatus::Active,
            active_environment_revision_id: None,
            created_time: now,
            last_updated_time: now,
            version: 0,
        }
    }

    pub fn with_active_revision(mut self, revision_id: impl Into<RevisionId>) -> Self {
        self.active_environment_revision_id = Some(revision_id.into());
        self
    }
}

/// Immutable desired-state payload
///
/// A revision is never edited. Deploying new work means creating a new
/// revision and pointing the environment's active revision at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentRevision {
    pub environment_id: EnvironmentId,
    pub environment_revision_id: RevisionId,

    /// Task definition reference (e.g. an ARN) started for this revision
    pub task_definition: String,

    /// `key=value` constraints a container instance must carry to host a task
    #[serde(default)]
    pub instance_attributes: BTreeMap<String, String>,

    pub created_time: DateTime<Utc>,

    #[serde(default)]
    pub version: u64,
}

impl EnvironmentRevision {
    pub fn new(
        environment_id: EnvironmentId,
        environment_revision_id: impl Into<RevisionId>,
        task_definition: impl Into<String>,
    ) -> Self {
        Self {
            environment_id,
            environment_revision_id: environment_revision_id.into(),
            task_definition: task_definition.into(),
            instance_attributes: BTreeMap::new(),
            created_time: Utc::now(),
            version: 0,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.instance_attributes.insert(key.into(), value.into());
        self
    }
}
