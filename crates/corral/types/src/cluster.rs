//! Observed cluster state
//!
//! A [`ClusterSnapshot`] is a consistency snapshot, not a live view: it is
//! read once before a pass and never refreshed during it.

use crate::ids::task_group_for;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registration status of a container instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainerInstanceStatus {
    Active,
    Draining,
    Inactive,
}

/// A host able to run tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInstance {
    pub container_instance_arn: String,
    pub status: ContainerInstanceStatus,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ContainerInstance {
    pub fn active(arn: impl Into<String>) -> Self {
        Self {
            container_instance_arn: arn.into(),
            status: ContainerInstanceStatus::Active,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_status(mut self, status: ContainerInstanceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == ContainerInstanceStatus::Active
    }

    /// Whether every required attribute is present with the same value
    pub fn satisfies(&self, required: &BTreeMap<String, String>) -> bool {
        required
            .iter()
            .all(|(key, value)| self.attributes.get(key) == Some(value))
    }
}

/// Last known status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Running,
    Stopped,
}

/// A task placed on a container instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_arn: String,
    pub container_instance_arn: String,
    pub task_definition: String,

    /// Group tag; `environment:<name>` for tasks started by an environment
    #[serde(default)]
    pub group: Option<String>,

    pub status: TaskStatus,
}

impl Task {
    pub fn running(
        task_arn: impl Into<String>,
        container_instance_arn: impl Into<String>,
        task_definition: impl Into<String>,
    ) -> Self {
        Self {
            task_arn: task_arn.into(),
            container_instance_arn: container_instance_arn.into(),
            task_definition: task_definition.into(),
            group: None,
            status: TaskStatus::Running,
        }
    }

    pub fn in_environment(mut self, environment_name: &str) -> Self {
        self.group = Some(task_group_for(environment_name));
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Pending and running tasks both occupy capacity and count as live.
    pub fn is_live(&self) -> bool {
        self.status != TaskStatus::Stopped
    }
}

/// Point-in-time read of a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub cluster_name: String,

    #[serde(default)]
    pub instances: Vec<ContainerInstance>,

    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl ClusterSnapshot {
    pub fn new(
        cluster_name: impl Into<String>,
        instances: Vec<ContainerInstance>,
        tasks: Vec<Task>,
    ) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            instances,
            tasks,
        }
    }

    pub fn empty(cluster_name: impl Into<String>) -> Self {
        Self::new(cluster_name, Vec::new(), Vec::new())
    }

    /// Live tasks started on behalf of the named environment
    pub fn environment_tasks<'a>(
        &'a self,
        environment_name: &str,
    ) -> impl Iterator<Item = &'a Task> + 'a {
        let group = task_group_for(environment_name);
        self.tasks
            .iter()
            .filter(move |t| t.is_live() && t.group.as_deref() == Some(group.as_str()))
    }

    /// Active instances carrying all the required attributes, ordered by arn
    pub fn eligible_instances(
        &self,
        required: &BTreeMap<String, String>,
    ) -> Vec<&ContainerInstance> {
        let mut eligible: Vec<_> = self
            .instances
            .iter()
            .filter(|i| i.is_active() && i.satisfies(required))
            .collect();
        eligible.sort_by(|a, b| a.container_instance_arn.cmp(&b.container_instance_arn));
        eligible
    }

    pub fn instance(&self, arn: &str) -> Option<&ContainerInstance> {
        self.instances
            .iter()
            .find(|i| i.container_instance_arn == arn)
    }
}
