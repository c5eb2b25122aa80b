//! Cluster control plane boundary
//!
//! Actions reach the cluster only through [`ClusterControlPlane`]. The
//! protocol behind it is opaque to the engine; it only observes success or
//! failure.

use crate::error::ControlPlaneError;
use async_trait::async_trait;
use corral_types::{ClusterSnapshot, ContainerInstance, Task, TaskStatus};
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Operations the engine needs from a cluster
#[async_trait]
pub trait ClusterControlPlane: Send + Sync {
    /// Start one task of `task_definition` on a container instance
    ///
    /// Returns the arn of the started task.
    async fn start_task(
        &self,
        cluster: &str,
        container_instance_arn: &str,
        task_definition: &str,
        group: &str,
    ) -> Result<String, ControlPlaneError>;

    /// Stop a task. Stopping an already stopped task succeeds.
    async fn stop_task(&self, cluster: &str, task_arn: &str) -> Result<(), ControlPlaneError>;
}

/// In-memory control plane for a single cluster
///
/// Keeps every task it has seen, including stopped ones, and can be told to
/// reject specific operations.
pub struct InMemoryControlPlane {
    instances: DashMap<String, ContainerInstance>,
    tasks: DashMap<String, Task>,
    failing_instances: DashSet<String>,
    failing_stops: DashSet<String>,
    starts: AtomicU64,
    stops: AtomicU64,
}

impl InMemoryControlPlane {
    pub fn new() -> Self {
        Self {
            instances: DashMap::new(),
            tasks: DashMap::new(),
            failing_instances: DashSet::new(),
            failing_stops: DashSet::new(),
            starts: AtomicU64::new(0),
            stops: AtomicU64::new(0),
        }
    }

    pub fn register_instance(&self, instance: ContainerInstance) {
        self.instances
            .insert(instance.container_instance_arn.clone(), instance);
    }

    /// Record a task that is already placed, e.g. from an earlier deployment
    pub fn seed_task(&self, task: Task) {
        self.tasks.insert(task.task_arn.clone(), task);
    }

    /// Reject every start on the given instance
    pub fn fail_starts_on(&self, container_instance_arn: impl Into<String>) {
        self.failing_instances.insert(container_instance_arn.into());
    }

    /// Reject every stop of the given task
    pub fn fail_stops_of(&self, task_arn: impl Into<String>) {
        self.failing_stops.insert(task_arn.into());
    }

    pub fn task(&self, task_arn: &str) -> Option<Task> {
        self.tasks.get(task_arn).map(|t| t.clone())
    }

    /// Number of successful `start_task` calls
    pub fn started_count(&self) -> u64 {
        self.starts.load(Ordering::SeqCst)
    }

    /// Number of successful `stop_task` calls
    pub fn stopped_count(&self) -> u64 {
        self.stops.load(Ordering::SeqCst)
    }

    /// Current state as a snapshot, ordered by arn
    pub fn snapshot(&self, cluster_name: &str) -> ClusterSnapshot {
        let mut instances: Vec<_> = self.instances.iter().map(|i| i.clone()).collect();
        instances.sort_by(|a, b| a.container_instance_arn.cmp(&b.container_instance_arn));

        let mut tasks: Vec<_> = self.tasks.iter().map(|t| t.clone()).collect();
        tasks.sort_by(|a, b| a.task_arn.cmp(&b.task_arn));

        ClusterSnapshot::new(cluster_name, instances, tasks)
    }
}

impl Default for InMemoryControlPlane {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClusterControlPlane for InMemoryControlPlane {
    async fn start_task(
        &self,
        cluster: &str,
        container_instance_arn: &str,
        task_definition: &str,
        group: &str,
    ) -> Result<String, ControlPlaneError> {
        let instance = self
            .instances
            .get(container_instance_arn)
            .ok_or_else(|| ControlPlaneError::InstanceNotFound(container_instance_arn.into()))?;

        if !instance.is_active() || self.failing_instances.contains(container_instance_arn) {
            return Err(ControlPlaneError::Rejected(format!(
                "cannot place task on {}",
                container_instance_arn
            )));
        }

        let task_arn = format!("arn:task/{}/{}", cluster, uuid::Uuid::new_v4());
        let mut task = Task::running(&task_arn, container_instance_arn, task_definition);
        task.group = Some(group.to_string());
        self.tasks.insert(task_arn.clone(), task);
        self.starts.fetch_add(1, Ordering::SeqCst);

        info!(
            task_arn = %task_arn,
            container_instance_arn = %container_instance_arn,
            task_definition = %task_definition,
            "Task started"
        );

        Ok(task_arn)
    }

    async fn stop_task(&self, _cluster: &str, task_arn: &str) -> Result<(), ControlPlaneError> {
        if self.failing_stops.contains(task_arn) {
            return Err(ControlPlaneError::Rejected(format!(
                "cannot stop {}",
                task_arn
            )));
        }

        let mut task = self
            .tasks
            .get_mut(task_arn)
            .ok_or_else(|| ControlPlaneError::TaskNotFound(task_arn.into()))?;

        if task.status == TaskStatus::Stopped {
            debug!(task_arn = %task_arn, "Task already stopped");
            return Ok(());
        }

        task.status = TaskStatus::Stopped;
        self.stops.fetch_add(1, Ordering::SeqCst);

        info!(task_arn = %task_arn, "Task stopped");

        Ok(())
    }
}
