//! Built-in scheduling actions

use crate::action::{ActionContext, SchedulingAction};
use crate::error::ActionError;
use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

/// Start one task on a specific container instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTask {
    pub container_instance_arn: String,
    pub task_definition: String,
    pub group: String,
}

impl StartTask {
    pub fn new(
        container_instance_arn: impl Into<String>,
        task_definition: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            container_instance_arn: container_instance_arn.into(),
            task_definition: task_definition.into(),
            group: group.into(),
        }
    }
}

#[async_trait]
impl SchedulingAction for StartTask {
    async fn execute(&self, ctx: &ActionContext) -> Result<bool, ActionError> {
        let task_arn = ctx
            .control_plane
            .start_task(
                &ctx.cluster_name,
                &self.container_instance_arn,
                &self.task_definition,
                &self.group,
            )
            .await?;

        debug!(task_arn = %task_arn, "Start action completed");
        Ok(true)
    }

    fn describe(&self) -> String {
        format!(
            "start {} on {}",
            self.task_definition, self.container_instance_arn
        )
    }
}

/// Stop one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTask {
    pub task_arn: String,
}

impl StopTask {
    pub fn new(task_arn: impl Into<String>) -> Self {
        Self {
            task_arn: task_arn.into(),
        }
    }
}

#[async_trait]
impl SchedulingAction for StopTask {
    async fn execute(&self, ctx: &ActionContext) -> Result<bool, ActionError> {
        ctx.control_plane
            .stop_task(&ctx.cluster_name, &self.task_arn)
            .await?;
        Ok(true)
    }

    fn describe(&self) -> String {
        format!("stop {}", self.task_arn)
    }
}

/// Stop outdated tasks, then start their replacement
///
/// The start only happens once every stop has succeeded. The stops run
/// concurrently with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceAfterTerminate {
    pub stops: Vec<StopTask>,
    pub start: StartTask,
}

impl ReplaceAfterTerminate {
    pub fn new(stops: Vec<StopTask>, start: StartTask) -> Self {
        Self { stops, start }
    }
}

#[async_trait]
impl SchedulingAction for ReplaceAfterTerminate {
    async fn execute(&self, ctx: &ActionContext) -> Result<bool, ActionError> {
        let results = join_all(self.stops.iter().map(|stop| stop.execute(ctx))).await;

        let mut all_stopped = true;
        for (stop, result) in self.stops.iter().zip(results) {
            match result {
                Ok(true) => {}
                Ok(false) => all_stopped = false,
                Err(e) => {
                    warn!(task_arn = %stop.task_arn, error = %e, "Stop failed during replace");
                    all_stopped = false;
                }
            }
        }

        if !all_stopped {
            warn!(
                container_instance_arn = %self.start.container_instance_arn,
                "Replacement not started because outdated tasks are still running"
            );
            return Ok(false);
        }

        self.start.execute(ctx).await
    }

    fn describe(&self) -> String {
        let stopped: Vec<_> = self.stops.iter().map(|s| s.task_arn.as_str()).collect();
        format!(
            "replace [{}] with {} on {}",
            stopped.join(", "),
            self.start.task_definition,
            self.start.container_instance_arn
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::InMemoryControlPlane;
    use corral_types::{ContainerInstance, Task, TaskStatus};
    use std::sync::Arc;

    fn context(plane: Arc<InMemoryControlPlane>) -> ActionContext {
        ActionContext::new("cluster1", plane)
    }

    fn plane_with_old_task() -> Arc<InMemoryControlPlane> {
        let plane = Arc::new(InMemoryControlPlane::new());
        plane.register_instance(ContainerInstance::active("ci-1"));
        plane.seed_task(Task::running("t-old", "ci-1", "td:1").in_environment("web"));
        plane
    }

    #[tokio::test]
    async fn test_replace_stops_then_starts() {
        let plane = plane_with_old_task();
        let action = ReplaceAfterTerminate::new(
            vec![StopTask::new("t-old")],
            StartTask::new("ci-1", "td:2", "environment:web"),
        );

        let ok = action.execute(&context(plane.clone())).await.unwrap();
        assert!(ok);
        assert_eq!(plane.task("t-old").unwrap().status, TaskStatus::Stopped);
        assert_eq!(plane.started_count(), 1);
    }

    #[tokio::test]
    async fn test_replace_does_not_start_when_stop_fails() {
        let plane = plane_with_old_task();
        plane.fail_stops_of("t-old");
        let action = ReplaceAfterTerminate::new(
            vec![StopTask::new("t-old")],
            StartTask::new("ci-1", "td:2", "environment:web"),
        );

        let ok = action.execute(&context(plane.clone())).await.unwrap();
        assert!(!ok);
        assert_eq!(plane.started_count(), 0);
        assert_eq!(plane.task("t-old").unwrap().status, TaskStatus::Running);
    }

    #[tokio::test]
    async fn test_start_error_surfaces() {
        let plane = Arc::new(InMemoryControlPlane::new());
        let action = StartTask::new("ci-missing", "td:1", "environment:web");

        let err = action.execute(&context(plane)).await.unwrap_err();
        assert!(matches!(err, ActionError::ControlPlane(_)));
    }

    #[test]
    fn test_describe() {
        let action = ReplaceAfterTerminate::new(
            vec![StopTask::new("t-1"), StopTask::new("t-2")],
            StartTask::new("ci-1", "td:2", "environment:web"),
        );
        assert_eq!(action.describe(), "replace [t-1, t-2] with td:2 on ci-1");
    }
}
