//! Single-task environments deployed by replace-after-terminate

use super::split_by_definition;
use crate::action::SchedulingAction;
use crate::actions::{ReplaceAfterTerminate, StartTask, StopTask};
use crate::scheduler::Scheduler;
use corral_types::{task_group_for, ClusterSnapshot, EnvironmentDescription};
use tracing::debug;

/// Keeps exactly one task of the active definition running in the cluster
///
/// When the task has to be replaced, every outdated task is stopped before
/// the new one starts, inside a single [`ReplaceAfterTerminate`] action.
pub struct SingleTaskReplaceAfterTerminate;

impl SingleTaskReplaceAfterTerminate {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SingleTaskReplaceAfterTerminate {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for SingleTaskReplaceAfterTerminate {
    fn schedule(
        &self,
        snapshot: &ClusterSnapshot,
        environment: &EnvironmentDescription,
    ) -> Vec<Box<dyn SchedulingAction>> {
        let (current, stale) = split_by_definition(
            snapshot.environment_tasks(&environment.environment_name),
            &environment.task_definition_arn,
        );

        let stops: Vec<StopTask> = stale.iter().map(|t| StopTask::new(&t.task_arn)).collect();

        if let Some((_keep, surplus)) = current.split_first() {
            // The current task stays; everything else goes.
            return stops
                .into_iter()
                .chain(surplus.iter().map(|t| StopTask::new(&t.task_arn)))
                .map(|s| Box::new(s) as Box<dyn SchedulingAction>)
                .collect();
        }

        let eligible = snapshot.eligible_instances(&environment.instance_attributes);
        let Some(target) = eligible.first() else {
            debug!(
                environment = %environment.environment_name,
                "No eligible container instance for replacement"
            );
            return stops
                .into_iter()
                .map(|s| Box::new(s) as Box<dyn SchedulingAction>)
                .collect();
        };

        let start = StartTask::new(
            &target.container_instance_arn,
            &environment.task_definition_arn,
            task_group_for(&environment.environment_name),
        );

        if stops.is_empty() {
            vec![Box::new(start)]
        } else {
            vec![Box::new(ReplaceAfterTerminate::new(stops, start))]
        }
    }

    fn name(&self) -> &str {
        "single-task/replace-after-terminate"
    }
}
