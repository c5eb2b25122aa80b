//! Daemon environments deployed by replace-after-terminate

use super::split_by_definition;
use crate::action::SchedulingAction;
use crate::actions::{ReplaceAfterTerminate, StartTask, StopTask};
use crate::scheduler::Scheduler;
use corral_types::{task_group_for, ClusterSnapshot, EnvironmentDescription, Task};
use std::collections::BTreeMap;

/// Keeps one task of the active definition on every eligible instance
///
/// Replacement is per instance: the outdated tasks on an instance are
/// stopped before its new task starts. Instances are independent of each
/// other, so their actions run concurrently.
pub struct DaemonReplaceAfterTerminate;

impl DaemonReplaceAfterTerminate {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DaemonReplaceAfterTerminate {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for DaemonReplaceAfterTerminate {
    fn schedule(
        &self,
        snapshot: &ClusterSnapshot,
        environment: &EnvironmentDescription,
    ) -> Vec<Box<dyn SchedulingAction>> {
        let group = task_group_for(&environment.environment_name);

        let mut by_instance: BTreeMap<&str, Vec<&Task>> = BTreeMap::new();
        for task in snapshot.environment_tasks(&environment.environment_name) {
            by_instance
                .entry(task.container_instance_arn.as_str())
                .or_default()
                .push(task);
        }

        let mut actions: Vec<Box<dyn SchedulingAction>> = Vec::new();

        for instance in snapshot.eligible_instances(&environment.instance_attributes) {
            let tasks = by_instance
                .remove(instance.container_instance_arn.as_str())
                .unwrap_or_default();
            let (current, stale) = split_by_definition(tasks, &environment.task_definition_arn);
            let stops: Vec<StopTask> = stale.iter().map(|t| StopTask::new(&t.task_arn)).collect();

            match current.split_first() {
                Some((_keep, surplus)) => {
                    actions.extend(
                        stops
                            .into_iter()
                            .chain(surplus.iter().map(|t| StopTask::new(&t.task_arn)))
                            .map(|s| Box::new(s) as Box<dyn SchedulingAction>),
                    );
                }
                None => {
                    let start = StartTask::new(
                        &instance.container_instance_arn,
                        &environment.task_definition_arn,
                        &group,
                    );
                    if stops.is_empty() {
                        actions.push(Box::new(start));
                    } else {
                        actions.push(Box::new(ReplaceAfterTerminate::new(stops, start)));
                    }
                }
            }
        }

        // Whatever is left sits on instances that should no longer host the
        // environment.
        for task in by_instance.into_values().flatten() {
            actions.push(Box::new(StopTask::new(&task.task_arn)));
        }

        actions
    }

    fn name(&self) -> &str {
        "daemon/replace-after-terminate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corral_types::{
        ContainerInstance, ContainerInstanceStatus, DeploymentConfiguration, DeploymentMethod,
        EnvironmentType, RevisionId,
    };

    fn description() -> EnvironmentDescription {
        EnvironmentDescription {
            cluster_name: "cluster1".into(),
            environment_name: "agent".into(),
            active_environment_revision_id: RevisionId::new("2"),
            environment_type: EnvironmentType::Daemon,
            task_definition_arn: "td:2".into(),
            deployment_method: DeploymentMethod::replace_after_terminate(),
            instance_attributes: BTreeMap::new(),
            deployment_configuration: DeploymentConfiguration::default(),
        }
    }

    fn describe(actions: &[Box<dyn SchedulingAction>]) -> Vec<String> {
        actions.iter().map(|a| a.describe()).collect()
    }

    #[test]
    fn test_starts_on_every_instance() {
        let snapshot = ClusterSnapshot::new(
            "cluster1",
            vec![
                ContainerInstance::active("ci-2"),
                ContainerInstance::active("ci-1"),
                ContainerInstance::active("ci-3").with_status(ContainerInstanceStatus::Inactive),
            ],
            vec![],
        );

        let actions = DaemonReplaceAfterTerminate::new().schedule(&snapshot, &description());
        assert_eq!(
            describe(&actions),
            vec!["start td:2 on ci-1", "start td:2 on ci-2"]
        );
    }

    #[test]
    fn test_converged_daemon_has_no_actions() {
        let snapshot = ClusterSnapshot::new(
            "cluster1",
            vec![
                ContainerInstance::active("ci-1"),
                ContainerInstance::active("ci-2"),
            ],
            vec![
                Task::running("t-1", "ci-1", "td:2").in_environment("agent"),
                Task::running("t-2", "ci-2", "td:2").in_environment("agent"),
            ],
        );

        let actions = DaemonReplaceAfterTerminate::new().schedule(&snapshot, &description());
        assert!(actions.is_empty());
    }

    #[test]
    fn test_mixed_instances() {
        let snapshot = ClusterSnapshot::new(
            "cluster1",
            vec![
                ContainerInstance::active("ci-1"),
                ContainerInstance::active("ci-2"),
                ContainerInstance::active("ci-3"),
                ContainerInstance::active("ci-4").with_status(ContainerInstanceStatus::Draining),
            ],
            vec![
                // ci-1: outdated
                Task::running("t-1", "ci-1", "td:1").in_environment("agent"),
                // ci-2: converged plus a duplicate
                Task::running("t-2a", "ci-2", "td:2").in_environment("agent"),
                Task::running("t-2b", "ci-2", "td:2").in_environment("agent"),
                // ci-3: empty
                // ci-4: draining, must be vacated
                Task::running("t-4", "ci-4", "td:2").in_environment("agent"),
            ],
        );

        let actions = DaemonReplaceAfterTerminate::new().schedule(&snapshot, &description());
        assert_eq!(
            describe(&actions),
            vec![
                "replace [t-1] with td:2 on ci-1".to_string(),
                "stop t-2b".to_string(),
                "start td:2 on ci-3".to_string(),
                "stop t-4".to_string(),
            ]
        );
    }

    #[test]
    fn test_attribute_mismatch_vacates_instance() {
        let mut environment = description();
        environment
            .instance_attributes
            .insert("role".into(), "edge".into());
        let snapshot = ClusterSnapshot::new(
            "cluster1",
            vec![
                ContainerInstance::active("ci-1").with_attribute("role", "edge"),
                ContainerInstance::active("ci-2").with_attribute("role", "core"),
            ],
            vec![
                Task::running("t-1", "ci-1", "td:2").in_environment("agent"),
                Task::running("t-2", "ci-2", "td:2").in_environment("agent"),
            ],
        );

        let actions = DaemonReplaceAfterTerminate::new().schedule(&snapshot, &environment);
        assert_eq!(describe(&actions), vec!["stop t-2"]);
    }

    #[test]
    fn test_tasks_on_unknown_instances_are_stopped() {
        let snapshot = ClusterSnapshot::new(
            "cluster1",
            vec![],
            vec![Task::running("t-ghost", "ci-gone", "td:2").in_environment("agent")],
        );

        let actions = DaemonReplaceAfterTerminate::new().schedule(&snapshot, &description());
        assert_eq!(describe(&actions), vec!["stop t-ghost"]);
    }
}
