//! Scheduler strategy implementations

pub mod daemon;
pub mod single_task;

pub use daemon::DaemonReplaceAfterTerminate;
pub use single_task::SingleTaskReplaceAfterTerminate;

use corral_types::{Task, TaskStatus};

/// Tasks already running the desired definition, and the rest
///
/// Current tasks are ordered so the one worth keeping comes first: running
/// before pending, then by arn.
pub(crate) fn split_by_definition<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    task_definition: &str,
) -> (Vec<&'a Task>, Vec<&'a Task>) {
    let (mut current, mut stale): (Vec<&Task>, Vec<&Task>) = tasks
        .into_iter()
        .partition(|t| t.task_definition == task_definition);

    current.sort_by(|a, b| {
        (a.status != TaskStatus::Running, &a.task_arn)
            .cmp(&(b.status != TaskStatus::Running, &b.task_arn))
    });
    stale.sort_by(|a, b| a.task_arn.cmp(&b.task_arn));

    (current, stale)
}
