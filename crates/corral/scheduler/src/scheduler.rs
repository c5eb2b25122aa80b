//! Scheduler strategy trait

use crate::action::SchedulingAction;
use corral_types::{ClusterSnapshot, EnvironmentDescription};

/// Diff algorithm for one environment type and deployment method
///
/// Computing actions must not change anything: only executing them does.
/// An empty list means the cluster already matches the description.
pub trait Scheduler: Send + Sync {
    /// Compute the actions that converge `snapshot` toward `environment`
    fn schedule(
        &self,
        snapshot: &ClusterSnapshot,
        environment: &EnvironmentDescription,
    ) -> Vec<Box<dyn SchedulingAction>>;

    /// Strategy name for logging
    fn name(&self) -> &str;
}
