//! Invocation boundary values

use crate::cluster::ClusterSnapshot;
use crate::ids::EnvironmentId;
use serde::{Deserialize, Serialize};

/// Input of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerInput {
    pub snapshot: ClusterSnapshot,
    pub environment_id: EnvironmentId,
}

impl SchedulerInput {
    pub fn new(snapshot: ClusterSnapshot, environment_id: EnvironmentId) -> Self {
        Self {
            snapshot,
            environment_id,
        }
    }
}

/// Aggregated outcome of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerOutput {
    pub cluster_name: String,
    pub environment_id: EnvironmentId,
    pub successful_actions: u64,
    pub failed_actions: u64,
}

impl SchedulerOutput {
    /// Output of a pass that had nothing to do
    pub fn idle(cluster_name: impl Into<String>, environment_id: EnvironmentId) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            environment_id,
            successful_actions: 0,
            failed_actions: 0,
        }
    }

    pub fn total_actions(&self) -> u64 {
        self.successful_actions + self.failed_actions
    }
}
