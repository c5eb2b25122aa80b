//! Scheduling action trait

use crate::control::ClusterControlPlane;
use crate::error::ActionError;
use async_trait::async_trait;
use std::sync::Arc;

/// What an action may touch while it runs
#[derive(Clone)]
pub struct ActionContext {
    /// Cluster the pass is converging
    pub cluster_name: String,
    /// Control plane for that cluster
    pub control_plane: Arc<dyn ClusterControlPlane>,
}

impl ActionContext {
    pub fn new(cluster_name: impl Into<String>, control_plane: Arc<dyn ClusterControlPlane>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            control_plane,
        }
    }
}

/// A unit of converging work
///
/// Produced by a [`Scheduler`](crate::Scheduler), run once by the handler.
/// Actions from the same pass run concurrently with no ordering between
/// them, so an action that depends on another must contain it.
#[async_trait]
pub trait SchedulingAction: Send + Sync {
    /// Run the action
    ///
    /// `Ok(true)` means the intended change happened, `Ok(false)` that it
    /// could not be made. Errors are counted as failures by the handler.
    async fn execute(&self, ctx: &ActionContext) -> Result<bool, ActionError>;

    /// Short description for logging
    fn describe(&self) -> String;
}
