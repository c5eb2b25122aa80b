//! Reconciliation pass entry point
//!
//! [`SchedulerHandler::handle`] resolves desired state, asks the selected
//! scheduler for actions, runs them all concurrently and reports how many
//! succeeded. Failures of individual actions are contained: they are
//! counted, never propagated, and never stop sibling actions.

use crate::action::{ActionContext, SchedulingAction};
use crate::config::SchedulerConfig;
use crate::control::ClusterControlPlane;
use crate::error::{ActionError, Result};
use crate::registry::SchedulerFactory;
use crate::resolver::StateResolver;
use corral_state::EnvironmentRepository;
use corral_types::{SchedulerInput, SchedulerOutput};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

/// Runs reconciliation passes
///
/// Holds no per-pass state, so one handler can serve concurrent passes for
/// different environments.
pub struct SchedulerHandler {
    resolver: StateResolver,
    control_plane: Arc<dyn ClusterControlPlane>,
    factory: Arc<dyn SchedulerFactory>,
    config: SchedulerConfig,
}

impl SchedulerHandler {
    pub fn new(
        repository: Arc<dyn EnvironmentRepository>,
        control_plane: Arc<dyn ClusterControlPlane>,
        factory: Arc<dyn SchedulerFactory>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            resolver: StateResolver::new(repository),
            control_plane,
            factory,
            config,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Run one reconciliation pass
    ///
    /// Errors only when desired state cannot be resolved or no scheduler
    /// fits it. An environment without an active revision yields an all-zero
    /// output without consulting any scheduler.
    #[instrument(skip(self, input), fields(environment_id = %input.environment_id))]
    pub async fn handle(&self, input: SchedulerInput) -> Result<SchedulerOutput> {
        let SchedulerInput {
            snapshot,
            environment_id,
        } = input;

        let Some(environment) = self.resolver.resolve(&environment_id).await? else {
            info!("No active revision, nothing to schedule");
            return Ok(SchedulerOutput::idle(snapshot.cluster_name, environment_id));
        };

        let scheduler = self.factory.scheduler_for(&environment)?;
        let actions = scheduler.schedule(&snapshot, &environment);

        debug!(
            scheduler = scheduler.name(),
            revision_id = %environment.active_environment_revision_id,
            actions = actions.len(),
            "Computed scheduling actions"
        );

        let ctx = ActionContext::new(snapshot.cluster_name.clone(), self.control_plane.clone());
        let (successful_actions, failed_actions) = self.execute_all(actions, ctx).await;

        info!(
            scheduler = scheduler.name(),
            successful_actions,
            failed_actions,
            "Reconciliation pass complete"
        );

        Ok(SchedulerOutput {
            cluster_name: snapshot.cluster_name,
            environment_id,
            successful_actions,
            failed_actions,
        })
    }

    /// Run every action to completion and count the outcomes
    ///
    /// Each action gets its own task so a panic is contained to it. The
    /// optional semaphore only delays starts; every action still runs.
    /// Dropping the returned future aborts actions still in flight.
    async fn execute_all(
        &self,
        actions: Vec<Box<dyn SchedulingAction>>,
        ctx: ActionContext,
    ) -> (u64, u64) {
        let limiter = match self.config.max_concurrent_actions {
            0 => None,
            limit => Some(Arc::new(Semaphore::new(limit.min(Semaphore::MAX_PERMITS)))),
        };
        let timeout = self.config.action_timeout();

        let mut tasks = JoinSet::new();
        for action in actions {
            let ctx = ctx.clone();
            let limiter = limiter.clone();
            tasks.spawn(async move {
                let _permit = match limiter {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                run_action(action.as_ref(), &ctx, timeout).await
            });
        }

        let mut successful = 0u64;
        let mut failed = 0u64;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(true) => successful += 1,
                Ok(false) => failed += 1,
                Err(e) => {
                    error!(error = %e, "Scheduling action aborted");
                    failed += 1;
                }
            }
        }

        (successful, failed)
    }
}

async fn run_action(action: &dyn SchedulingAction, ctx: &ActionContext, timeout: Duration) -> bool {
    let outcome = match tokio::time::timeout(timeout, action.execute(ctx)).await {
        Ok(result) => result,
        Err(_) => Err(ActionError::Timeout(timeout)),
    };

    match outcome {
        Ok(true) => true,
        Ok(false) => {
            warn!(action = %action.describe(), "Scheduling action did not succeed");
            false
        }
        Err(e) => {
            warn!(action = %action.describe(), error = %e, "Scheduling action failed");
            false
        }
    }
}
