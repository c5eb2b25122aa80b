//! Scheduler strategy registry

use crate::error::{Result, SchedulerError};
use crate::scheduler::Scheduler;
use crate::strategies::{DaemonReplaceAfterTerminate, SingleTaskReplaceAfterTerminate};
use corral_types::{DeploymentMethod, EnvironmentDescription, EnvironmentType};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Picks the scheduler for an environment description
pub trait SchedulerFactory: Send + Sync {
    /// Fails with `StrategyNotFound` rather than returning a no-op scheduler.
    fn scheduler_for(&self, environment: &EnvironmentDescription) -> Result<Arc<dyn Scheduler>>;
}

/// Registry key: environment type and deployment method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StrategyKey {
    pub environment_type: EnvironmentType,
    pub deployment_method: DeploymentMethod,
}

impl StrategyKey {
    pub fn new(environment_type: EnvironmentType, deployment_method: DeploymentMethod) -> Self {
        Self {
            environment_type,
            deployment_method,
        }
    }
}

impl fmt::Display for StrategyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.environment_type, self.deployment_method)
    }
}

/// Schedulers keyed by [`StrategyKey`]
#[derive(Default)]
pub struct SchedulerRegistry {
    schedulers: HashMap<StrategyKey, Arc<dyn Scheduler>>,
}

impl SchedulerRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in strategies
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            EnvironmentType::SingleTask,
            DeploymentMethod::replace_after_terminate(),
            Arc::new(SingleTaskReplaceAfterTerminate::new()),
        );
        registry.register(
            EnvironmentType::Daemon,
            DeploymentMethod::replace_after_terminate(),
            Arc::new(DaemonReplaceAfterTerminate::new()),
        );
        registry
    }

    /// Register a scheduler, returning the one it replaced
    pub fn register(
        &mut self,
        environment_type: EnvironmentType,
        deployment_method: DeploymentMethod,
        scheduler: Arc<dyn Scheduler>,
    ) -> Option<Arc<dyn Scheduler>> {
        self.schedulers
            .insert(StrategyKey::new(environment_type, deployment_method), scheduler)
    }

    pub fn contains(&self, key: &StrategyKey) -> bool {
        self.schedulers.contains_key(key)
    }

    /// Registered keys, sorted for display
    pub fn keys(&self) -> Vec<StrategyKey> {
        let mut keys: Vec<_> = self.schedulers.keys().cloned().collect();
        keys.sort_by_key(|k| k.to_string());
        keys
    }
}

impl SchedulerFactory for SchedulerRegistry {
    fn scheduler_for(&self, environment: &EnvironmentDescription) -> Result<Arc<dyn Scheduler>> {
        let key = StrategyKey::new(
            environment.environment_type,
            environment.deployment_method.clone(),
        );

        self.schedulers
            .get(&key)
            .cloned()
            .ok_or(SchedulerError::StrategyNotFound {
                environment_type: key.environment_type,
                deployment_method: key.deployment_method,
            })
    }
}
