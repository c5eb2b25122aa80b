//! Scheduler error types

use corral_state::RepositoryError;
use corral_types::{DeploymentMethod, EnvironmentType};
use thiserror::Error;

/// Errors that abort a reconciliation pass
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("No scheduler registered for {environment_type} environments using {deployment_method}")]
    StrategyNotFound {
        environment_type: EnvironmentType,
        deployment_method: DeploymentMethod,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for SchedulerError {
    fn from(e: config::ConfigError) -> Self {
        SchedulerError::Config(e.to_string())
    }
}

/// Errors raised by the cluster control plane
#[derive(Debug, Clone, Error)]
pub enum ControlPlaneError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Container instance not found: {0}")]
    InstanceNotFound(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Control plane unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while executing a single action
///
/// These never escape a pass; the handler counts them as failed actions.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Control plane error: {0}")]
    ControlPlane(#[from] ControlPlaneError),

    #[error("Action timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Result type for scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;
