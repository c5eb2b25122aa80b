//! Handler configuration

use crate::error::{Result, SchedulerError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Tuning for action execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Deadline for a single action, in milliseconds. Actions still running
    /// past it are counted as failed.
    #[serde(default = "default_action_timeout_ms")]
    pub action_timeout_ms: u64,

    /// Maximum actions in flight at once within one pass; 0 means unbounded
    #[serde(default)]
    pub max_concurrent_actions: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            action_timeout_ms: default_action_timeout_ms(),
            max_concurrent_actions: 0,
        }
    }
}

fn default_action_timeout_ms() -> u64 {
    300_000
}

impl SchedulerConfig {
    /// Load configuration from defaults, an optional file and `CORRAL_*`
    /// environment variables, in increasing priority
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&SchedulerConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CORRAL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the executor cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.action_timeout_ms == 0 {
            return Err(SchedulerError::Config(
                "action_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.max_concurrent_actions > Semaphore::MAX_PERMITS {
            return Err(SchedulerError::Config(format!(
                "max_concurrent_actions must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(())
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }

    /// Set the per-action deadline, rounded up to whole milliseconds
    pub fn with_action_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_nanos().div_ceil(1_000_000);
        self.action_timeout_ms = u64::try_from(millis).unwrap_or(u64::MAX);
        self
    }

    pub fn with_max_concurrent_actions(mut self, limit: usize) -> Self {
        self.max_concurrent_actions = limit;
        self
    }
}
