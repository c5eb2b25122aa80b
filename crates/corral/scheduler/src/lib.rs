//! Corral Scheduler - Environment reconciliation engine
//!
//! One reconciliation pass converges a cluster toward an environment's
//! active revision:
//!
//! 1. [`StateResolver`] reads the environment and its active revision and
//!    builds an [`EnvironmentDescription`](corral_types::EnvironmentDescription)
//! 2. A [`SchedulerFactory`] picks the [`Scheduler`] registered for the
//!    environment type and deployment method
//! 3. The scheduler diffs desired against observed state into
//!    [`SchedulingAction`]s
//! 4. [`SchedulerHandler`] runs every action concurrently and tallies the
//!    outcomes
//!
//! ## Architectural Boundaries
//!
//! - `corral-state` owns: desired-state records (read here, never written)
//! - the cluster control plane owns: actually starting and stopping tasks,
//!   reached only from inside actions through [`ClusterControlPlane`]
//! - this crate owns: diffing, ordering within composite actions, fan-out,
//!   per-action deadlines and aggregation
//!
//! ## Usage
//!
//! ```no_run
//! use corral_scheduler::{InMemoryControlPlane, SchedulerConfig, SchedulerHandler, SchedulerRegistry};
//! use corral_state::InMemoryEnvironmentRepository;
//! use corral_types::{ClusterSnapshot, EnvironmentId, SchedulerInput};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handler = SchedulerHandler::new(
//!     Arc::new(InMemoryEnvironmentRepository::new()),
//!     Arc::new(InMemoryControlPlane::new()),
//!     Arc::new(SchedulerRegistry::with_defaults()),
//!     SchedulerConfig::default(),
//! );
//!
//! let input = SchedulerInput::new(
//!     ClusterSnapshot::empty("cluster1"),
//!     EnvironmentId::new("123456789012", "cluster1", "environment1"),
//! );
//! let output = handler.handle(input).await?;
//! println!("{} ok, {} failed", output.successful_actions, output.failed_actions);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod action;
pub mod actions;
pub mod config;
pub mod control;
pub mod error;
pub mod handler;
pub mod registry;
pub mod resolver;
pub mod scheduler;
pub mod strategies;

// Re-exports
pub use action::{ActionContext, SchedulingAction};
pub use config::SchedulerConfig;
pub use control::{ClusterControlPlane, InMemoryControlPlane};
pub use error::{ActionError, ControlPlaneError, Result, SchedulerError};
pub use handler::SchedulerHandler;
pub use registry::{SchedulerFactory, SchedulerRegistry, StrategyKey};
pub use resolver::StateResolver;
pub use scheduler::Scheduler;
