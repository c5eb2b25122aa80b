//! Corral Types - Shared vocabulary for environment reconciliation
//!
//! This crate defines the values that flow through one reconciliation pass:
//!
//! - **Desired state**: [`Environment`] and [`EnvironmentRevision`], owned by
//!   the environment repository
//! - **Actual state**: [`ClusterSnapshot`], a point-in-time read of a cluster
//! - **Scheduler-facing projection**: [`EnvironmentDescription`]
//! - **Invocation boundary**: [`SchedulerInput`] and [`SchedulerOutput`]
//!
//! Everything here is a plain value. Nothing in this crate performs I/O.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod cluster;
pub mod description;
pub mod environment;
pub mod ids;
pub mod invocation;

pub use cluster::{ClusterSnapshot, ContainerInstance, ContainerInstanceStatus, Task, TaskStatus};
pub use description::EnvironmentDescription;
pub use environment::{
    DeploymentConfiguration, DeploymentMethod, Environment, EnvironmentHealth,
    EnvironmentRevision, EnvironmentStatus, EnvironmentType,
};
pub use ids::{task_group_for, EnvironmentId, RevisionId};
pub use invocation::{SchedulerInput, SchedulerOutput};
