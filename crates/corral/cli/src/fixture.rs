//! Cluster fixtures
//!
//! A fixture describes desired and actual state in one JSON document so a
//! pass can be run without any external service.

use anyhow::{Context, Result};
use corral_scheduler::InMemoryControlPlane;
use corral_state::InMemoryEnvironmentRepository;
use corral_types::{ContainerInstance, Environment, EnvironmentId, EnvironmentRevision, Task};
use serde::Deserialize;
use std::path::Path;

/// Desired and observed state for one cluster
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub cluster_name: String,

    #[serde(default)]
    pub environments: Vec<Environment>,

    #[serde(default)]
    pub revisions: Vec<EnvironmentRevision>,

    #[serde(default)]
    pub instances: Vec<ContainerInstance>,

    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing fixture {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Seed in-memory collaborators with this fixture
    pub fn seed(
        &self,
        repository: &InMemoryEnvironmentRepository,
        control_plane: &InMemoryControlPlane,
    ) -> Result<()> {
        for environment in &self.environments {
            repository.create_environment(environment.clone())?;
        }
        for revision in &self.revisions {
            repository.create_revision(revision.clone())?;
        }
        for instance in &self.instances {
            control_plane.register_instance(instance.clone());
        }
        for task in &self.tasks {
            control_plane.seed_task(task.clone());
        }
        Ok(())
    }

    /// Environments to reconcile, optionally narrowed to one name
    pub fn environment_ids(&self, only: Option<&str>) -> Vec<EnvironmentId> {
        self.environments
            .iter()
            .map(|e| e.environment_id.clone())
            .filter(|id| only.map_or(true, |name| id.environment_name == name))
            .collect()
    }
}
