//! In-memory environment repository
//!
//! Suitable for development and testing. Records carry a version counter
//! that every write compares and bumps, so concurrent writers observe the
//! same conflicts they would against a persistent store.

use crate::error::{RepositoryError, Result};
use crate::repository::EnvironmentRepository;
use async_trait::async_trait;
use corral_types::{Environment, EnvironmentId, EnvironmentRevision, RevisionId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::debug;

/// In-memory environment repository
pub struct InMemoryEnvironmentRepository {
    environments: DashMap<EnvironmentId, Environment>,
    revisions: DashMap<(EnvironmentId, RevisionId), EnvironmentRevision>,
    environment_reads: AtomicU64,
    revision_reads: AtomicU64,
    unavailable: AtomicBool,
}

impl InMemoryEnvironmentRepository {
    pub fn new() -> Self {
        Self {
            environments: DashMap::new(),
            revisions: DashMap::new(),
            environment_reads: AtomicU64::new(0),
            revision_reads: AtomicU64::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Store a new environment at version 1
    pub fn create_environment(&self, mut environment: Environment) -> Result<Environment> {
        self.check_available()?;

        match self.environments.entry(environment.environment_id.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::AlreadyExists(
                environment.environment_id.to_string(),
            )),
            Entry::Vacant(slot) => {
                environment.version = 1;
                slot.insert(environment.clone());
                debug!(environment_id = %environment.environment_id, "Environment created");
                Ok(environment)
            }
        }
    }

    /// Replace an environment if its version still matches the stored one
    pub fn update_environment(&self, mut environment: Environment) -> Result<Environment> {
        self.check_available()?;

        let mut stored = self
            .environments
            .get_mut(&environment.environment_id)
            .ok_or_else(|| RepositoryError::EnvironmentNotFound(environment.environment_id.clone()))?;

        if stored.version != environment.version {
            return Err(RepositoryError::VersionConflict {
                expected: environment.version,
                actual: stored.version,
            });
        }

        environment.version += 1;
        environment.last_updated_time = chrono::Utc::now();
        *stored = environment.clone();

        debug!(
            environment_id = %environment.environment_id,
            version = environment.version,
            "Environment updated"
        );

        Ok(environment)
    }

    /// Store a new revision of an existing environment
    pub fn create_revision(&self, mut revision: EnvironmentRevision) -> Result<EnvironmentRevision> {
        self.check_available()?;

        if !self.environments.contains_key(&revision.environment_id) {
            return Err(RepositoryError::EnvironmentNotFound(
                revision.environment_id.clone(),
            ));
        }

        let key = (
            revision.environment_id.clone(),
            revision.environment_revision_id.clone(),
        );
        match self.revisions.entry(key) {
            Entry::Occupied(_) => Err(RepositoryError::AlreadyExists(format!(
                "{} revision {}",
                revision.environment_id, revision.environment_revision_id
            ))),
            Entry::Vacant(slot) => {
                revision.version = 1;
                slot.insert(revision.clone());
                Ok(revision)
            }
        }
    }

    /// Point the environment's active revision at an existing revision
    ///
    /// `expected_version` is the environment version the caller last read.
    pub fn activate_revision(
        &self,
        environment_id: &EnvironmentId,
        revision_id: &RevisionId,
        expected_version: u64,
    ) -> Result<Environment> {
        self.check_available()?;

        let key = (environment_id.clone(), revision_id.clone());
        if !self.revisions.contains_key(&key) {
            return Err(RepositoryError::RevisionNotFound {
                environment_id: environment_id.clone(),
                revision_id: revision_id.clone(),
            });
        }

        let mut environment = self
            .environments
            .get(environment_id)
            .map(|e| e.clone())
            .ok_or_else(|| RepositoryError::EnvironmentNotFound(environment_id.clone()))?;
        environment.version = expected_version;
        environment.active_environment_revision_id = Some(revision_id.clone());

        self.update_environment(environment)
    }

    /// Number of `describe_environment` calls served so far
    pub fn environment_reads(&self) -> u64 {
        self.environment_reads.load(Ordering::SeqCst)
    }

    /// Number of `describe_environment_revision` calls served so far
    pub fn revision_reads(&self) -> u64 {
        self.revision_reads.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail with `Unavailable` until cleared
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "in-memory repository marked unavailable".into(),
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryEnvironmentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EnvironmentRepository for InMemoryEnvironmentRepository {
    async fn describe_environment(&self, environment_id: &EnvironmentId) -> Result<Environment> {
        self.environment_reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        self.environments
            .get(environment_id)
            .map(|e| e.clone())
            .ok_or_else(|| RepositoryError::EnvironmentNotFound(environment_id.clone()))
    }

    async fn describe_environment_revision(
        &self,
        environment_id: &EnvironmentId,
        revision_id: &RevisionId,
    ) -> Result<EnvironmentRevision> {
        self.revision_reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let key = (environment_id.clone(), revision_id.clone());
        self.revisions
            .get(&key)
            .map(|r| r.clone())
            .ok_or_else(|| RepositoryError::RevisionNotFound {
                environment_id: environment_id.clone(),
                revision_id: revision_id.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corral_types::{DeploymentMethod, EnvironmentType};

    fn environment() -> Environment {
        Environment::new(
            EnvironmentId::new("123456789012", "cluster1", "environment1"),
            EnvironmentType::SingleTask,
            DeploymentMethod::replace_after_terminate(),
        )
    }

    #[tokio::test]
    async fn test_create_and_describe() {
        let repo = InMemoryEnvironmentRepository::new();
        let created = repo.create_environment(environment()).unwrap();
        assert_eq!(created.version, 1);

        let fetched = repo
            .describe_environment(&created.environment_id)
            .await
            .unwrap();
        assert_eq!(fetched, created);
        assert_eq!(repo.environment_reads(), 1);
        assert_eq!(repo.revision_reads(), 0);
    }

    #[test]
    fn test_create_twice_fails() {
        let repo = InMemoryEnvironmentRepository::new();
        repo.create_environment(environment()).unwrap();
        let err = repo.create_environment(environment()).unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists(_)));
    }

    #[test]
    fn test_update_bumps_version() {
        let repo = InMemoryEnvironmentRepository::new();
        let mut env = repo.create_environment(environment()).unwrap();
        env.role = "arn:role".into();

        let updated = repo.update_environment(env).unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.role, "arn:role");
    }

    #[test]
    fn test_stale_update_conflicts() {
        let repo = InMemoryEnvironmentRepository::new();
        let first = repo.create_environment(environment()).unwrap();
        let stale = first.clone();

        repo.update_environment(first).unwrap();
        let err = repo.update_environment(stale).unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::VersionConflict {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_revision_is_not_found() {
        let repo = InMemoryEnvironmentRepository::new();
        let env = repo.create_environment(environment()).unwrap();

        let err = repo
            .describe_environment_revision(&env.environment_id, &RevisionId::new("9"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unavailable() {
        let repo = InMemoryEnvironmentRepository::new();
        let env = repo.create_environment(environment()).unwrap();
        repo.set_unavailable(true);

        let err = repo
            .describe_environment(&env.environment_id)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Unavailable(_)));
        assert!(!err.is_not_found());
    }
}
