//! Identifiers for environments and their revisions
//!
//! Unlike fleet-internal ids these are not generated here: the repository
//! owns them and this crate only carries them around.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite key of an environment: the account that owns it, the cluster it
/// targets and its name within that cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnvironmentId {
    pub account_id: String,
    pub cluster: String,
    pub environment_name: String,
}

impl EnvironmentId {
    pub fn new(
        account_id: impl Into<String>,
        cluster: impl Into<String>,
        environment_name: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            cluster: cluster.into(),
            environment_name: environment_name.into(),
        }
    }

    /// Group tag stamped on every task started on behalf of this environment.
    ///
    /// Tasks in a cluster snapshot are attributed to an environment by this
    /// tag alone.
    pub fn task_group(&self) -> String {
        task_group_for(&self.environment_name)
    }
}

impl fmt::Display for EnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.account_id, self.cluster, self.environment_name
        )
    }
}

/// Group tag for tasks belonging to the named environment
pub fn task_group_for(environment_name: &str) -> String {
    format!("environment:{}", environment_name)
}

/// Identifier of one revision of an environment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionId(String);

impl RevisionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RevisionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
