use hub_architecture::model::derive::AggregateRoot;
use serde::{Deserialize, Serialize};

use crate::model::vo::RepositoryType;

/// Git repository hosted by the hub.
#[derive(Debug, Clone, Default, Serialize, Deserialize, AggregateRoot)]
pub struct Repository {
    pub id: i64,
    /// Creator of the repository.
    pub user_id: i64,
    /// `namespace/name`.
    pub path: String,
    /// Path on the git server, e.g. `models_ns/name`.
    pub git_path: String,
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    pub private: bool,
    pub repository_type: RepositoryType,
    #[serde(default)]
    pub default_branch: String,
}

impl Repository {
    pub fn namespace_and_name(&self) -> (&str, &str) {
        match self.path.split_once('/') {
            Some((namespace, name)) => (namespace, name),
            None => (self.path.as_str(), self.name.as_str()),
        }
    }
}
