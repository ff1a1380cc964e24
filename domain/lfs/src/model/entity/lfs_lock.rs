use chrono::{DateTime, Utc};
use hub_architecture::model::derive::AggregateRoot;
use serde::{Deserialize, Serialize};

use crate::model::vo::{LfsLockView, LockOwner};

/// Lock on a file path of a repository, at most one per path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, AggregateRoot)]
pub struct LfsLock {
    pub id: i64,
    pub path: String,
    pub user_id: i64,
    /// Owner name at lock time.
    #[serde(default)]
    pub username: String,
    pub repository_id: i64,
    pub created_at: DateTime<Utc>,
}

impl LfsLock {
    pub fn view(&self) -> LfsLockView {
        LfsLockView {
            id: self.id.to_string(),
            path: self.path.clone(),
            locked_at: self.created_at,
            owner: LockOwner {
                name: self.username.clone(),
            },
        }
    }
}
