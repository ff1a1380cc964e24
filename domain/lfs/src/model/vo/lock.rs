use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LockOwner {
    pub name: String,
}

/// Lock as shown by the locking API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LfsLockView {
    pub id: String,
    pub path: String,
    pub locked_at: DateTime<Utc>,
    pub owner: LockOwner,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LfsLockList {
    pub locks: Vec<LfsLockView>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_cursor: String,
}

/// Locks split by whether the caller owns them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LfsLockListVerify {
    pub ours: Vec<LfsLockView>,
    pub theirs: Vec<LfsLockView>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_cursor: String,
}
