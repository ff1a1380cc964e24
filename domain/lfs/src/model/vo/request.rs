use domain_repo::model::vo::RepositoryType;
use serde::{Deserialize, Serialize};

use super::Pointer;

/// Repository an LFS call targets and the calling user, empty when anonymous.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LfsRepoReq {
    pub repo_type: RepositoryType,
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub current_user: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadRequest {
    #[serde(flatten)]
    pub repo: LfsRepoReq,
    pub oid: String,
    #[serde(default)]
    pub size: i64,
    /// File name offered to the browser.
    #[serde(default)]
    pub save_as: String,
}

/// Object content pushed through the hub by the basic transfer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadRequest {
    #[serde(flatten)]
    pub repo: LfsRepoReq,
    pub oid: String,
    pub size: i64,
}

impl UploadRequest {
    pub fn pointer(&self) -> Pointer {
        Pointer::new(self.oid.clone(), self.size)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLockRequest {
    #[serde(flatten)]
    pub repo: LfsRepoReq,
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListLocksRequest {
    #[serde(flatten)]
    pub repo: LfsRepoReq,
    /// Lists the single lock with this id when non zero.
    #[serde(default)]
    pub id: i64,
    /// Lists the lock on this path when not empty.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub cursor: usize,
    #[serde(default)]
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnlockRequest {
    #[serde(flatten)]
    pub repo: LfsRepoReq,
    pub id: i64,
    /// Remove a lock owned by someone else.
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyLocksRequest {
    #[serde(flatten)]
    pub repo: LfsRepoReq,
    #[serde(default)]
    pub cursor: usize,
    #[serde(default)]
    pub limit: usize,
}
