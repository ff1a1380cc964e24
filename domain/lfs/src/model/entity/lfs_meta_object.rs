use serde::{Deserialize, Serialize};

/// LFS object known to belong to a repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LfsMetaObject {
    pub oid: String,
    pub size: i64,
    pub repository_id: i64,
    /// Whether the content was verified to be in object storage.
    pub existing: bool,
}
