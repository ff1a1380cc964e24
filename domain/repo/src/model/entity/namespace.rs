use serde::{Deserialize, Serialize};

/// Owner of repositories, either a user or an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Namespace {
    pub id: i64,
    pub path: String,
    pub namespace_type: NamespaceType,
    pub user_id: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespaceType {
    #[default]
    User,
    Organization,
}
