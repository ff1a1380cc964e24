use hub_architecture::model::derive::AggregateRoot;
use serde::{Deserialize, Serialize};

/// Hub user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, AggregateRoot)]
pub struct User {
    pub id: i64,
    pub uuid: String,
    pub username: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    /// Comma separated roles, e.g. `person,admin`.
    #[serde(default)]
    pub role_mask: String,
}

impl User {
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.role_mask.split(',').map(str::trim).filter(|r| !r.is_empty())
    }

    pub fn can_admin(&self) -> bool {
        self.roles().any(|r| r == "admin" || r == "super_user")
    }
}
