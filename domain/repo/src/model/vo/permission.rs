use serde::{Deserialize, Serialize};

/// Role of a member inside an organization.
///
/// Roles are ordered, a higher role grants everything a lower one does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Read,
    Write,
    Admin,
}

impl MemberRole {
    pub fn grants(self, required: MemberRole) -> bool {
        self >= required
    }
}

/// What a user may do on one repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoPermission {
    pub can_read: bool,
    pub can_write: bool,
    pub can_admin: bool,
}

impl RepoPermission {
    pub fn all() -> Self {
        Self {
            can_read: true,
            can_write: true,
            can_admin: true,
        }
    }

    pub fn read_only(can_read: bool) -> Self {
        Self {
            can_read,
            ..Default::default()
        }
    }
}
