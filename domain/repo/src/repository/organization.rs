use async_trait::async_trait;

use crate::model::vo::MemberRole;

#[async_trait]
pub trait OrganizationRepo: Send + Sync {
    /// Role of the user in the organization, `None` if not a member.
    async fn member_role(&self, org_path: &str, username: &str)
        -> anyhow::Result<Option<MemberRole>>;
    /// Paths of all organizations the user belongs to.
    async fn org_paths_of_user(&self, user_id: i64) -> anyhow::Result<Vec<String>>;
}
