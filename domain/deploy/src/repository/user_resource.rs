use async_trait::async_trait;

use crate::model::entity::UserResource;

#[async_trait]
pub trait UserResourceRepo: Send + Sync {
    async fn find_by_order_detail_id(
        &self,
        user_uid: &str,
        order_detail_id: i64,
    ) -> anyhow::Result<Option<UserResource>>;
    async fn update(&self, resource: &UserResource) -> anyhow::Result<()>;
}
