use async_trait::async_trait;

use crate::model::entity::SpaceResource;

/// Balance checks before consuming pay-as-you-go resources.
#[async_trait]
pub trait AccountingService: Send + Sync {
    async fn can_afford(&self, user_uuid: &str, resource: &SpaceResource) -> anyhow::Result<bool>;
}
