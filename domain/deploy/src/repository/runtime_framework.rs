use async_trait::async_trait;
use hub_architecture::repository::ReadOnlyRepository;

use crate::model::entity::RuntimeFramework;

#[async_trait]
pub trait RuntimeFrameworkRepo: ReadOnlyRepository<RuntimeFramework> + Send + Sync {
    async fn find_enabled_by_name(&self, name: &str) -> anyhow::Result<Option<RuntimeFramework>>;
}
