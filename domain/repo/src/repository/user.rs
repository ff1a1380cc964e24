use async_trait::async_trait;
use hub_architecture::repository::ReadOnlyRepository;

use crate::model::entity::User;

#[async_trait]
pub trait UserRepo: ReadOnlyRepository<User> + Send + Sync {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
}
