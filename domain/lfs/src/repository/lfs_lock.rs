use async_trait::async_trait;
use hub_architecture::repository::ReadOnlyRepository;

use crate::model::entity::LfsLock;

#[async_trait]
pub trait LfsLockRepo: ReadOnlyRepository<LfsLock> + Send + Sync {
    async fn find_by_path(&self, repository_id: i64, path: &str) -> anyhow::Result<Option<LfsLock>>;

    /// Page `cursor` of the locks of a repository, `limit == 0` returning all of them.
    async fn find_by_repo_id(
        &self,
        repository_id: i64,
        cursor: usize,
        limit: usize,
    ) -> anyhow::Result<Vec<LfsLock>>;

    /// Insert the lock unless its path is already locked in the repository.
    ///
    /// Returns the stored lock with its id, or `None` on conflict.
    async fn create(&self, lock: &LfsLock) -> anyhow::Result<Option<LfsLock>>;

    async fn remove_by_id(&self, id: i64) -> anyhow::Result<()>;
}
