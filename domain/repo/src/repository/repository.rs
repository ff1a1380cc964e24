use async_trait::async_trait;
use hub_architecture::repository::ReadOnlyRepository;

use crate::model::{entity::Repository, vo::RepositoryType};

#[async_trait]
pub trait RepositoryRepo: ReadOnlyRepository<Repository> + Send + Sync {
    /// Find a repository by its type and `namespace/name` path.
    async fn find_by_path(
        &self,
        repo_type: RepositoryType,
        namespace: &str,
        name: &str,
    ) -> anyhow::Result<Option<Repository>>;
}
