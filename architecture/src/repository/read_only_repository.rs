/// Repository for reading entities.
#[async_trait::async_trait]
pub trait ReadOnlyRepository<T>: Send + Sync
where
    T: Send + crate::model::AggregateRoot,
{
    /// Get an entity by its id, `None` when it doesn't exist.
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<T>>;
}
