/// Repository for changing entities.
#[async_trait::async_trait]
pub trait MutableRepository<T>: Send + Sync
where
    T: Send + Sync + crate::model::AggregateRoot,
{
    /// Insert an entity, returning the id it is stored with.
    ///
    /// An entity with id `0` gets a newly allocated id.
    async fn insert(&self, entity: &T) -> anyhow::Result<i64>;
    /// Overwrite an existing entity.
    async fn update(&self, entity: &T) -> anyhow::Result<()>;
    /// Delete an entity by id.
    async fn delete_by_id(&self, id: i64) -> anyhow::Result<()>;
}
