mod redis_client;

use std::sync::Arc;

pub use redis_client::{RedisClient, RedisConnection};
use typed_builder::TypedBuilder;

/// Store implementing the repositories of every domain on redis.
///
/// Entities are JSON values under `<entity>:<id>`, lookups go through index
/// keys holding ids, ids come from `INCR seq:<entity>`.
#[derive(TypedBuilder)]
pub struct RedisRepo {
    pub client: Arc<RedisClient>,
}

impl RedisRepo {
    pub fn connection(&self) -> anyhow::Result<RedisConnection> {
        let connection = self.client.get_connection()?;
        connection.check_open()?;
        Ok(connection)
    }
}
