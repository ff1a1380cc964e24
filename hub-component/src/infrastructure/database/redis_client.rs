use redis::{from_redis_value, Cmd, ConnectionLike, FromRedisValue, RedisResult};
use serde::{de::DeserializeOwned, Serialize};

#[derive(Clone)]
pub enum RedisClient {
    Single(redis::Client),
    Cluster(redis::cluster::ClusterClient),
}

pub enum RedisConnection {
    Single(redis::Connection),
    Cluster(redis::cluster::ClusterConnection),
}

impl RedisClient {
    /// A single node for one url, a cluster for more.
    pub fn open(urls: &[String]) -> anyhow::Result<Self> {
        Ok(match urls {
            [] => anyhow::bail!("No redis url configured."),
            [url] => RedisClient::Single(redis::Client::open(url.as_str())?),
            _ => RedisClient::Cluster(redis::cluster::ClusterClient::new(urls.to_vec())?),
        })
    }

    pub fn get_connection(&self) -> RedisResult<RedisConnection> {
        match self {
            RedisClient::Single(s) => Ok(RedisConnection::Single(s.get_connection()?)),
            RedisClient::Cluster(c) => Ok(RedisConnection::Cluster(c.get_connection()?)),
        }
    }
}

impl RedisConnection {
    pub fn check_open(&self) -> anyhow::Result<()> {
        let flag = match self {
            RedisConnection::Single(sc) => sc.is_open(),
            RedisConnection::Cluster(cc) => cc.is_open(),
        };
        if !flag {
            anyhow::bail!("Redis connection is closed.");
        }
        Ok(())
    }

    pub fn query<T: FromRedisValue>(&mut self, cmd: &Cmd) -> RedisResult<T> {
        match self {
            RedisConnection::Single(sc) => from_redis_value(&sc.req_command(cmd)?),
            RedisConnection::Cluster(cc) => from_redis_value(&cc.req_command(cmd)?),
        }
    }

    pub fn get_json<T: DeserializeOwned>(&mut self, key: &str) -> anyhow::Result<Option<T>> {
        let value: Option<String> = self.query(&Cmd::get(key))?;
        Ok(match value {
            Some(value) => Some(serde_json::from_str(&value)?),
            None => None,
        })
    }

    pub fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> anyhow::Result<()> {
        self.query::<()>(&Cmd::set(key, serde_json::to_string(value)?))?;
        Ok(())
    }

    /// Id stored under an index key.
    pub fn get_id(&mut self, key: &str) -> anyhow::Result<Option<i64>> {
        Ok(self.query(&Cmd::get(key))?)
    }

    /// Follow an index key to the entity it points at.
    pub fn get_indexed<T: DeserializeOwned>(
        &mut self,
        index_key: &str,
        entity_key: impl Fn(i64) -> String,
    ) -> anyhow::Result<Option<T>> {
        match self.get_id(index_key)? {
            Some(id) => self.get_json(&entity_key(id)),
            None => Ok(None),
        }
    }

    /// Next value of a sequence, starting at 1.
    pub fn next_id(&mut self, sequence: &str) -> anyhow::Result<i64> {
        Ok(self.query(&Cmd::incr(format!("seq:{sequence}"), 1))?)
    }

    pub fn delete(&mut self, key: &str) -> anyhow::Result<()> {
        self.query::<()>(&Cmd::del(key))?;
        Ok(())
    }
}
