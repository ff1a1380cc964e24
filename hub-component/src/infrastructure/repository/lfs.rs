use domain_lfs::{
    model::entity::{LfsLock, LfsMetaObject},
    repository::{LfsLockRepo, LfsMetaObjectRepo},
};
use hub_architecture::repository::ReadOnlyRepository;
use redis::Cmd;
use tracing::debug;

use crate::infrastructure::database::RedisRepo;

fn meta_object_key(repository_id: i64, oid: &str) -> String {
    format!("lfs_meta:{repository_id}:{oid}")
}

fn meta_objects_key(repository_id: i64) -> String {
    format!("lfs_meta:{repository_id}")
}

fn lock_key(id: i64) -> String {
    format!("lfs_lock:{id}")
}

/// Holds the id of the lock on a path, written with `SETNX`.
fn lock_path_key(repository_id: i64, path: &str) -> String {
    format!("lfs_lock:path:{repository_id}:{path}")
}

/// Sorted set of the lock ids of a repository, scored by id.
fn repo_locks_key(repository_id: i64) -> String {
    format!("lfs_lock:repo:{repository_id}")
}

/// Inclusive rank range of a page, the whole set when `limit == 0`.
fn page_range(cursor: usize, limit: usize) -> (isize, isize) {
    if limit == 0 {
        return (0, -1);
    }
    let start = cursor.saturating_mul(limit);
    let stop = start.saturating_add(limit - 1);
    (
        isize::try_from(start).unwrap_or(isize::MAX),
        isize::try_from(stop).unwrap_or(isize::MAX),
    )
}

#[async_trait::async_trait]
impl LfsMetaObjectRepo for RedisRepo {
    async fn find_by_repo_id(&self, repository_id: i64) -> anyhow::Result<Vec<LfsMetaObject>> {
        let mut connection = self.connection()?;
        let mut oids: Vec<String> = connection.query(&Cmd::smembers(meta_objects_key(repository_id)))?;
        oids.sort();
        let mut objects = Vec::with_capacity(oids.len());
        for oid in oids {
            if let Some(object) = connection.get_json(&meta_object_key(repository_id, &oid))? {
                objects.push(object);
            }
        }
        Ok(objects)
    }

    async fn find_by_oid(
        &self,
        repository_id: i64,
        oid: &str,
    ) -> anyhow::Result<Option<LfsMetaObject>> {
        self.connection()?.get_json(&meta_object_key(repository_id, oid))
    }

    async fn upsert(&self, object: &LfsMetaObject) -> anyhow::Result<()> {
        let mut connection = self.connection()?;
        connection.set_json(&meta_object_key(object.repository_id, &object.oid), object)?;
        connection.query::<()>(&Cmd::sadd(meta_objects_key(object.repository_id), &object.oid))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ReadOnlyRepository<LfsLock> for RedisRepo {
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<LfsLock>> {
        self.connection()?.get_json(&lock_key(id))
    }
}

#[async_trait::async_trait]
impl LfsLockRepo for RedisRepo {
    async fn find_by_path(&self, repository_id: i64, path: &str) -> anyhow::Result<Option<LfsLock>> {
        self.connection()?.get_indexed(&lock_path_key(repository_id, path), lock_key)
    }

    async fn find_by_repo_id(
        &self,
        repository_id: i64,
        cursor: usize,
        limit: usize,
    ) -> anyhow::Result<Vec<LfsLock>> {
        let mut connection = self.connection()?;
        let (start, stop) = page_range(cursor, limit);
        let ids: Vec<i64> = connection.query(&Cmd::zrange(repo_locks_key(repository_id), start, stop))?;
        let mut locks = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(lock) = connection.get_json(&lock_key(id))? {
                locks.push(lock);
            }
        }
        Ok(locks)
    }

    async fn create(&self, lock: &LfsLock) -> anyhow::Result<Option<LfsLock>> {
        let mut connection = self.connection()?;
        let mut lock = lock.clone();
        lock.id = connection.next_id("lfs_lock")?;
        let acquired: bool =
            connection.query(&Cmd::set_nx(lock_path_key(lock.repository_id, &lock.path), lock.id))?;
        if !acquired {
            debug!(repository_id = lock.repository_id, path = %lock.path, "path already locked");
            return Ok(None);
        }
        connection.set_json(&lock_key(lock.id), &lock)?;
        connection.query::<()>(&Cmd::zadd(repo_locks_key(lock.repository_id), lock.id, lock.id))?;
        Ok(Some(lock))
    }

    async fn remove_by_id(&self, id: i64) -> anyhow::Result<()> {
        let mut connection = self.connection()?;
        if let Some(lock) = connection.get_json::<LfsLock>(&lock_key(id))? {
            connection.delete(&lock_path_key(lock.repository_id, &lock.path))?;
            connection.query::<()>(&Cmd::zrem(repo_locks_key(lock.repository_id), id))?;
        }
        connection.delete(&lock_key(id))
    }
}
