use std::time::Duration;

use async_trait::async_trait;
use hub_architecture::repository::ReadOnlyRepository;
use mockall::mock;

use crate::{
    exception::LfsResult,
    model::{
        entity::{LfsLock, LfsMetaObject},
        vo::{
            BatchRequest, BatchResponse, CreateLockRequest, DownloadRequest, LfsLockList,
            LfsLockListVerify, LfsLockView, LfsRepoReq, ListLocksRequest, Pointer, UnlockRequest,
            UploadRequest, VerifyLocksRequest,
        },
    },
    repository::{LfsLockRepo, LfsMetaObjectRepo},
    service::{LfsService, ObjectStat, ObjectStorageService},
};

mock! {
    pub LfsMetaObjectRepo {}
    #[async_trait]
    impl LfsMetaObjectRepo for LfsMetaObjectRepo {
        async fn find_by_repo_id(&self, repository_id: i64) -> anyhow::Result<Vec<LfsMetaObject>>;
        async fn find_by_oid(&self, repository_id: i64, oid: &str)
            -> anyhow::Result<Option<LfsMetaObject>>;
        async fn upsert(&self, object: &LfsMetaObject) -> anyhow::Result<()>;
    }
}

mock! {
    pub LfsLockRepo {}
    #[async_trait]
    impl LfsLockRepo for LfsLockRepo {
        async fn find_by_path(&self, repository_id: i64, path: &str) -> anyhow::Result<Option<LfsLock>>;
        async fn find_by_repo_id(
            &self,
            repository_id: i64,
            cursor: usize,
            limit: usize,
        ) -> anyhow::Result<Vec<LfsLock>>;
        async fn create(&self, lock: &LfsLock) -> anyhow::Result<Option<LfsLock>>;
        async fn remove_by_id(&self, id: i64) -> anyhow::Result<()>;
    }
    #[async_trait]
    impl ReadOnlyRepository<LfsLock> for LfsLockRepo {
        async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<LfsLock>>;
    }
}

mock! {
    pub ObjectStorageService {}
    #[async_trait]
    impl ObjectStorageService for ObjectStorageService {
        async fn presign_read(
            &self,
            key: &str,
            expire: Duration,
            content_disposition: Option<String>,
        ) -> anyhow::Result<String>;
        async fn presign_write(&self, key: &str, expire: Duration) -> anyhow::Result<String>;
        async fn write(&self, key: &str, content: Vec<u8>) -> anyhow::Result<()>;
        async fn stat(&self, key: &str) -> anyhow::Result<Option<ObjectStat>>;
    }
}

mock! {
    pub LfsService {}
    #[async_trait]
    impl LfsService for LfsService {
        async fn lfs_batch(&self, req: &BatchRequest) -> LfsResult<BatchResponse>;
        async fn lfs_upload(&self, req: &UploadRequest, content: Vec<u8>) -> LfsResult<()>;
        async fn lfs_verify(&self, req: &LfsRepoReq, pointer: &Pointer) -> LfsResult<()>;
        async fn lfs_download(&self, req: &DownloadRequest) -> LfsResult<String>;
        async fn create_lock(&self, req: &CreateLockRequest) -> LfsResult<LfsLockView>;
        async fn list_locks(&self, req: &ListLocksRequest) -> LfsResult<LfsLockList>;
        async fn unlock(&self, req: &UnlockRequest) -> LfsResult<LfsLockView>;
        async fn verify_lock(&self, req: &VerifyLocksRequest) -> LfsResult<LfsLockListVerify>;
    }
}
