use async_trait::async_trait;

use crate::{
    exception::LfsResult,
    model::vo::{
        BatchRequest, BatchResponse, CreateLockRequest, DownloadRequest, LfsLockList,
        LfsLockListVerify, LfsLockView, LfsRepoReq, ListLocksRequest, Pointer, UnlockRequest,
        UploadRequest, VerifyLocksRequest,
    },
};

/// Git LFS batch and locking API of hub repositories.
#[async_trait]
pub trait LfsService: Send + Sync {
    async fn lfs_batch(&self, req: &BatchRequest) -> LfsResult<BatchResponse>;
    /// Store the content of an object announced by a batch upload.
    async fn lfs_upload(&self, req: &UploadRequest, content: Vec<u8>) -> LfsResult<()>;
    /// Confirm an uploaded object is stored with the announced size.
    async fn lfs_verify(&self, req: &LfsRepoReq, pointer: &Pointer) -> LfsResult<()>;
    /// Presigned url to download one object.
    async fn lfs_download(&self, req: &DownloadRequest) -> LfsResult<String>;
    async fn create_lock(&self, req: &CreateLockRequest) -> LfsResult<LfsLockView>;
    async fn list_locks(&self, req: &ListLocksRequest) -> LfsResult<LfsLockList>;
    async fn unlock(&self, req: &UnlockRequest) -> LfsResult<LfsLockView>;
    async fn verify_lock(&self, req: &VerifyLocksRequest) -> LfsResult<LfsLockListVerify>;
}
