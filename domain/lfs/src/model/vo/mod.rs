mod batch;
mod lock;
mod pointer;
mod request;

#[rustfmt::skip]
pub use {
    batch::{BatchOperation, BatchRequest, BatchResponse, Link, ObjectError, ObjectResponse, Reference, LFS_MEDIA_TYPE},
    lock::{LfsLockList, LfsLockListVerify, LfsLockView, LockOwner},
    pointer::Pointer,
    request::{CreateLockRequest, DownloadRequest, ListLocksRequest, LfsRepoReq, UnlockRequest, UploadRequest, VerifyLocksRequest},
};
