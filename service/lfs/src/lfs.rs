use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
    time::Duration,
};

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::Utc;
use domain_lfs::{
    exception::{LfsException, LfsResult},
    model::{
        entity::{LfsLock, LfsMetaObject},
        vo::{
            BatchOperation, BatchRequest, BatchResponse, CreateLockRequest, DownloadRequest,
            LfsLockList, LfsLockListVerify, LfsLockView, LfsRepoReq, Link, ListLocksRequest,
            ObjectResponse, Pointer, UnlockRequest, UploadRequest, VerifyLocksRequest,
            LFS_MEDIA_TYPE,
        },
    },
    repository::{LfsLockRepo, LfsMetaObjectRepo},
    service::{LfsService, ObjectStorageService},
};
use domain_repo::{
    exception::RepoException,
    model::entity::{Repository, User},
    repository::{RepositoryRepo, UserRepo},
    service::RepoPermissionService,
};
use hub_architecture::repository::ReadOnlyRepository;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use typed_builder::TypedBuilder;
use url::Url;

/// Largest object accepted through a single PUT.
pub const MAX_SINGLE_UPLOAD_SIZE: i64 = 5 * 1024 * 1024 * 1024;

#[derive(TypedBuilder)]
pub struct LfsServiceImpl {
    repository_repo: Arc<dyn RepositoryRepo>,
    user_repo: Arc<dyn UserRepo>,
    repo_permission_service: Arc<dyn RepoPermissionService>,
    lfs_meta_object_repo: Arc<dyn LfsMetaObjectRepo>,
    lfs_lock_repo: Arc<dyn LfsLockRepo>,
    object_storage: Arc<dyn ObjectStorageService>,
    /// Base url the git clients reach the hub on.
    public_domain: String,
    #[builder(default = Duration::from_secs(3600))]
    presign_expiry: Duration,
    #[builder(default = MAX_SINGLE_UPLOAD_SIZE)]
    max_single_upload_size: i64,
    /// Hand out presigned bucket urls for uploads instead of the hub's own endpoint.
    #[builder(default)]
    presign_upload: bool,
}

impl LfsServiceImpl {
    async fn find_repo(&self, req: &LfsRepoReq) -> LfsResult<Repository> {
        self.repository_repo
            .find_by_path(req.repo_type, &req.namespace, &req.name)
            .await
            .context("failed to find repo")?
            .ok_or_else(|| {
                LfsException::not_found(format!(
                    "repository {}/{} does not exist",
                    req.namespace, req.name
                ))
            })
    }

    async fn find_user(&self, username: &str) -> LfsResult<User> {
        if username.is_empty() {
            return Err(LfsException::unauthorized("login is required"));
        }
        self.user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| LfsException::unauthorized(format!("user {username} does not exist")))
    }

    async fn allow_read(&self, req: &LfsRepoReq) -> LfsResult<bool> {
        Ok(self
            .repo_permission_service
            .allow_read_access(req.repo_type, &req.namespace, &req.name, &req.current_user)
            .await?)
    }

    async fn allow_write(&self, req: &LfsRepoReq) -> LfsResult<bool> {
        Ok(self
            .repo_permission_service
            .allow_write_access(req.repo_type, &req.namespace, &req.name, &req.current_user)
            .await?)
    }

    /// Denials a user could read the repository through answer `Forbidden`,
    /// any other denial answers `NotFound` so private repositories stay hidden.
    async fn check_batch_access(&self, operation: BatchOperation, req: &LfsRepoReq) -> LfsResult<()> {
        match operation {
            BatchOperation::Upload => {
                if req.current_user.is_empty() {
                    return Err(LfsException::unauthorized("login is required to upload"));
                }
                if self.allow_write(req).await? {
                    return Ok(());
                }
                if self.allow_read(req).await? {
                    return Err(LfsException::forbidden("no write access to the repository"));
                }
                Err(LfsException::not_found("repository does not exist"))
            }
            BatchOperation::Download => match self.allow_read(req).await {
                Ok(true) => Ok(()),
                Ok(false) => Err(LfsException::not_found("repository does not exist")),
                Err(LfsException::Repo(RepoException::UserNotFound { .. }))
                    if req.current_user.is_empty() =>
                {
                    Err(LfsException::unauthorized("login is required"))
                }
                Err(e) => Err(e),
            },
        }
    }

    async fn existing_oids(&self, repo: &Repository) -> LfsResult<HashSet<String>> {
        let objects = self
            .lfs_meta_object_repo
            .find_by_repo_id(repo.id)
            .await
            .context("failed to list lfs objects")?;
        Ok(objects.into_iter().map(|o| o.oid).collect())
    }

    /// `{public_domain}/{repo_type}s/{namespace}/{name}.git/` followed by `tail`.
    fn repo_url(&self, req: &LfsRepoReq, tail: &[&str]) -> LfsResult<String> {
        let mut url = Url::parse(&self.public_domain)
            .with_context(|| format!("invalid lfs public domain {}", self.public_domain))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("lfs public domain {} cannot be a base", self.public_domain))?
            .pop_if_empty()
            .push(&format!("{}s", req.repo_type))
            .push(&req.namespace)
            .push(&format!("{}.git", req.name))
            .extend(tail);
        Ok(url.into())
    }

    async fn upload_link(
        &self,
        req: &LfsRepoReq,
        pointer: &Pointer,
        header: &BTreeMap<String, String>,
    ) -> LfsResult<Link> {
        if self.presign_upload {
            match self
                .object_storage
                .presign_write(&pointer.object_key(), self.presign_expiry)
                .await
            {
                Ok(href) => return Ok(self.link(href)),
                Err(e) => warn!(oid = %pointer.oid, "failed to presign lfs upload: {e:#}"),
            }
        }
        let size = pointer.size.to_string();
        Ok(Link {
            href: self.repo_url(
                req,
                &["info", "lfs", "objects", pointer.oid.as_str(), size.as_str()],
            )?,
            header: header.clone(),
            expires_at: None,
        })
    }

    fn link(&self, href: String) -> Link {
        Link {
            href,
            header: BTreeMap::new(),
            expires_at: chrono::Duration::from_std(self.presign_expiry)
                .ok()
                .map(|expiry| Utc::now() + expiry),
        }
    }

    async fn download_info(&self, req: &BatchRequest, repo: &Repository) -> LfsResult<BatchResponse> {
        let existing = self.existing_oids(repo).await?;
        let mut objects = Vec::with_capacity(req.objects.len());
        for pointer in &req.objects {
            if !existing.contains(&pointer.oid) {
                objects.push(ObjectResponse::failed(pointer.clone(), 404, "Object does not exist"));
                continue;
            }
            if !pointer.valid() {
                objects.push(ObjectResponse::failed(pointer.clone(), 422, "Invalid object"));
                continue;
            }
            match self
                .object_storage
                .presign_read(&pointer.object_key(), self.presign_expiry, None)
                .await
            {
                Ok(href) => {
                    let actions = BTreeMap::from([("download".to_owned(), self.link(href))]);
                    objects.push(ObjectResponse::with_actions(pointer.clone(), actions));
                }
                Err(e) => {
                    warn!(oid = %pointer.oid, "failed to presign lfs download: {e:#}");
                    objects.push(ObjectResponse::failed(
                        pointer.clone(),
                        500,
                        "failed to sign download url",
                    ));
                }
            }
        }
        Ok(BatchResponse {
            transfer: None,
            objects,
        })
    }

    async fn upload_info(&self, req: &BatchRequest, repo: &Repository) -> LfsResult<BatchResponse> {
        let mut header = BTreeMap::new();
        if !req.authorization.is_empty() {
            header.insert("Authorization".to_owned(), req.authorization.clone());
        }
        let mut verify_header = header.clone();
        verify_header.insert("Accept".to_owned(), LFS_MEDIA_TYPE.to_owned());

        let multipart = req.wants_multipart();
        let existing = self.existing_oids(repo).await?;
        let lfs_repo = req.repo();
        let verify_href = self.repo_url(&lfs_repo, &["info", "lfs", "verify"])?;

        let mut objects = Vec::with_capacity(req.objects.len());
        for pointer in &req.objects {
            // the client assumes the server has objects returned without actions
            if existing.contains(&pointer.oid) {
                objects.push(ObjectResponse::present(pointer.clone()));
                continue;
            }
            if !pointer.valid() {
                objects.push(ObjectResponse::failed(pointer.clone(), 422, "Invalid object"));
                continue;
            }
            if pointer.size > self.max_single_upload_size && !multipart {
                return Err(LfsException::bad_request(
                    "You need to enable the multipart transfer to upload files larger than 5GB.\n\
                     Configure your lfs client to use the multipart transfer adapter and try again.",
                ));
            }
            let actions = BTreeMap::from([
                ("upload".to_owned(), self.upload_link(&lfs_repo, pointer, &header).await?),
                (
                    "verify".to_owned(),
                    Link {
                        href: verify_href.clone(),
                        header: verify_header.clone(),
                        expires_at: None,
                    },
                ),
            ]);
            objects.push(ObjectResponse::with_actions(pointer.clone(), actions));
        }
        Ok(BatchResponse {
            transfer: multipart.then(|| "multipart".to_owned()),
            objects,
        })
    }

    async fn page_locks(
        &self,
        repo: &Repository,
        cursor: usize,
        limit: usize,
    ) -> LfsResult<(Vec<LfsLock>, String)> {
        let locks = self
            .lfs_lock_repo
            .find_by_repo_id(repo.id, cursor, limit)
            .await
            .context("failed to list lfs locks")?;
        let next_cursor = if limit > 0 && locks.len() == limit {
            (cursor + 1).to_string()
        } else {
            String::new()
        };
        Ok((locks, next_cursor))
    }
}

#[async_trait]
impl LfsService for LfsServiceImpl {
    async fn lfs_batch(&self, req: &BatchRequest) -> LfsResult<BatchResponse> {
        let lfs_repo = req.repo();
        let repo = self.find_repo(&lfs_repo).await?;
        let operation = BatchOperation::parse(&req.operation).ok_or_else(|| {
            LfsException::bad_request(format!("invalid lfs batch operation: {}", req.operation))
        })?;
        self.check_batch_access(operation, &lfs_repo).await?;

        match operation {
            BatchOperation::Upload => self.upload_info(req, &repo).await,
            BatchOperation::Download => self.download_info(req, &repo).await,
        }
    }

    async fn lfs_upload(&self, req: &UploadRequest, content: Vec<u8>) -> LfsResult<()> {
        let repo = self.find_repo(&req.repo).await?;
        if !self.allow_write(&req.repo).await? {
            return Err(LfsException::PermissionDenied {
                message: "no write access to the repository".to_owned(),
            });
        }
        let pointer = req.pointer();
        if !pointer.valid() {
            return Err(LfsException::bad_request(format!("invalid lfs oid {}", pointer.oid)));
        }
        let actual = content.len() as i64;
        if actual != pointer.size {
            return Err(LfsException::SizeMismatch {
                oid: pointer.oid,
                expected: pointer.size,
                actual,
            });
        }
        if hex::encode(Sha256::digest(&content)) != pointer.oid {
            return Err(LfsException::bad_request(format!(
                "content does not hash to lfs oid {}",
                pointer.oid
            )));
        }

        let key = pointer.object_key();
        let stored = self
            .object_storage
            .stat(&key)
            .await
            .context("failed to stat lfs object")?;
        if stored.is_some() {
            return Ok(());
        }
        self.object_storage
            .write(&key, content)
            .await
            .context("failed to store lfs object")?;
        info!(repo = %repo.path, oid = %pointer.oid, size = pointer.size, "lfs object stored");
        Ok(())
    }

    async fn lfs_verify(&self, req: &LfsRepoReq, pointer: &Pointer) -> LfsResult<()> {
        let repo = self.find_repo(req).await?;
        let stat = self
            .object_storage
            .stat(&pointer.object_key())
            .await
            .context("failed to stat lfs object")?
            .ok_or_else(|| {
                LfsException::not_found(format!("object {} was not uploaded", pointer.oid))
            })?;
        if stat.size != pointer.size {
            return Err(LfsException::SizeMismatch {
                oid: pointer.oid.clone(),
                expected: pointer.size,
                actual: stat.size,
            });
        }

        self.lfs_meta_object_repo
            .upsert(&LfsMetaObject {
                oid: pointer.oid.clone(),
                size: pointer.size,
                repository_id: repo.id,
                existing: true,
            })
            .await
            .context("failed to update or create lfs meta object")?;
        Ok(())
    }

    async fn lfs_download(&self, req: &DownloadRequest) -> LfsResult<String> {
        let repo = self.find_repo(&req.repo).await?;
        if !self.allow_read(&req.repo).await? {
            return Err(LfsException::forbidden("no permission to access this repo"));
        }
        self.lfs_meta_object_repo
            .find_by_oid(repo.id, &req.oid)
            .await
            .context("failed to find lfs meta object")?
            .ok_or_else(|| LfsException::not_found(format!("object {} does not exist", req.oid)))?;

        let content_disposition =
            (!req.save_as.is_empty()).then(|| format!("attachment;filename={}", req.save_as));
        let key = Pointer::new(req.oid.clone(), req.size).object_key();
        Ok(self
            .object_storage
            .presign_read(&key, self.presign_expiry, content_disposition)
            .await?)
    }

    async fn create_lock(&self, req: &CreateLockRequest) -> LfsResult<LfsLockView> {
        let repo = self.find_repo(&req.repo).await?;
        let user = self.find_user(&req.repo.current_user).await?;
        if !self.allow_write(&req.repo).await? {
            return Err(LfsException::unauthorized("no write access to the repository"));
        }

        let already_locked = || LfsException::already_exists(format!("lock exists on {}", req.path));
        if self
            .lfs_lock_repo
            .find_by_path(repo.id, &req.path)
            .await
            .context("failed to find lfs lock")?
            .is_some()
        {
            return Err(already_locked());
        }

        let lock = LfsLock {
            id: 0,
            path: req.path.clone(),
            user_id: user.id,
            username: user.username,
            repository_id: repo.id,
            created_at: Utc::now(),
        };
        let lock = self
            .lfs_lock_repo
            .create(&lock)
            .await
            .context("failed to create lfs lock")?
            .ok_or_else(already_locked)?;
        info!(repo = %repo.path, path = %lock.path, user = %lock.username, "lfs lock created");
        Ok(lock.view())
    }

    async fn list_locks(&self, req: &ListLocksRequest) -> LfsResult<LfsLockList> {
        let repo = self.find_repo(&req.repo).await?;
        self.find_user(&req.repo.current_user).await?;
        if !self.allow_read(&req.repo).await? {
            return Err(LfsException::unauthorized("no read access to the repository"));
        }

        if req.id != 0 {
            let lock = self.lfs_lock_repo.get_by_id(req.id).await?;
            return Ok(LfsLockList {
                locks: lock
                    .filter(|l| l.repository_id == repo.id)
                    .map(|l| l.view())
                    .into_iter()
                    .collect(),
                next_cursor: String::new(),
            });
        }
        if !req.path.is_empty() {
            let lock = self.lfs_lock_repo.find_by_path(repo.id, &req.path).await?;
            return Ok(LfsLockList {
                locks: lock.map(|l| l.view()).into_iter().collect(),
                next_cursor: String::new(),
            });
        }

        let (locks, next_cursor) = self.page_locks(&repo, req.cursor, req.limit).await?;
        Ok(LfsLockList {
            locks: locks.iter().map(LfsLock::view).collect(),
            next_cursor,
        })
    }

    async fn unlock(&self, req: &UnlockRequest) -> LfsResult<LfsLockView> {
        let repo = self.find_repo(&req.repo).await?;
        let user = self.find_user(&req.repo.current_user).await?;
        if !self.allow_write(&req.repo).await? {
            return Err(LfsException::unauthorized("no write access to the repository"));
        }

        let lock = self
            .lfs_lock_repo
            .get_by_id(req.id)
            .await
            .context("failed to find lfs lock")?
            .filter(|l| l.repository_id == repo.id)
            .ok_or_else(|| LfsException::not_found(format!("lock {} does not exist", req.id)))?;
        if !req.force && lock.user_id != user.id {
            return Err(LfsException::PermissionDenied {
                message: format!("lock {} is owned by {}", lock.id, lock.username),
            });
        }
        self.lfs_lock_repo
            .remove_by_id(lock.id)
            .await
            .context("failed to remove lfs lock")?;
        info!(repo = %repo.path, path = %lock.path, force = req.force, "lfs lock removed");
        Ok(lock.view())
    }

    async fn verify_lock(&self, req: &VerifyLocksRequest) -> LfsResult<LfsLockListVerify> {
        let repo = self.find_repo(&req.repo).await?;
        let user = self.find_user(&req.repo.current_user).await?;
        if !self.allow_read(&req.repo).await? {
            return Err(LfsException::unauthorized("no read access to the repository"));
        }

        let (locks, next_cursor) = self.page_locks(&repo, req.cursor, req.limit).await?;
        let (ours, theirs): (Vec<_>, Vec<_>) = locks.iter().partition(|l| l.user_id == user.id);
        Ok(LfsLockListVerify {
            ours: ours.into_iter().map(LfsLock::view).collect(),
            theirs: theirs.into_iter().map(LfsLock::view).collect(),
            next_cursor,
        })
    }
}
