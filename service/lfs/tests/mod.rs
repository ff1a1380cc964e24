use std::sync::Arc;

use chrono::Utc;
use domain_lfs::{
    exception::LfsException,
    mock::{MockLfsLockRepo, MockLfsMetaObjectRepo, MockObjectStorageService},
    model::{
        entity::{LfsLock, LfsMetaObject},
        vo::{
            BatchRequest, CreateLockRequest, DownloadRequest, LfsRepoReq, ListLocksRequest, Pointer,
            UnlockRequest, UploadRequest, VerifyLocksRequest, LFS_MEDIA_TYPE,
        },
    },
    service::{LfsService, ObjectStat},
};
use domain_repo::{
    exception::RepoException,
    mock::{MockRepoPermissionService, MockRepositoryRepo, MockUserRepo},
    model::{
        entity::{Repository, User},
        vo::RepositoryType,
    },
};
use service_lfs::LfsServiceImpl;

const OID: &str = "4d7a214614ab2935c943f9e0ff69d22eadbb8f32b1258daaa5e2ca24d17e2393";
const REPO_ID: i64 = 9;
/// sha256 of `HELLO`.
const HELLO_OID: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a7380ee9088f7ace2efcde9";
const HELLO: &[u8] = b"hello world";

fn other_oid() -> String {
    "b".repeat(64)
}

struct Fixture {
    repository_repo: MockRepositoryRepo,
    user_repo: MockUserRepo,
    permission: MockRepoPermissionService,
    meta_repo: MockLfsMetaObjectRepo,
    lock_repo: MockLfsLockRepo,
    storage: MockObjectStorageService,
    presign_upload: bool,
}

impl Fixture {
    fn new() -> Self {
        let mut repository_repo = MockRepositoryRepo::new();
        repository_repo
            .expect_find_by_path()
            .withf(|repo_type, namespace, name| {
                *repo_type == RepositoryType::Model && namespace == "ns" && name == "repo"
            })
            .returning(|_, _, _| {
                Ok(Some(Repository {
                    id: REPO_ID,
                    path: "ns/repo".to_owned(),
                    name: "repo".to_owned(),
                    private: true,
                    ..Default::default()
                }))
            });
        Self {
            repository_repo,
            user_repo: MockUserRepo::new(),
            permission: MockRepoPermissionService::new(),
            meta_repo: MockLfsMetaObjectRepo::new(),
            lock_repo: MockLfsLockRepo::new(),
            storage: MockObjectStorageService::new(),
            presign_upload: false,
        }
    }

    fn access(mut self, write: bool, read: bool) -> Self {
        self.permission
            .expect_allow_write_access()
            .returning(move |_, _, _, _| Ok(write));
        self.permission
            .expect_allow_read_access()
            .returning(move |_, _, _, _| Ok(read));
        self
    }

    fn user(mut self) -> Self {
        self.user_repo.expect_find_by_username().returning(|username| {
            Ok((username == "alice").then(|| User {
                id: 1,
                username: "alice".to_owned(),
                ..Default::default()
            }))
        });
        self
    }

    fn existing(mut self, oids: &[&str]) -> Self {
        let objects: Vec<LfsMetaObject> = oids
            .iter()
            .map(|oid| LfsMetaObject {
                oid: oid.to_string(),
                size: 12,
                repository_id: REPO_ID,
                existing: true,
            })
            .collect();
        self.meta_repo
            .expect_find_by_repo_id()
            .withf(|id| *id == REPO_ID)
            .returning(move |_| Ok(objects.clone()));
        self
    }

    fn build(self) -> LfsServiceImpl {
        LfsServiceImpl::builder()
            .repository_repo(Arc::new(self.repository_repo))
            .user_repo(Arc::new(self.user_repo))
            .repo_permission_service(Arc::new(self.permission))
            .lfs_meta_object_repo(Arc::new(self.meta_repo))
            .lfs_lock_repo(Arc::new(self.lock_repo))
            .object_storage(Arc::new(self.storage))
            .public_domain("https://hub.example.com".to_owned())
            .presign_upload(self.presign_upload)
            .build()
    }
}

fn repo_req(user: &str) -> LfsRepoReq {
    LfsRepoReq {
        repo_type: RepositoryType::Model,
        namespace: "ns".to_owned(),
        name: "repo".to_owned(),
        current_user: user.to_owned(),
    }
}

fn batch(operation: &str, user: &str, objects: Vec<Pointer>) -> BatchRequest {
    BatchRequest {
        operation: operation.to_owned(),
        objects,
        namespace: "ns".to_owned(),
        name: "repo".to_owned(),
        repo_type: RepositoryType::Model,
        current_user: user.to_owned(),
        ..Default::default()
    }
}

fn lock(id: i64, user_id: i64, path: &str) -> LfsLock {
    LfsLock {
        id,
        path: path.to_owned(),
        user_id,
        username: if user_id == 1 { "alice" } else { "bob" }.to_owned(),
        repository_id: REPO_ID,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn upload_access_ordering() {
    let service = Fixture::new().access(true, true).existing(&[]).build();
    let resp = service
        .lfs_batch(&batch("upload", "alice", vec![Pointer::new(OID, 12)]))
        .await
        .unwrap();
    assert!(resp.objects[0].actions.is_some());

    let service = Fixture::new().access(false, true).build();
    let err = service.lfs_batch(&batch("upload", "alice", vec![])).await.unwrap_err();
    assert!(matches!(err, LfsException::Forbidden { .. }));
    assert_eq!(err.status(), 403);

    let service = Fixture::new().access(false, false).build();
    let err = service.lfs_batch(&batch("upload", "alice", vec![])).await.unwrap_err();
    assert!(matches!(err, LfsException::NotFound { .. }));

    let service = Fixture::new().build();
    let err = service.lfs_batch(&batch("upload", "", vec![])).await.unwrap_err();
    assert!(matches!(err, LfsException::Unauthorized { .. }));
}

#[tokio::test]
async fn anonymous_download_of_private_repo_is_unauthorized() {
    let mut fixture = Fixture::new();
    fixture.permission.expect_allow_read_access().returning(|_, _, _, _| {
        Err(RepoException::UserNotFound {
            username: String::new(),
        })
    });
    let err = fixture
        .build()
        .lfs_batch(&batch("download", "", vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.status(), 401);

    let service = Fixture::new().access(false, false).build();
    let err = service.lfs_batch(&batch("download", "bob", vec![])).await.unwrap_err();
    assert!(matches!(err, LfsException::NotFound { .. }));
}

#[tokio::test]
async fn unknown_operation_is_bad_request() {
    let err = Fixture::new()
        .build()
        .lfs_batch(&batch("delete", "alice", vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.status(), 400);
    assert!(err.to_string().contains("invalid lfs batch operation"));
}

#[tokio::test]
async fn download_info_per_object() {
    let broken = "c".repeat(64);
    let mut fixture = Fixture::new().access(false, true).existing(&[OID, "abc", broken.as_str()]);
    let expected_key = format!("lfs/4d/7a/{}", &OID[4..]);
    fixture
        .storage
        .expect_presign_read()
        .returning(move |key, _, disposition| {
            assert!(disposition.is_none());
            if key == expected_key {
                Ok(format!("https://s3.example.com/{key}?sig=1"))
            } else {
                Err(anyhow::anyhow!("signer offline"))
            }
        });

    let resp = fixture
        .build()
        .lfs_batch(&batch(
            "download",
            "alice",
            vec![
                Pointer::new(OID, 12),
                Pointer::new(other_oid(), 3),
                Pointer::new("abc", 3),
                Pointer::new(broken, 3),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(resp.transfer, None);
    let download = &resp.objects[0].actions.as_ref().unwrap()["download"];
    assert_eq!(
        download.href,
        format!("https://s3.example.com/lfs/4d/7a/{}?sig=1", &OID[4..])
    );
    assert!(download.expires_at.is_some());
    let codes: Vec<_> = resp.objects[1..]
        .iter()
        .map(|o| o.error.as_ref().unwrap().code)
        .collect();
    assert_eq!(codes, [404, 422, 500]);
    assert_eq!(resp.objects[1].error.as_ref().unwrap().message, "Object does not exist");
}

#[tokio::test]
async fn upload_info_actions() {
    let service = Fixture::new().access(true, true).existing(&[OID]).build();
    let mut req = batch(
        "upload",
        "alice",
        vec![
            Pointer::new(OID, 12),
            Pointer::new(other_oid(), 7),
            Pointer::new("nothex", 7),
        ],
    );
    req.authorization = "Basic YWxpY2U6dG9rZW4=".to_owned();

    let resp = service.lfs_batch(&req).await.unwrap();
    assert_eq!(resp.transfer, None);

    let present = &resp.objects[0];
    assert!(present.actions.is_none() && present.error.is_none());

    let actions = resp.objects[1].actions.as_ref().unwrap();
    let upload = &actions["upload"];
    assert_eq!(
        upload.href,
        format!(
            "https://hub.example.com/models/ns/repo.git/info/lfs/objects/{}/7",
            other_oid()
        )
    );
    assert_eq!(upload.header["Authorization"], "Basic YWxpY2U6dG9rZW4=");
    assert!(!upload.header.contains_key("Accept"));
    let verify = &actions["verify"];
    assert_eq!(verify.href, "https://hub.example.com/models/ns/repo.git/info/lfs/verify");
    assert_eq!(verify.header["Accept"], LFS_MEDIA_TYPE);
    assert_eq!(verify.header["Authorization"], "Basic YWxpY2U6dG9rZW4=");

    assert_eq!(resp.objects[2].error.as_ref().unwrap().code, 422);
}

#[tokio::test]
async fn upload_info_presigned_bucket_url() {
    let mut fixture = Fixture::new().access(true, true).existing(&[]);
    fixture.presign_upload = true;
    fixture
        .storage
        .expect_presign_write()
        .withf(|key, _| key.starts_with("lfs/4d/7a/"))
        .returning(|_, _| Ok("https://s3.example.com/lfs/4d/7a/put?sig=1".to_owned()));
    let mut req = batch("upload", "alice", vec![Pointer::new(OID, 12)]);
    req.authorization = "Basic YWxpY2U6dG9rZW4=".to_owned();

    let resp = fixture.build().lfs_batch(&req).await.unwrap();
    let actions = resp.objects[0].actions.as_ref().unwrap();
    assert_eq!(actions["upload"].href, "https://s3.example.com/lfs/4d/7a/put?sig=1");
    assert!(actions["upload"].header.is_empty());
    assert!(actions["upload"].expires_at.is_some());
    assert_eq!(actions["verify"].header["Authorization"], "Basic YWxpY2U6dG9rZW4=");
}

#[tokio::test]
async fn upload_info_falls_back_to_hub_url() {
    let mut fixture = Fixture::new().access(true, true).existing(&[]);
    fixture.presign_upload = true;
    fixture
        .storage
        .expect_presign_write()
        .returning(|_, _| Err(anyhow::anyhow!("bucket offline")));

    let resp = fixture
        .build()
        .lfs_batch(&batch("upload", "alice", vec![Pointer::new(OID, 12)]))
        .await
        .unwrap();
    let actions = resp.objects[0].actions.as_ref().unwrap();
    assert_eq!(
        actions["upload"].href,
        format!("https://hub.example.com/models/ns/repo.git/info/lfs/objects/{OID}/12")
    );
}

fn upload_req(oid: &str, size: i64) -> UploadRequest {
    UploadRequest {
        repo: repo_req("alice"),
        oid: oid.to_owned(),
        size,
    }
}

#[tokio::test]
async fn upload_stores_new_object() {
    let mut fixture = Fixture::new().access(true, true);
    let key = Pointer::new(HELLO_OID, 11).object_key();
    let stat_key = key.clone();
    fixture
        .storage
        .expect_stat()
        .withf(move |k| k == stat_key)
        .returning(|_| Ok(None));
    fixture
        .storage
        .expect_write()
        .times(1)
        .withf(move |k, content| k == key && content.as_slice() == HELLO)
        .returning(|_, _| Ok(()));

    fixture
        .build()
        .lfs_upload(&upload_req(HELLO_OID, 11), HELLO.to_vec())
        .await
        .unwrap();
}

#[tokio::test]
async fn upload_of_stored_object_only_checks_content() {
    let mut fixture = Fixture::new().access(true, true);
    fixture
        .storage
        .expect_stat()
        .returning(|_| Ok(Some(ObjectStat { size: 11 })));
    fixture.storage.expect_write().never();

    fixture
        .build()
        .lfs_upload(&upload_req(HELLO_OID, 11), HELLO.to_vec())
        .await
        .unwrap();
}

#[tokio::test]
async fn upload_rejects_content_of_another_object() {
    let mut fixture = Fixture::new().access(true, true);
    fixture.storage.expect_stat().never();
    fixture.storage.expect_write().never();
    let service = fixture.build();

    let err = service
        .lfs_upload(&upload_req(HELLO_OID, 11), b"hello worle".to_vec())
        .await
        .unwrap_err();
    assert_eq!(err.status(), 400);

    let err = service
        .lfs_upload(&upload_req(HELLO_OID, 12), HELLO.to_vec())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LfsException::SizeMismatch {
            expected: 12,
            actual: 11,
            ..
        }
    ));

    let err = service
        .lfs_upload(&upload_req("nothex", 11), HELLO.to_vec())
        .await
        .unwrap_err();
    assert_eq!(err.status(), 400);
}

#[tokio::test]
async fn upload_needs_write_access() {
    let mut fixture = Fixture::new().access(false, true);
    fixture.storage.expect_write().never();
    let err = fixture
        .build()
        .lfs_upload(&upload_req(HELLO_OID, 11), HELLO.to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, LfsException::PermissionDenied { .. }));
}

#[tokio::test]
async fn large_upload_needs_multipart() {
    let six_gib = 6 * 1024 * 1024 * 1024;
    let service = Fixture::new().access(true, true).existing(&[]).build();
    let err = service
        .lfs_batch(&batch("upload", "alice", vec![Pointer::new(OID, six_gib)]))
        .await
        .unwrap_err();
    assert_eq!(err.status(), 400);
    assert!(err.to_string().contains("multipart"));

    let mut req = batch("upload", "alice", vec![Pointer::new(OID, six_gib)]);
    req.transfers = vec!["basic".to_owned(), "multipart".to_owned()];
    let resp = service.lfs_batch(&req).await.unwrap();
    assert_eq!(resp.transfer.as_deref(), Some("multipart"));
    assert!(resp.objects[0].actions.as_ref().unwrap().contains_key("upload"));
}

#[tokio::test]
async fn verify_checks_stored_size() {
    let mut fixture = Fixture::new();
    fixture
        .storage
        .expect_stat()
        .returning(|_| Ok(Some(ObjectStat { size: 10 })));
    let err = fixture
        .build()
        .lfs_verify(&repo_req("alice"), &Pointer::new(OID, 12))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LfsException::SizeMismatch {
            expected: 12,
            actual: 10,
            ..
        }
    ));

    let mut fixture = Fixture::new();
    fixture
        .storage
        .expect_stat()
        .withf(|key| key.starts_with("lfs/4d/7a/"))
        .returning(|_| Ok(Some(ObjectStat { size: 12 })));
    fixture
        .meta_repo
        .expect_upsert()
        .times(1)
        .withf(|o| o.oid == OID && o.size == 12 && o.repository_id == REPO_ID && o.existing)
        .returning(|_| Ok(()));
    fixture
        .build()
        .lfs_verify(&repo_req("alice"), &Pointer::new(OID, 12))
        .await
        .unwrap();
}

#[tokio::test]
async fn verify_missing_object_is_not_found() {
    let mut fixture = Fixture::new();
    fixture.storage.expect_stat().returning(|_| Ok(None));
    fixture.meta_repo.expect_upsert().never();
    let err = fixture
        .build()
        .lfs_verify(&repo_req("alice"), &Pointer::new(OID, 12))
        .await
        .unwrap_err();
    assert_eq!(err.status(), 404);
}

#[tokio::test]
async fn download_sets_content_disposition() {
    let mut fixture = Fixture::new().access(false, true);
    fixture
        .meta_repo
        .expect_find_by_oid()
        .withf(|repo_id, oid| *repo_id == REPO_ID && oid == OID)
        .returning(|_, oid| {
            Ok(Some(LfsMetaObject {
                oid: oid.to_owned(),
                size: 12,
                repository_id: REPO_ID,
                existing: true,
            }))
        });
    fixture
        .storage
        .expect_presign_read()
        .times(1)
        .withf(|_, _, disposition| disposition.as_deref() == Some("attachment;filename=model.bin"))
        .returning(|key, _, _| Ok(format!("https://s3.example.com/{key}")));

    let url = fixture
        .build()
        .lfs_download(&DownloadRequest {
            repo: repo_req("alice"),
            oid: OID.to_owned(),
            size: 12,
            save_as: "model.bin".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(url, format!("https://s3.example.com/lfs/4d/7a/{}", &OID[4..]));
}

#[tokio::test]
async fn download_requires_read_access() {
    let service = Fixture::new().access(false, false).build();
    let err = service
        .lfs_download(&DownloadRequest {
            repo: repo_req("bob"),
            oid: OID.to_owned(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), 403);
}

fn create_lock_req(user: &str) -> CreateLockRequest {
    CreateLockRequest {
        repo: repo_req(user),
        path: "weights/model.bin".to_owned(),
    }
}

#[tokio::test]
async fn create_lock_stores_owner() {
    let mut fixture = Fixture::new().user().access(true, true);
    fixture.lock_repo.expect_find_by_path().returning(|_, _| Ok(None));
    fixture
        .lock_repo
        .expect_create()
        .times(1)
        .withf(|l| l.user_id == 1 && l.username == "alice" && l.repository_id == REPO_ID)
        .returning(|l| {
            Ok(Some(LfsLock {
                id: 42,
                ..l.clone()
            }))
        });

    let view = fixture.build().create_lock(&create_lock_req("alice")).await.unwrap();
    assert_eq!(view.id, "42");
    assert_eq!(view.path, "weights/model.bin");
    assert_eq!(view.owner.name, "alice");
}

#[tokio::test]
async fn create_lock_on_locked_path() {
    let mut fixture = Fixture::new().user().access(true, true);
    fixture
        .lock_repo
        .expect_find_by_path()
        .returning(|_, path| Ok(Some(lock(3, 2, path))));
    fixture.lock_repo.expect_create().never();
    let err = fixture.build().create_lock(&create_lock_req("alice")).await.unwrap_err();
    assert!(matches!(err, LfsException::AlreadyExists { .. }));
    assert_eq!(err.status(), 409);
}

#[tokio::test]
async fn create_lock_conflict_on_insert() {
    let mut fixture = Fixture::new().user().access(true, true);
    fixture.lock_repo.expect_find_by_path().returning(|_, _| Ok(None));
    fixture.lock_repo.expect_create().times(1).returning(|_| Ok(None));
    let err = fixture.build().create_lock(&create_lock_req("alice")).await.unwrap_err();
    assert!(matches!(err, LfsException::AlreadyExists { .. }));
}

#[tokio::test]
async fn create_lock_needs_known_writer() {
    let err = Fixture::new()
        .user()
        .build()
        .create_lock(&create_lock_req("mallory"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), 401);

    let err = Fixture::new()
        .user()
        .access(false, true)
        .build()
        .create_lock(&create_lock_req("alice"))
        .await
        .unwrap_err();
    assert!(matches!(err, LfsException::Unauthorized { .. }));
}

#[tokio::test]
async fn list_locks_pages() {
    let mut fixture = Fixture::new().user().access(false, true);
    fixture
        .lock_repo
        .expect_find_by_repo_id()
        .returning(|_, cursor, limit| {
            let count = if cursor == 2 { limit } else { limit - 1 };
            Ok((0..count as i64).map(|i| lock(i + 1, 1, &format!("f{i}"))).collect())
        });
    let service = fixture.build();

    let page = |cursor| ListLocksRequest {
        repo: repo_req("alice"),
        cursor,
        limit: 2,
        ..Default::default()
    };
    let full = service.list_locks(&page(2)).await.unwrap();
    assert_eq!(full.locks.len(), 2);
    assert_eq!(full.next_cursor, "3");

    let last = service.list_locks(&page(3)).await.unwrap();
    assert_eq!(last.locks.len(), 1);
    assert!(last.next_cursor.is_empty());
}

#[tokio::test]
async fn list_locks_by_id_stays_in_repo() {
    let mut fixture = Fixture::new().user().access(false, true);
    fixture.lock_repo.expect_get_by_id().returning(|id| {
        let mut found = lock(id, 2, "a.bin");
        if id == 8 {
            found.repository_id = REPO_ID + 1;
        }
        Ok(Some(found))
    });
    let service = fixture.build();

    let by_id = |id| ListLocksRequest {
        repo: repo_req("alice"),
        id,
        ..Default::default()
    };
    assert_eq!(service.list_locks(&by_id(7)).await.unwrap().locks[0].id, "7");
    assert!(service.list_locks(&by_id(8)).await.unwrap().locks.is_empty());
}

#[tokio::test]
async fn list_locks_by_path() {
    let mut fixture = Fixture::new().user().access(false, true);
    fixture
        .lock_repo
        .expect_find_by_path()
        .withf(|repo_id, path| *repo_id == REPO_ID && path == "a.bin")
        .returning(|_, path| Ok(Some(lock(5, 2, path))));
    let list = fixture
        .build()
        .list_locks(&ListLocksRequest {
            repo: repo_req("alice"),
            path: "a.bin".to_owned(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(list.locks.len(), 1);
    assert_eq!(list.locks[0].owner.name, "bob");
}

#[tokio::test]
async fn unlock_requires_owner_or_force() {
    let mut fixture = Fixture::new().user().access(true, true);
    fixture.lock_repo.expect_get_by_id().returning(|id| Ok(Some(lock(id, 2, "a.bin"))));
    fixture
        .lock_repo
        .expect_remove_by_id()
        .times(1)
        .withf(|id| *id == 5)
        .returning(|_| Ok(()));
    let service = fixture.build();

    let unlock = |force| UnlockRequest {
        repo: repo_req("alice"),
        id: 5,
        force,
    };
    let err = service.unlock(&unlock(false)).await.unwrap_err();
    assert!(matches!(err, LfsException::PermissionDenied { .. }));

    let view = service.unlock(&unlock(true)).await.unwrap();
    assert_eq!(view.owner.name, "bob");
}

#[tokio::test]
async fn unlock_missing_lock() {
    let mut fixture = Fixture::new().user().access(true, true);
    fixture.lock_repo.expect_get_by_id().returning(|_| Ok(None));
    fixture.lock_repo.expect_remove_by_id().never();
    let err = fixture
        .build()
        .unlock(&UnlockRequest {
            repo: repo_req("alice"),
            id: 5,
            force: true,
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), 404);
}

#[tokio::test]
async fn verify_lock_splits_ours_and_theirs() {
    let mut fixture = Fixture::new().user().access(false, true);
    fixture
        .lock_repo
        .expect_find_by_repo_id()
        .withf(|repo_id, cursor, limit| *repo_id == REPO_ID && *cursor == 0 && *limit == 0)
        .returning(|_, _, _| Ok(vec![lock(1, 1, "a"), lock(2, 2, "b"), lock(3, 1, "c")]));

    let verify = fixture
        .build()
        .verify_lock(&VerifyLocksRequest {
            repo: repo_req("alice"),
            ..Default::default()
        })
        .await
        .unwrap();
    let ours: Vec<_> = verify.ours.iter().map(|l| l.path.as_str()).collect();
    let theirs: Vec<_> = verify.theirs.iter().map(|l| l.path.as_str()).collect();
    assert_eq!(ours, ["a", "c"]);
    assert_eq!(theirs, ["b"]);
    assert!(verify.next_cursor.is_empty());
}
