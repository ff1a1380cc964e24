use std::sync::Arc;

use domain_repo::{
    exception::RepoException,
    mock::{MockNamespaceRepo, MockOrganizationRepo, MockRepositoryRepo, MockUserRepo},
    model::{
        entity::{Namespace, NamespaceType, Repository, User},
        vo::{MemberRole, RepositoryType},
    },
    service::RepoPermissionService,
};
use service_repo::RepoPermissionServiceImpl;

fn repo(path: &str, private: bool) -> Repository {
    let (_, name) = path.split_once('/').unwrap();
    Repository {
        id: 1,
        user_id: 1,
        path: path.to_owned(),
        name: name.to_owned(),
        private,
        repository_type: RepositoryType::Model,
        ..Default::default()
    }
}

fn user(id: i64, username: &str, role_mask: &str) -> User {
    User {
        id,
        username: username.to_owned(),
        role_mask: role_mask.to_owned(),
        ..Default::default()
    }
}

fn namespace(path: &str, namespace_type: NamespaceType) -> Namespace {
    Namespace {
        path: path.to_owned(),
        namespace_type,
        ..Default::default()
    }
}

struct Mocks {
    users: MockUserRepo,
    repos: MockRepositoryRepo,
    namespaces: MockNamespaceRepo,
    orgs: MockOrganizationRepo,
}

impl Mocks {
    fn new() -> Self {
        Self {
            users: MockUserRepo::new(),
            repos: MockRepositoryRepo::new(),
            namespaces: MockNamespaceRepo::new(),
            orgs: MockOrganizationRepo::new(),
        }
    }

    fn with_users(mut self, users: Vec<User>) -> Self {
        self.users.expect_find_by_username().returning(move |name| {
            Ok(users.iter().find(|u| u.username == name).cloned())
        });
        self
    }

    fn with_namespace(mut self, ns: Namespace) -> Self {
        self.namespaces
            .expect_find_by_path()
            .returning(move |path| Ok((ns.path == path).then(|| ns.clone())));
        self
    }

    fn with_repo(mut self, repo: Repository) -> Self {
        self.repos
            .expect_find_by_path()
            .returning(move |_, ns, name| Ok((repo.path == format!("{ns}/{name}")).then(|| repo.clone())));
        self
    }

    fn with_role(mut self, role: Option<MemberRole>) -> Self {
        self.orgs.expect_member_role().returning(move |_, _| Ok(role));
        self
    }

    fn build(self) -> RepoPermissionServiceImpl {
        RepoPermissionServiceImpl::builder()
            .user_repo(Arc::new(self.users))
            .repository_repo(Arc::new(self.repos))
            .namespace_repo(Arc::new(self.namespaces))
            .organization_repo(Arc::new(self.orgs))
            .build()
    }
}

#[tokio::test]
async fn public_repo_readable_by_anyone() {
    let service = Mocks::new().build();
    assert!(service.allow_read_access_repo(&repo("ns/a", false), "").await.unwrap());
}

#[tokio::test]
async fn private_repo_requires_user() {
    let service = Mocks::new().build();
    let err = service.allow_read_access_repo(&repo("ns/a", true), "").await.unwrap_err();
    assert!(matches!(err, RepoException::UserNotFound { .. }));
}

#[tokio::test]
async fn private_repo_owner_can_write() {
    let service = Mocks::new()
        .with_repo(repo("alice/a", true))
        .with_namespace(namespace("alice", NamespaceType::User))
        .with_users(vec![user(1, "alice", "person"), user(2, "bob", "person")])
        .build();
    assert!(service
        .allow_write_access(RepositoryType::Model, "alice", "a", "alice")
        .await
        .unwrap());
    assert!(!service
        .allow_write_access(RepositoryType::Model, "alice", "a", "bob")
        .await
        .unwrap());
}

#[tokio::test]
async fn write_access_on_missing_repo() {
    let service = Mocks::new().with_repo(repo("alice/a", false)).build();
    let err = service
        .allow_write_access(RepositoryType::Model, "alice", "missing", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, RepoException::RepoNotFound { .. }));
}

#[tokio::test]
async fn admin_passes_everything() {
    let service = Mocks::new()
        .with_repo(repo("alice/a", true))
        .with_namespace(namespace("alice", NamespaceType::User))
        .with_users(vec![user(3, "root", "admin")])
        .build();
    assert!(service
        .allow_admin_access(RepositoryType::Model, "alice", "a", "root")
        .await
        .unwrap());
}

#[tokio::test]
async fn org_roles() {
    let service = Mocks::new()
        .with_repo(repo("org/a", true))
        .with_namespace(namespace("org", NamespaceType::Organization))
        .with_users(vec![user(2, "bob", "person")])
        .with_role(Some(MemberRole::Write))
        .build();
    assert!(service
        .allow_read_access(RepositoryType::Model, "org", "a", "bob")
        .await
        .unwrap());
    assert!(service
        .allow_write_access(RepositoryType::Model, "org", "a", "bob")
        .await
        .unwrap());
    assert!(!service
        .allow_admin_access(RepositoryType::Model, "org", "a", "bob")
        .await
        .unwrap());
}

#[tokio::test]
async fn repo_permission_matrix() {
    let service = Mocks::new()
        .with_namespace(namespace("org", NamespaceType::Organization))
        .with_users(vec![user(2, "bob", "person")])
        .with_role(None)
        .build();

    let anonymous = service.get_user_repo_permission("", &repo("org/a", false)).await.unwrap();
    assert!(anonymous.can_read && !anonymous.can_write);

    let outsider_public = service.get_user_repo_permission("bob", &repo("org/a", false)).await.unwrap();
    assert!(outsider_public.can_read && !outsider_public.can_write && !outsider_public.can_admin);

    let outsider_private = service.get_user_repo_permission("bob", &repo("org/a", true)).await.unwrap();
    assert!(!outsider_private.can_read);
}
