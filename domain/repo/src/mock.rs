use async_trait::async_trait;
use hub_architecture::repository::ReadOnlyRepository;
use mockall::mock;

use crate::{
    exception::RepoResult,
    model::{
        entity::{Namespace, Repository, User},
        vo::{MemberRole, RepoPermission, RepositoryType},
    },
    repository::{NamespaceRepo, OrganizationRepo, RepositoryRepo, UserRepo},
    service::RepoPermissionService,
};

mock! {
    pub UserRepo {}
    #[async_trait]
    impl UserRepo for UserRepo {
        async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    }
    #[async_trait]
    impl ReadOnlyRepository<User> for UserRepo {
        async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    }
}

mock! {
    pub RepositoryRepo {}
    #[async_trait]
    impl RepositoryRepo for RepositoryRepo {
        async fn find_by_path(
            &self,
            repo_type: RepositoryType,
            namespace: &str,
            name: &str,
        ) -> anyhow::Result<Option<Repository>>;
    }
    #[async_trait]
    impl ReadOnlyRepository<Repository> for RepositoryRepo {
        async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Repository>>;
    }
}

mock! {
    pub NamespaceRepo {}
    #[async_trait]
    impl NamespaceRepo for NamespaceRepo {
        async fn find_by_path(&self, path: &str) -> anyhow::Result<Option<Namespace>>;
    }
}

mock! {
    pub OrganizationRepo {}
    #[async_trait]
    impl OrganizationRepo for OrganizationRepo {
        async fn member_role(&self, org_path: &str, username: &str)
            -> anyhow::Result<Option<MemberRole>>;
        async fn org_paths_of_user(&self, user_id: i64) -> anyhow::Result<Vec<String>>;
    }
}

mock! {
    pub RepoPermissionService {}
    #[async_trait]
    impl RepoPermissionService for RepoPermissionService {
        async fn allow_read_access_repo(&self, repo: &Repository, username: &str) -> RepoResult<bool>;
        async fn allow_read_access(
            &self,
            repo_type: RepositoryType,
            namespace: &str,
            name: &str,
            username: &str,
        ) -> RepoResult<bool>;
        async fn allow_write_access(
            &self,
            repo_type: RepositoryType,
            namespace: &str,
            name: &str,
            username: &str,
        ) -> RepoResult<bool>;
        async fn allow_admin_access(
            &self,
            repo_type: RepositoryType,
            namespace: &str,
            name: &str,
            username: &str,
        ) -> RepoResult<bool>;
        async fn check_current_user_permission(
            &self,
            username: &str,
            namespace: &str,
            role: MemberRole,
        ) -> RepoResult<bool>;
        async fn get_user_repo_permission(
            &self,
            username: &str,
            repo: &Repository,
        ) -> RepoResult<RepoPermission>;
    }
}
