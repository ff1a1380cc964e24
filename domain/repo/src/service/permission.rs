use async_trait::async_trait;

use crate::{
    exception::RepoResult,
    model::{
        entity::Repository,
        vo::{MemberRole, RepoPermission, RepositoryType},
    },
};

/// Decides what a user may do on a repository.
///
/// Public repositories are readable by anyone. Otherwise access follows the
/// repository namespace: a user namespace is only accessible by that user, an
/// organization namespace by members holding a sufficient role. Admins pass every
/// check.
#[async_trait]
pub trait RepoPermissionService: Send + Sync {
    /// Read check on an already loaded repository. An empty username reads
    /// public repositories only, and fails with `UserNotFound` on private ones.
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

    /// Whether the user holds `role` on the namespace.
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
