use std::sync::Arc;

use async_trait::async_trait;
use domain_repo::{
    exception::{RepoException, RepoResult},
    model::{
        entity::{NamespaceType, Repository, User},
        vo::{MemberRole, RepoPermission, RepositoryType},
    },
    repository::{NamespaceRepo, OrganizationRepo, RepositoryRepo, UserRepo},
    service::RepoPermissionService,
};
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct RepoPermissionServiceImpl {
    user_repo: Arc<dyn UserRepo>,
    repository_repo: Arc<dyn RepositoryRepo>,
    namespace_repo: Arc<dyn NamespaceRepo>,
    organization_repo: Arc<dyn OrganizationRepo>,
}

impl RepoPermissionServiceImpl {
    async fn find_repo(
        &self,
        repo_type: RepositoryType,
        namespace: &str,
        name: &str,
    ) -> RepoResult<Repository> {
        self.repository_repo
            .find_by_path(repo_type, namespace, name)
            .await?
            .ok_or_else(|| RepoException::RepoNotFound {
                path: format!("{namespace}/{name}"),
            })
    }

    async fn find_user(&self, username: &str) -> RepoResult<User> {
        self.user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| RepoException::UserNotFound {
                username: username.to_owned(),
            })
    }

    async fn check_role(
        &self,
        repo_type: RepositoryType,
        namespace: &str,
        name: &str,
        username: &str,
        role: MemberRole,
    ) -> RepoResult<bool> {
        // Existence of the repository is checked before the user.
        self.find_repo(repo_type, namespace, name).await?;
        if username.is_empty() {
            return Err(RepoException::UserNotFound {
                username: String::new(),
            });
        }
        self.check_current_user_permission(username, namespace, role).await
    }
}

#[async_trait]
impl RepoPermissionService for RepoPermissionServiceImpl {
    async fn allow_read_access_repo(&self, repo: &Repository, username: &str) -> RepoResult<bool> {
        if !repo.private {
            return Ok(true);
        }
        if username.is_empty() {
            return Err(RepoException::UserNotFound {
                username: String::new(),
            });
        }
        let (namespace, _) = repo.namespace_and_name();
        self.check_current_user_permission(username, namespace, MemberRole::Read).await
    }

    async fn allow_read_access(
        &self,
        repo_type: RepositoryType,
        namespace: &str,
        name: &str,
        username: &str,
    ) -> RepoResult<bool> {
        let repo = self.find_repo(repo_type, namespace, name).await?;
        self.allow_read_access_repo(&repo, username).await
    }

    async fn allow_write_access(
        &self,
        repo_type: RepositoryType,
        namespace: &str,
        name: &str,
        username: &str,
    ) -> RepoResult<bool> {
        self.check_role(repo_type, namespace, name, username, MemberRole::Write).await
    }

    async fn allow_admin_access(
        &self,
        repo_type: RepositoryType,
        namespace: &str,
        name: &str,
        username: &str,
    ) -> RepoResult<bool> {
        self.check_role(repo_type, namespace, name, username, MemberRole::Admin).await
    }

    async fn check_current_user_permission(
        &self,
        username: &str,
        namespace: &str,
        role: MemberRole,
    ) -> RepoResult<bool> {
        let ns = self.namespace_repo.find_by_path(namespace).await?.ok_or_else(|| {
            RepoException::NamespaceNotFound {
                path: namespace.to_owned(),
            }
        })?;
        let user = self.find_user(username).await?;
        if user.can_admin() {
            return Ok(true);
        }
        match ns.namespace_type {
            NamespaceType::User => Ok(user.username == namespace),
            NamespaceType::Organization => {
                let member_role = self.organization_repo.member_role(&ns.path, username).await?;
                Ok(member_role.is_some_and(|r| r.grants(role)))
            }
        }
    }

    async fn get_user_repo_permission(
        &self,
        username: &str,
        repo: &Repository,
    ) -> RepoResult<RepoPermission> {
        if username.is_empty() {
            return Ok(RepoPermission::read_only(!repo.private));
        }
        let (namespace, _) = repo.namespace_and_name();
        let ns = self.namespace_repo.find_by_path(namespace).await?.ok_or_else(|| {
            RepoException::NamespaceNotFound {
                path: namespace.to_owned(),
            }
        })?;
        let user = self.find_user(username).await?;
        if user.can_admin() {
            return Ok(RepoPermission::all());
        }
        match ns.namespace_type {
            NamespaceType::User if user.username == namespace => Ok(RepoPermission::all()),
            NamespaceType::User => Ok(RepoPermission::read_only(!repo.private)),
            NamespaceType::Organization => {
                let role = self.organization_repo.member_role(&ns.path, username).await?;
                let grants = |required| role.is_some_and(|r: MemberRole| r.grants(required));
                Ok(RepoPermission {
                    can_read: grants(MemberRole::Read) || !repo.private,
                    can_write: grants(MemberRole::Write),
                    can_admin: grants(MemberRole::Admin),
                })
            }
        }
    }
}
