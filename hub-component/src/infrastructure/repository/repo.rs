use domain_repo::{
    model::{
        entity::{Namespace, Repository, User},
        vo::{MemberRole, RepositoryType},
    },
    repository::{NamespaceRepo, OrganizationRepo, RepositoryRepo, UserRepo},
};
use hub_architecture::repository::ReadOnlyRepository;
use redis::Cmd;

use crate::infrastructure::database::RedisRepo;

fn user_key(id: i64) -> String {
    format!("user:{id}")
}

fn username_key(username: &str) -> String {
    format!("user:username:{username}")
}

fn repository_key(id: i64) -> String {
    format!("repository:{id}")
}

fn repository_path_key(repo_type: RepositoryType, namespace: &str, name: &str) -> String {
    format!("repository:path:{repo_type}:{namespace}/{name}")
}

fn namespace_key(path: &str) -> String {
    format!("namespace:{path}")
}

/// Hash of username to role.
fn organization_members_key(org_path: &str) -> String {
    format!("organization:{org_path}:members")
}

fn user_organizations_key(user_id: i64) -> String {
    format!("user:{user_id}:organizations")
}

#[async_trait::async_trait]
impl ReadOnlyRepository<User> for RedisRepo {
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        self.connection()?.get_json(&user_key(id))
    }
}

#[async_trait::async_trait]
impl UserRepo for RedisRepo {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        self.connection()?.get_indexed(&username_key(username), user_key)
    }
}

#[async_trait::async_trait]
impl ReadOnlyRepository<Repository> for RedisRepo {
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Repository>> {
        self.connection()?.get_json(&repository_key(id))
    }
}

#[async_trait::async_trait]
impl RepositoryRepo for RedisRepo {
    async fn find_by_path(
        &self,
        repo_type: RepositoryType,
        namespace: &str,
        name: &str,
    ) -> anyhow::Result<Option<Repository>> {
        self.connection()?
            .get_indexed(&repository_path_key(repo_type, namespace, name), repository_key)
    }
}

#[async_trait::async_trait]
impl NamespaceRepo for RedisRepo {
    async fn find_by_path(&self, path: &str) -> anyhow::Result<Option<Namespace>> {
        self.connection()?.get_json(&namespace_key(path))
    }
}

#[async_trait::async_trait]
impl OrganizationRepo for RedisRepo {
    async fn member_role(
        &self,
        org_path: &str,
        username: &str,
    ) -> anyhow::Result<Option<MemberRole>> {
        let role: Option<String> = self
            .connection()?
            .query(&Cmd::hget(organization_members_key(org_path), username))?;
        Ok(match role {
            Some(role) => Some(serde_json::from_value(serde_json::Value::String(role))?),
            None => None,
        })
    }

    async fn org_paths_of_user(&self, user_id: i64) -> anyhow::Result<Vec<String>> {
        let mut paths: Vec<String> =
            self.connection()?.query(&Cmd::smembers(user_organizations_key(user_id)))?;
        paths.sort();
        Ok(paths)
    }
}
