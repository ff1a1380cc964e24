use std::sync::Arc;

use async_trait::async_trait;
use domain_deploy::{
    exception::{DeployException, DeployResult},
    model::{entity::Deploy, vo::DeployActReq},
    repository::DeployTaskRepo,
    service::DeployPermissionService,
};
use domain_repo::{
    model::entity::User,
    repository::{OrganizationRepo, UserRepo},
};
use hub_architecture::repository::ReadOnlyRepository;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct DeployPermissionServiceImpl {
    user_repo: Arc<dyn UserRepo>,
    deploy_task_repo: Arc<dyn DeployTaskRepo>,
    organization_repo: Arc<dyn OrganizationRepo>,
}

impl DeployPermissionServiceImpl {
    async fn find_user(&self, username: &str) -> DeployResult<User> {
        self.user_repo
            .find_by_username(username)
            .await
            .map_err(|e| DeployException::failed("deploy permission check user failed", e))?
            .ok_or_else(|| {
                DeployException::not_found(format!(
                    "deploy permission check user failed, user {username} does not exist"
                ))
            })
    }

    /// Whether both users belong to at least one common organization.
    async fn share_organization(&self, user_id: i64, other_id: i64) -> anyhow::Result<bool> {
        let orgs = self.organization_repo.org_paths_of_user(user_id).await?;
        if orgs.is_empty() {
            return Ok(false);
        }
        let other_orgs = self.organization_repo.org_paths_of_user(other_id).await?;
        Ok(orgs.iter().any(|org| other_orgs.contains(org)))
    }
}

#[async_trait]
impl DeployPermissionService for DeployPermissionServiceImpl {
    async fn check_deploy_permission_for_user(
        &self,
        req: &DeployActReq,
    ) -> DeployResult<(User, Deploy)> {
        let user = self.find_user(&req.current_user).await?;
        let deploy_id = req.deploy_id;
        let deploy = self
            .deploy_task_repo
            .get_by_id(deploy_id)
            .await
            .map_err(|e| DeployException::failed(format!("fail to get user deploy {deploy_id}"), e))?
            .ok_or_else(|| DeployException::not_found(format!("do not found user deploy {deploy_id}")))?;

        if deploy.user_id == user.id || user.can_admin() {
            return Ok((user, deploy));
        }
        if self.share_organization(user.id, deploy.user_id).await? {
            return Ok((user, deploy));
        }
        Err(DeployException::forbidden("deploy was not created by user"))
    }

    async fn check_deploy_permission_for_serverless(
        &self,
        req: &DeployActReq,
    ) -> DeployResult<(User, Deploy)> {
        let user = self.find_user(&req.current_user).await?;
        if !user.can_admin() {
            return Err(DeployException::forbidden(
                "need admin permission for Serverless deploy",
            ));
        }
        let deploy_id = req.deploy_id;
        let deploy = self
            .deploy_task_repo
            .get_by_id(deploy_id)
            .await
            .map_err(|e| {
                DeployException::failed(format!("fail to get serverless deploy {deploy_id}"), e)
            })?
            .ok_or_else(|| {
                DeployException::not_found(format!("do not found serverless deploy {deploy_id}"))
            })?;
        Ok((user, deploy))
    }
}
