use async_trait::async_trait;
use domain_repo::model::entity::User;

use crate::{
    exception::DeployResult,
    model::{entity::Deploy, vo::DeployActReq},
};

/// Gate deciding who may act on a deploy.
#[async_trait]
pub trait DeployPermissionService: Send + Sync {
    /// Owners, admins and users sharing an organization with the owner pass.
    async fn check_deploy_permission_for_user(
        &self,
        req: &DeployActReq,
    ) -> DeployResult<(User, Deploy)>;

    /// Serverless deploys are managed by admins only.
    async fn check_deploy_permission_for_serverless(
        &self,
        req: &DeployActReq,
    ) -> DeployResult<(User, Deploy)>;
}
