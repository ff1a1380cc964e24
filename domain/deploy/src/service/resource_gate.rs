use async_trait::async_trait;
use domain_repo::model::entity::User;

use crate::{exception::DeployResult, model::entity::SpaceResource};

#[async_trait]
pub trait ResourceGateService: Send + Sync {
    /// Checks the cluster can host the resource and, for pay-as-you-go
    /// deploys, that the user can afford it.
    async fn check_account_and_resource(
        &self,
        user: &User,
        cluster_id: &str,
        order_detail_id: i64,
        resource: &SpaceResource,
    ) -> DeployResult<()>;
}
