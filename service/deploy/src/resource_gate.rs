use std::sync::Arc;

use async_trait::async_trait;
use domain_deploy::{
    exception::{DeployException, DeployResult},
    model::entity::SpaceResource,
    service::{AccountingService, Deployer, ResourceGateService},
};
use domain_repo::model::entity::User;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct ResourceGateServiceImpl {
    deployer: Arc<dyn Deployer>,
    /// Without accounting every user may use any available resource.
    #[builder(default, setter(strip_option))]
    accounting_service: Option<Arc<dyn AccountingService>>,
}

#[async_trait]
impl ResourceGateService for ResourceGateServiceImpl {
    async fn check_account_and_resource(
        &self,
        user: &User,
        cluster_id: &str,
        order_detail_id: i64,
        resource: &SpaceResource,
    ) -> DeployResult<()> {
        let hardware = resource.hardware().map_err(|e| {
            DeployException::bad_request(format!("invalid hardware setting, {e}"))
        })?;
        let available = self
            .deployer
            .check_resource_available(cluster_id, order_detail_id, &hardware)
            .await
            .map_err(|e| DeployException::failed("fail to check resource", e))?;
        if !available {
            return Err(DeployException::invalid_state(format!(
                "required resource {} is not enough on cluster {cluster_id}",
                resource.name
            )));
        }

        // Reserved resources are already paid for.
        if order_detail_id != 0 {
            return Ok(());
        }
        let Some(accounting) = &self.accounting_service else {
            return Ok(());
        };
        let affordable = accounting
            .can_afford(&user.uuid, resource)
            .await
            .map_err(|e| DeployException::failed("fail to check user balance", e))?;
        if !affordable {
            return Err(DeployException::forbidden("insufficient balance"));
        }
        Ok(())
    }
}
