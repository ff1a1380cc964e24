use async_trait::async_trait;
use domain_repo::model::{entity::User, vo::RepositoryType};
use hub_architecture::{
    message_queue::MessageQueueProducerTemplate,
    repository::{DBRepository, MutableRepository, ReadOnlyRepository},
};
use mockall::mock;

use crate::{
    exception::DeployResult,
    model::{
        entity::{
            ClusterInfo, Deploy, DeployTask, DeployTaskType, RuntimeFramework, SpaceResource,
            UserResource,
        },
        vo::{
            DeployActReq, DeployNotification, DeployRepo, DeployUpdateReq, HardWare, ReplicaInfo,
            ServiceStatus,
        },
    },
    repository::{
        ClusterInfoRepo, DeployTaskRepo, RuntimeFrameworkRepo, SpaceResourceRepo, UserResourceRepo,
    },
    service::{AccountingService, DeployPermissionService, Deployer, ResourceGateService},
};

mock! {
    pub DeployTaskRepo {}
    #[async_trait]
    impl DeployTaskRepo for DeployTaskRepo {
        async fn get_deploy_by_svc_name(&self, svc_name: &str) -> anyhow::Result<Option<Deploy>>;
        async fn get_serverless_deploy_by_repo_id(&self, repo_id: i64)
            -> anyhow::Result<Option<Deploy>>;
        async fn list_deploy(
            &self,
            repo_type: RepositoryType,
            repo_id: i64,
            user_id: i64,
        ) -> anyhow::Result<Vec<Deploy>>;
        async fn stop_deploy(
            &self,
            repo_type: RepositoryType,
            repo_id: i64,
            user_id: i64,
            deploy_id: i64,
        ) -> anyhow::Result<()>;
        async fn delete_deploy(
            &self,
            repo_type: RepositoryType,
            repo_id: i64,
            user_id: i64,
            deploy_id: i64,
        ) -> anyhow::Result<()>;
        async fn delete_deploy_now(&self, deploy_id: i64) -> anyhow::Result<()>;
        async fn get_deploy_task(&self, task_id: i64) -> anyhow::Result<Option<DeployTask>>;
        async fn get_last_task_by_type(
            &self,
            deploy_id: i64,
            task_type: DeployTaskType,
        ) -> anyhow::Result<Option<DeployTask>>;
        async fn create_deploy_task(&self, task: &DeployTask) -> anyhow::Result<i64>;
        async fn update_deploy_task(&self, task: &DeployTask) -> anyhow::Result<()>;
    }
    impl DBRepository<Deploy> for DeployTaskRepo {}
    #[async_trait]
    impl ReadOnlyRepository<Deploy> for DeployTaskRepo {
        async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Deploy>>;
    }
    #[async_trait]
    impl MutableRepository<Deploy> for DeployTaskRepo {
        async fn insert(&self, entity: &Deploy) -> anyhow::Result<i64>;
        async fn update(&self, entity: &Deploy) -> anyhow::Result<()>;
        async fn delete_by_id(&self, id: i64) -> anyhow::Result<()>;
    }
}

mock! {
    pub SpaceResourceRepo {}
    impl SpaceResourceRepo for SpaceResourceRepo {}
    #[async_trait]
    impl ReadOnlyRepository<SpaceResource> for SpaceResourceRepo {
        async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<SpaceResource>>;
    }
}

mock! {
    pub ClusterInfoRepo {}
    #[async_trait]
    impl ClusterInfoRepo for ClusterInfoRepo {
        async fn get_by_cluster_id(&self, cluster_id: &str) -> anyhow::Result<Option<ClusterInfo>>;
        async fn upsert(&self, cluster: &ClusterInfo) -> anyhow::Result<()>;
        async fn list(&self) -> anyhow::Result<Vec<ClusterInfo>>;
    }
}

mock! {
    pub UserResourceRepo {}
    #[async_trait]
    impl UserResourceRepo for UserResourceRepo {
        async fn find_by_order_detail_id(
            &self,
            user_uid: &str,
            order_detail_id: i64,
        ) -> anyhow::Result<Option<UserResource>>;
        async fn update(&self, resource: &UserResource) -> anyhow::Result<()>;
    }
}

mock! {
    pub RuntimeFrameworkRepo {}
    #[async_trait]
    impl RuntimeFrameworkRepo for RuntimeFrameworkRepo {
        async fn find_enabled_by_name(&self, name: &str) -> anyhow::Result<Option<RuntimeFramework>>;
    }
    #[async_trait]
    impl ReadOnlyRepository<RuntimeFramework> for RuntimeFrameworkRepo {
        async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<RuntimeFramework>>;
    }
}

mock! {
    pub Deployer {}
    #[async_trait]
    impl Deployer for Deployer {
        async fn deploy(&self, dr: DeployRepo) -> anyhow::Result<i64>;
        async fn start_deploy(&self, deploy: &Deploy) -> anyhow::Result<()>;
        async fn stop(&self, dr: &DeployRepo) -> anyhow::Result<()>;
        async fn purge(&self, dr: &DeployRepo) -> anyhow::Result<()>;
        async fn exist(&self, dr: &DeployRepo) -> anyhow::Result<bool>;
        async fn status(&self, dr: &DeployRepo, need_details: bool) -> anyhow::Result<ServiceStatus>;
        async fn update_deploy(&self, req: &DeployUpdateReq, deploy: &Deploy) -> anyhow::Result<()>;
        async fn get_replica(&self, dr: &DeployRepo) -> anyhow::Result<ReplicaInfo>;
        async fn instance_logs(&self, dr: &DeployRepo) -> anyhow::Result<flume::Receiver<String>>;
        async fn check_resource_available(
            &self,
            cluster_id: &str,
            order_detail_id: i64,
            hardware: &HardWare,
        ) -> anyhow::Result<bool>;
    }
}

mock! {
    pub AccountingService {}
    #[async_trait]
    impl AccountingService for AccountingService {
        async fn can_afford(&self, user_uuid: &str, resource: &SpaceResource) -> anyhow::Result<bool>;
    }
}

mock! {
    pub DeployPermissionService {}
    #[async_trait]
    impl DeployPermissionService for DeployPermissionService {
        async fn check_deploy_permission_for_user(
            &self,
            req: &DeployActReq,
        ) -> DeployResult<(User, Deploy)>;
        async fn check_deploy_permission_for_serverless(
            &self,
            req: &DeployActReq,
        ) -> DeployResult<(User, Deploy)>;
    }
}

mock! {
    pub ResourceGateService {}
    #[async_trait]
    impl ResourceGateService for ResourceGateService {
        async fn check_account_and_resource(
            &self,
            user: &User,
            cluster_id: &str,
            order_detail_id: i64,
            resource: &SpaceResource,
        ) -> DeployResult<()>;
    }
}

mock! {
    pub NotificationProducer {}
    #[async_trait]
    impl MessageQueueProducerTemplate<DeployNotification> for NotificationProducer {
        async fn send_object(&self, content: &DeployNotification, topic: &str) -> anyhow::Result<()>;
    }
}
