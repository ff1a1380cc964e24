use std::{sync::Arc, time::Duration};

use domain_deploy::{model::vo::DeployNotification, service::{DeployLifecycleService, Deployer}};
use domain_lfs::service::LfsService;
use domain_webhook::service::{ExecutorRegistry, WebHookService};
use hub_architecture::{
    background_service::BackgroundService,
    message_queue::{MessageQueueConsumer, MessageQueueProducer, MessageQueueProducerTemplate},
};
use service_deploy::{DeployLifecycleServiceImpl, DeployPermissionServiceImpl, ResourceGateServiceImpl};
use service_lfs::LfsServiceImpl;
use service_repo::RepoPermissionServiceImpl;
use service_webhook::{
    ClusterExecutor, EventDispatcher, HeartbeatExecutor, ImageBuilderExecutor, KServiceExecutor,
    WebHookServiceImpl, WorkflowExecutor,
};
use tracing::info;

use super::{
    config::{HubConfig, MessageQueueKind},
    database::{RedisClient, RedisRepo},
    message_queue::{InternalMessageQueue, RedisMessageQueue},
    service::{RemoteRunnerDeployer, S3ObjectStorage, WebHookDispatcher},
};

struct MessageQueue {
    producer: Arc<dyn MessageQueueProducer>,
    consumer: Arc<dyn MessageQueueConsumer>,
    notification_producer: Arc<dyn MessageQueueProducerTemplate<DeployNotification>>,
}

impl MessageQueue {
    async fn build(config: &HubConfig) -> anyhow::Result<Self> {
        Ok(match config.message_queue.kind {
            MessageQueueKind::Internal => {
                let queue = Arc::new(InternalMessageQueue::new());
                Self {
                    producer: queue.clone(),
                    consumer: queue.clone(),
                    notification_producer: queue,
                }
            }
            MessageQueueKind::Redis => {
                let url = config
                    .redis
                    .urls
                    .first()
                    .ok_or_else(|| anyhow::anyhow!("redis message queue needs a redis url"))?;
                let queue = Arc::new(RedisMessageQueue::new(url).await?);
                Self {
                    producer: queue.clone(),
                    consumer: queue.clone(),
                    notification_producer: queue,
                }
            }
        })
    }
}

/// Services of the component wired onto their collaborators.
pub struct ServiceProvider {
    pub config: HubConfig,
    pub deployer: Arc<dyn Deployer>,
    pub deploy_lifecycle_service: Arc<dyn DeployLifecycleService>,
    pub web_hook_service: Arc<dyn WebHookService>,
    pub lfs_service: Arc<dyn LfsService>,
    pub background_services: Vec<Arc<dyn BackgroundService>>,
}

impl ServiceProvider {
    pub async fn build(config: config::Config) -> anyhow::Result<Self> {
        let config: HubConfig = config.try_deserialize()?;

        let repo = Arc::new(
            RedisRepo::builder()
                .client(Arc::new(RedisClient::open(&config.redis.urls)?))
                .build(),
        );
        let message_queue = MessageQueue::build(&config).await?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.runner.timeout_secs))
            .build()?;
        let deployer: Arc<dyn Deployer> = Arc::new(
            RemoteRunnerDeployer::builder()
                .http(http)
                .endpoint(config.runner.endpoint.as_str())
                .api_key(config.runner.api_key.as_str())
                .timeout(Duration::from_secs(config.runner.timeout_secs))
                .deploy_task_repo(repo.clone())
                .cluster_info_repo(repo.clone())
                .space_resource_repo(repo.clone())
                .runtime_framework_repo(repo.clone())
                .user_resource_repo(repo.clone())
                .build(),
        );

        let repo_permission_service = Arc::new(
            RepoPermissionServiceImpl::builder()
                .user_repo(repo.clone())
                .repository_repo(repo.clone())
                .namespace_repo(repo.clone())
                .organization_repo(repo.clone())
                .build(),
        );
        let deploy_permission_service = Arc::new(
            DeployPermissionServiceImpl::builder()
                .user_repo(repo.clone())
                .deploy_task_repo(repo.clone())
                .organization_repo(repo.clone())
                .build(),
        );
        let resource_gate_service =
            Arc::new(ResourceGateServiceImpl::builder().deployer(deployer.clone()).build());
        let deploy_lifecycle_service = Arc::new(
            DeployLifecycleServiceImpl::builder()
                .deployer(deployer.clone())
                .deploy_task_repo(repo.clone())
                .space_resource_repo(repo.clone())
                .cluster_info_repo(repo.clone())
                .user_resource_repo(repo.clone())
                .runtime_framework_repo(repo.clone())
                .repository_repo(repo.clone())
                .user_repo(repo.clone())
                .permission_service(deploy_permission_service)
                .repo_permission_service(repo_permission_service.clone())
                .resource_gate_service(resource_gate_service)
                .public_root_domain(config.deploy.public_root_domain.clone())
                .server_base_url(config.deploy.server_base_url.clone())
                .build(),
        );

        let registry = ExecutorRegistry::builder()
            .register(
                &KServiceExecutor::EVENT_TYPES,
                Arc::new(
                    KServiceExecutor::builder()
                        .deploy_task_repo(repo.clone())
                        .notification_producer(message_queue.notification_producer.clone())
                        .notification_topic(config.message_queue.notification_topic.clone())
                        .build(),
                ),
            )
            .register(
                &ImageBuilderExecutor::EVENT_TYPES,
                Arc::new(ImageBuilderExecutor::builder().deploy_task_repo(repo.clone()).build()),
            )
            .register(
                &ClusterExecutor::EVENT_TYPES,
                Arc::new(ClusterExecutor::builder().cluster_info_repo(repo.clone()).build()),
            )
            .register(
                &HeartbeatExecutor::EVENT_TYPES,
                Arc::new(HeartbeatExecutor::builder().cluster_info_repo(repo.clone()).build()),
            )
            .register(
                &WorkflowExecutor::EVENT_TYPES,
                Arc::new(WorkflowExecutor::builder().argo_workflow_repo(repo.clone()).build()),
            )
            .build();
        info!(executors = registry.len(), "webhook executors registered");
        let dispatcher = Arc::new(
            EventDispatcher::builder()
                .registry(registry)
                .retry_count(config.webhook.retry_count)
                .retry_delay(Duration::from_secs(config.webhook.retry_delay_secs))
                .executor_timeout(Duration::from_secs(config.webhook.executor_timeout_secs))
                .build(),
        );
        let web_hook_service: Arc<dyn WebHookService> = Arc::new(
            WebHookServiceImpl::builder()
                .producer(message_queue.producer)
                .consumer(message_queue.consumer)
                .dispatcher(dispatcher)
                .topic(config.message_queue.webhook_topic.clone())
                .group(config.message_queue.group.clone())
                .build(),
        );

        let lfs_service = Arc::new(
            LfsServiceImpl::builder()
                .repository_repo(repo.clone())
                .user_repo(repo.clone())
                .repo_permission_service(repo_permission_service)
                .lfs_meta_object_repo(repo.clone())
                .lfs_lock_repo(repo)
                .object_storage(Arc::new(S3ObjectStorage::new(&config.s3)?))
                .public_domain(config.lfs.public_domain.clone())
                .presign_expiry(Duration::from_secs(config.lfs.presign_expiry_secs))
                .max_single_upload_size(config.lfs.max_single_upload_size)
                .presign_upload(config.lfs.presign_upload)
                .build(),
        );

        let background_services: Vec<Arc<dyn BackgroundService>> =
            vec![Arc::new(WebHookDispatcher::new(web_hook_service.clone()))];

        Ok(Self {
            config,
            deployer,
            deploy_lifecycle_service,
            web_hook_service,
            lfs_service,
            background_services,
        })
    }
}
