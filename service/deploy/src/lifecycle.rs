use std::sync::Arc;

use async_trait::async_trait;
use domain_deploy::{
    exception::{DeployException, DeployResult},
    model::{
        entity::{Deploy, SpaceResource},
        vo::{
            deploy_status_code_to_string, is_running_code, live_status, DeployActReq,
            DeployDetail, DeployRepo, DeployStatus, DeployStatusReport, DeployType,
            DeployUpdateReq, ReplicaInfo, SecureLevel,
        },
    },
    repository::{
        ClusterInfoRepo, DeployTaskRepo, RuntimeFrameworkRepo, SpaceResourceRepo, UserResourceRepo,
    },
    service::{DeployLifecycleService, DeployPermissionService, Deployer, ResourceGateService},
};
use domain_repo::{
    model::{
        entity::{Repository, User},
        vo::RepositoryType,
    },
    repository::{RepositoryRepo, UserRepo},
    service::RepoPermissionService,
};
use hub_architecture::repository::ReadOnlyRepository;
use serde_json::{Map, Value};
use tracing::{info, warn};
use typed_builder::TypedBuilder;

/// Variable holding the model file a llama.cpp engine loads.
const GGUF_ENTRY_POINT: &str = "GGUF_ENTRY_POINT";
const FINETUNE_PROXY_PATH: &str = "/proxy/7860/";

#[derive(TypedBuilder)]
pub struct DeployLifecycleServiceImpl {
    deployer: Arc<dyn Deployer>,
    deploy_task_repo: Arc<dyn DeployTaskRepo>,
    space_resource_repo: Arc<dyn SpaceResourceRepo>,
    cluster_info_repo: Arc<dyn ClusterInfoRepo>,
    user_resource_repo: Arc<dyn UserResourceRepo>,
    runtime_framework_repo: Arc<dyn RuntimeFrameworkRepo>,
    repository_repo: Arc<dyn RepositoryRepo>,
    user_repo: Arc<dyn UserRepo>,
    permission_service: Arc<dyn DeployPermissionService>,
    repo_permission_service: Arc<dyn RepoPermissionService>,
    resource_gate_service: Arc<dyn ResourceGateService>,
    /// Domain services are exposed under, e.g. `app.example.com`.
    #[builder(default)]
    public_root_domain: String,
    /// Used for endpoints when no public root domain is configured.
    #[builder(default)]
    server_base_url: String,
}

impl DeployLifecycleServiceImpl {
    async fn check_permission(&self, req: &DeployActReq) -> DeployResult<(User, Deploy)> {
        match req.deploy_type {
            DeployType::Serverless => {
                self.permission_service.check_deploy_permission_for_serverless(req).await
            }
            _ => self.permission_service.check_deploy_permission_for_user(req).await,
        }
    }

    async fn find_space_resource(&self, resource_id: i64) -> DeployResult<SpaceResource> {
        self.space_resource_repo
            .get_by_id(resource_id)
            .await
            .map_err(|e| DeployException::failed(format!("failed to find resource {resource_id}"), e))?
            .ok_or_else(|| DeployException::not_found(format!("failed to find resource {resource_id}")))
    }

    async fn find_repo(
        &self,
        repo_type: RepositoryType,
        namespace: &str,
        name: &str,
    ) -> DeployResult<Repository> {
        self.repository_repo
            .find_by_path(repo_type, namespace, name)
            .await
            .map_err(|e| DeployException::failed("fail to find repo", e))?
            .ok_or_else(|| {
                DeployException::not_found(format!("repo {repo_type}/{namespace}/{name} does not exist"))
            })
    }

    async fn find_user(&self, username: &str) -> DeployResult<User> {
        self.user_repo
            .find_by_username(username)
            .await
            .map_err(|e| DeployException::failed("fail to find user", e))?
            .ok_or_else(|| DeployException::not_found("user does not exist"))
    }

    async fn find_deploy(&self, deploy_id: i64) -> DeployResult<Deploy> {
        self.deploy_task_repo
            .get_by_id(deploy_id)
            .await
            .map_err(|e| DeployException::failed(format!("fail to get deploy {deploy_id}"), e))?
            .ok_or_else(|| DeployException::not_found(format!("do not found deploy {deploy_id}")))
    }

    async fn exist(&self, dr: &DeployRepo) -> DeployResult<bool> {
        self.deployer
            .exist(dr)
            .await
            .map_err(|e| DeployException::failed("check deploy exists", e))
    }

    /// Fields shared by listings and details.
    fn summary(deploy: &Deploy, repo_type: RepositoryType) -> DeployDetail {
        let prefix = format!("{repo_type}s_");
        let path = deploy.git_path.strip_prefix(&prefix).unwrap_or(&deploy.git_path);
        DeployDetail {
            id: deploy.id,
            deploy_name: deploy.deploy_name.clone(),
            space_id: deploy.space_id,
            model_id: deploy.model_id,
            repo_id: deploy.repo_id,
            user_id: deploy.user_id,
            path: path.to_owned(),
            status: deploy.status.display_name().to_owned(),
            hardware: deploy.hardware.clone(),
            env: deploy.env.clone(),
            runtime_framework: deploy.runtime_framework.clone(),
            image_id: deploy.image_id.clone(),
            secure_level: deploy.secure_level,
            private: deploy.secure_level != SecureLevel::Public,
            svc_name: deploy.svc_name.clone(),
            cluster_id: deploy.cluster_id.clone(),
            git_branch: deploy.git_branch.clone(),
            min_replica: deploy.min_replica,
            max_replica: deploy.max_replica,
            deploy_type: deploy.deploy_type,
            sku: deploy.sku.clone(),
            order_detail_id: deploy.order_detail_id,
            engine_args: deploy.engine_args.clone(),
            variables: deploy.variables.clone(),
            support_function_call: deploy.engine_args.contains("tool-call-parser"),
            message: deploy.message.clone(),
            reason: deploy.reason.clone(),
            created_at: deploy.created_at,
            updated_at: deploy.updated_at,
            ..Default::default()
        }
    }

    fn stopped_report(error: impl ToString) -> DeployStatusReport {
        DeployStatusReport {
            status: DeployStatus::Stopped.display_name().to_owned(),
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

/// Parse a JSON object, an empty string being an empty object.
fn json_map(raw: &str) -> serde_json::Result<Map<String, Value>> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    serde_json::from_str(raw)
}

#[async_trait]
impl DeployLifecycleService for DeployLifecycleServiceImpl {
    async fn deploy_start(&self, req: &DeployActReq) -> DeployResult<()> {
        let (user, deploy) = self.check_permission(req).await?;

        let resource_id: i64 = deploy.sku.parse().map_err(|e| {
            DeployException::bad_request(format!("failed to parse resource id {}, {e}", deploy.sku))
        })?;
        let resource = self.find_space_resource(resource_id).await?;
        self.resource_gate_service
            .check_account_and_resource(&user, &deploy.cluster_id, deploy.order_detail_id, &resource)
            .await?;

        let dr = DeployRepo::of(&deploy, &req.namespace, &req.name, req.repo_type);
        if self.exist(&dr).await? {
            let status = self
                .deployer
                .status(&dr, false)
                .await
                .map_err(|e| DeployException::failed("failed to check deploy status", e))?;
            if is_running_code(status.code) {
                return Err(DeployException::invalid_state("stop deploy first"));
            }
            // Left over from a crashed or stale run.
            self.deployer
                .stop(&dr)
                .await
                .map_err(|e| DeployException::failed("failed to stop existing deploy", e))?;
        }

        self.deployer
            .start_deploy(&deploy)
            .await
            .map_err(|e| DeployException::failed("fail to start deploy", e))?;
        info!(deploy_id = deploy.id, user = %user.username, "deploy started");
        Ok(())
    }

    async fn deploy_stop(&self, req: &DeployActReq) -> DeployResult<()> {
        let (_, deploy) = self
            .check_permission(req)
            .await
            .map_err(|e| DeployException::failed("fail to check permission for stop deploy", e))?;

        let dr = DeployRepo::of(&deploy, &req.namespace, &req.name, req.repo_type);
        if let Err(e) = self.deployer.stop(&dr).await {
            warn!(deploy_id = deploy.id, "fail to stop deploy instance: {e}");
        }
        if self.exist(&dr).await? {
            return Err(DeployException::invalid_state("fail to stop deploy instance"));
        }

        self.deploy_task_repo
            .stop_deploy(req.repo_type, deploy.repo_id, deploy.user_id, deploy.id)
            .await
            .map_err(|e| DeployException::failed("fail to stop deploy instance", e))?;
        info!(deploy_id = deploy.id, "deploy stopped");
        Ok(())
    }

    async fn deploy_update(
        &self,
        req: &DeployActReq,
        update: &DeployUpdateReq,
    ) -> DeployResult<()> {
        let (user, deploy) = self.check_permission(req).await?;
        let mut update = update.clone();

        if let Some(resource_id) = update.resource_id {
            if deploy.order_detail_id != 0 {
                return Err(DeployException::bad_request(
                    "don't support switch reserved resource so far",
                ));
            }
            let resource = self.find_space_resource(resource_id).await.map_err(|e| {
                DeployException::failed(format!("cannot find available resource {resource_id}"), e)
            })?;
            self.resource_gate_service
                .check_account_and_resource(
                    &user,
                    &resource.cluster_id,
                    deploy.order_detail_id,
                    &resource,
                )
                .await?;

            if update.runtime_framework_id.is_none() {
                let frame = self
                    .runtime_framework_repo
                    .find_enabled_by_name(&deploy.runtime_framework)
                    .await
                    .map_err(|e| DeployException::failed("fail to find runtime framework", e))?
                    .ok_or_else(|| {
                        DeployException::not_found(format!(
                            "cannot find available runtime framework {}",
                            deploy.runtime_framework
                        ))
                    })?;
                update.runtime_framework_id = Some(frame.id);
            }
        }

        if let Some(cluster_id) = &update.cluster_id {
            let cluster = self
                .cluster_info_repo
                .get_by_cluster_id(cluster_id)
                .await
                .map_err(|e| DeployException::failed("fail to find cluster", e))?;
            if cluster.is_none() {
                return Err(DeployException::bad_request(format!("invalid cluster {cluster_id}")));
            }
        }

        let dr = DeployRepo::of(&deploy, &req.namespace, &req.name, req.repo_type);
        let exist = self.exist(&dr).await?;
        if update.need_restart_deploy() && exist {
            return Err(DeployException::invalid_state("stop deploy first"));
        }

        if let Some(engine_args) = &update.engine_args {
            json_map(engine_args)
                .map_err(|e| DeployException::bad_request(format!("invalid engine args, {e}")))?;
        }

        self.deployer
            .update_deploy(&update, &deploy)
            .await
            .map_err(|e| DeployException::failed("fail to update deploy", e))?;
        info!(deploy_id = deploy.id, "deploy updated");
        Ok(())
    }

    async fn delete_deploy(&self, req: &DeployActReq) -> DeployResult<()> {
        let mut req = req.clone();
        let serverless = req.deploy_type == DeployType::Serverless;
        if serverless {
            let repo = self.find_repo(req.repo_type, &req.namespace, &req.name).await?;
            let deploy = self
                .deploy_task_repo
                .get_serverless_deploy_by_repo_id(repo.id)
                .await
                .map_err(|e| DeployException::failed("fail to get serverless deploy", e))?
                .ok_or_else(|| DeployException::not_found("no deploy found for serverless type"))?;
            req.deploy_id = deploy.id;
        }

        let (_, deploy) = self.permission_service.check_deploy_permission_for_user(&req).await?;
        let dr = DeployRepo::of(&deploy, &req.namespace, &req.name, req.repo_type);
        if let Err(e) = self.deployer.purge(&dr).await {
            warn!(deploy_id = deploy.id, "fail to purge deploy instance: {e}");
        }
        if self.exist(&dr).await? {
            return Err(DeployException::invalid_state("fail to delete service"));
        }

        let deleted = if serverless {
            self.deploy_task_repo.delete_deploy_now(deploy.id).await
        } else {
            self.deploy_task_repo
                .delete_deploy(req.repo_type, deploy.repo_id, deploy.user_id, deploy.id)
                .await
        };
        deleted.map_err(|e| DeployException::failed("fail to delete deploy", e))?;

        if deploy.order_detail_id != 0 {
            let user_resource = self
                .user_resource_repo
                .find_by_order_detail_id(&deploy.user_uuid, deploy.order_detail_id)
                .await
                .map_err(|e| DeployException::failed("fail to find user resource", e))?;
            match user_resource {
                Some(mut user_resource) => {
                    user_resource.deploy_id = 0;
                    self.user_resource_repo
                        .update(&user_resource)
                        .await
                        .map_err(|e| DeployException::failed("fail to release user resource", e))?;
                }
                None => warn!(
                    order_detail_id = deploy.order_detail_id,
                    "no user resource found for deleted deploy"
                ),
            }
        }
        info!(deploy_id = deploy.id, "deploy deleted");
        Ok(())
    }

    async fn deploy_detail(&self, req: &DeployActReq) -> DeployResult<DeployDetail> {
        let (_, mut deploy) = self.check_permission(req).await?;
        let dr = DeployRepo::of(&deploy, &req.namespace, &req.name, req.repo_type);

        let replica = self.deployer.get_replica(&dr).await.unwrap_or_else(|e| {
            warn!(deploy_id = deploy.id, "fail to get deploy replica: {e}");
            ReplicaInfo::default()
        });
        let mut instances = replica.instances;
        match self.deployer.status(&dr, true).await {
            Ok(status) => {
                if let Some(live) = live_status(status.code) {
                    deploy.status = live;
                }
                if instances.is_empty() {
                    instances = status.instances;
                }
            }
            Err(e) => warn!(deploy_id = deploy.id, "fail to get deploy status: {e}"),
        }

        let variables = json_map(&deploy.variables)
            .map_err(|e| DeployException::failed("failed to convert variables to map", e))?;
        let entrypoint = match variables.get(GGUF_ENTRY_POINT) {
            Some(Value::String(entrypoint)) => entrypoint.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };

        let (endpoint, provider) = self.generate_endpoint(&deploy).await;
        let proxy_endpoint = match deploy.deploy_type {
            DeployType::Finetune if !endpoint.is_empty() => format!("{endpoint}{FINETUNE_PROXY_PATH}"),
            _ => String::new(),
        };

        Ok(DeployDetail {
            endpoint,
            proxy_endpoint,
            provider,
            actual_replica: replica.actual,
            desired_replica: replica.desired,
            instances,
            entrypoint,
            ..Self::summary(&deploy, req.repo_type)
        })
    }

    async fn deploy_status(
        &self,
        repo_type: RepositoryType,
        namespace: &str,
        name: &str,
        deploy_id: i64,
    ) -> DeployStatusReport {
        let deploy = match self.find_deploy(deploy_id).await {
            Ok(deploy) => deploy,
            Err(e) => return Self::stopped_report(e),
        };
        let dr = DeployRepo::of(&deploy, namespace, name, repo_type);
        match self.deployer.status(&dr, true).await {
            Ok(status) => {
                let code = live_status(status.code).map_or(status.code, DeployStatus::code);
                DeployStatusReport {
                    status: deploy_status_code_to_string(code).to_owned(),
                    details: status.instances,
                    message: deploy.message,
                    reason: deploy.reason,
                    error: None,
                }
            }
            Err(e) => {
                warn!(deploy_id, "fail to get deploy status: {e}");
                Self::stopped_report(e)
            }
        }
    }

    async fn deploy_instance_logs(
        &self,
        req: &DeployActReq,
    ) -> DeployResult<flume::Receiver<String>> {
        let (_, deploy) = self.check_permission(req).await?;
        let dr = DeployRepo::of(&deploy, &req.namespace, &req.name, req.repo_type)
            .with_instance(&req.instance_name);
        self.deployer
            .instance_logs(&dr)
            .await
            .map_err(|e| DeployException::failed("fail to get deploy instance logs", e))
    }

    async fn list_deploy(
        &self,
        repo_type: RepositoryType,
        namespace: &str,
        name: &str,
        current_user: &str,
    ) -> DeployResult<Vec<DeployDetail>> {
        let user = self.find_user(current_user).await?;
        let repo = self
            .repository_repo
            .find_by_path(repo_type, namespace, name)
            .await
            .map_err(|e| DeployException::failed("invalid repository for query parameters", e))?
            .ok_or_else(|| DeployException::not_found("nothing found for deploys"))?;
        let deploys = self
            .deploy_task_repo
            .list_deploy(repo_type, repo.id, user.id)
            .await
            .map_err(|e| DeployException::failed("fail to list user deploys", e))?;
        Ok(deploys.iter().map(|deploy| Self::summary(deploy, repo_type)).collect())
    }

    async fn allow_access_deploy(&self, req: &DeployActReq) -> DeployResult<bool> {
        let repo = self.find_repo(req.repo_type, &req.namespace, &req.name).await?;
        let deploy = match req.deploy_type {
            DeployType::Serverless => {
                let user = self.find_user(&req.current_user).await?;
                if !user.can_admin() {
                    return Err(DeployException::forbidden(
                        "need admin permission to see Serverless deploy instances",
                    ));
                }
                self.find_deploy(req.deploy_id).await?
            }
            _ => self.permission_service.check_deploy_permission_for_user(req).await?.1,
        };
        if deploy.repo_id != repo.id {
            return Err(DeployException::bad_request("invalid deploy found"));
        }
        Ok(true)
    }

    async fn allow_read_access_by_deploy_id(
        &self,
        repo_type: RepositoryType,
        namespace: &str,
        name: &str,
        current_user: &str,
        deploy_id: i64,
    ) -> DeployResult<bool> {
        let user = self.find_user(current_user).await?;
        let repo = self.find_repo(repo_type, namespace, name).await?;
        let deploy = self.find_deploy(deploy_id).await?;
        if deploy.user_id != user.id {
            return Err(DeployException::forbidden("deploy was not created by user"));
        }
        if deploy.repo_id != repo.id {
            return Err(DeployException::bad_request("invalid deploy found"));
        }
        Ok(self.repo_permission_service.allow_read_access_repo(&repo, current_user).await?)
    }

    async fn get_deploy_by_svc_name(&self, svc_name: &str) -> DeployResult<Deploy> {
        self.deploy_task_repo
            .get_deploy_by_svc_name(svc_name)
            .await
            .map_err(|e| DeployException::failed(format!("failed to get deploy by svc name:{svc_name}"), e))?
            .ok_or_else(|| DeployException::not_found(format!("do not found deploy by svc name:{svc_name}")))
    }

    async fn generate_endpoint(&self, deploy: &Deploy) -> (String, String) {
        let (zone, provider) = match self.cluster_info_repo.get_by_cluster_id(&deploy.cluster_id).await {
            Ok(Some(cluster)) => (cluster.zone, cluster.provider),
            Ok(None) => {
                warn!(cluster_id = %deploy.cluster_id, "cluster of deploy not found");
                Default::default()
            }
            Err(e) => {
                warn!(cluster_id = %deploy.cluster_id, "fail to get cluster: {e}");
                Default::default()
            }
        };

        if deploy.svc_name.is_empty() || deploy.status != DeployStatus::Running {
            return (String::new(), provider);
        }
        let endpoint = if self.public_root_domain.is_empty() {
            let base = self
                .server_base_url
                .trim_start_matches("http://")
                .trim_start_matches("https://")
                .trim_end_matches('/');
            format!("{base}/endpoint/{}", deploy.svc_name)
        } else {
            let region_domain = match (zone.is_empty(), provider.is_empty()) {
                (false, false) => format!(".{zone}.{provider}"),
                _ => String::new(),
            };
            format!("{}{region_domain}.{}", deploy.svc_name, self.public_root_domain)
        };
        (endpoint, provider)
    }
}
