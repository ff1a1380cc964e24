use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use domain_deploy::{
    model::{
        entity::{
            ClusterInfo, ClusterRes, ClusterStatus, Deploy, DeployTask, DeployTaskType,
            NodeResourceInfo, RuntimeFramework, SpaceResource,
        },
        vo::{
            DeployRepo, DeployStatus, DeployUpdateReq, HardWare, Instance, ReplicaInfo,
            ServiceStatus,
        },
    },
    repository::{
        ClusterInfoRepo, DeployTaskRepo, RuntimeFrameworkRepo, SpaceResourceRepo,
        UserResourceRepo,
    },
    service::Deployer,
};
use hub_architecture::repository::{MutableRepository, ReadOnlyRepository};
use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use typed_builder::TypedBuilder;

const GGUF_ENTRY_POINT: &str = "GGUF_ENTRY_POINT";
/// Runner code of a service it doesn't know or couldn't check.
const UNKNOWN_CODE: i32 = -1;

#[derive(Serialize, Debug, Default)]
struct RunRequest {
    id: i64,
    user_name: String,
    org_name: String,
    repo_name: String,
    repo_type: String,
    git_path: String,
    git_ref: String,
    min_replica: i32,
    max_replica: i32,
    hardware: HardWare,
    env: HashMap<String, String>,
    annotation: HashMap<String, String>,
    runtime_framework: String,
    image_id: String,
    deploy_id: i64,
    cluster_id: String,
    svc_name: String,
    deploy_type: i32,
    user_id: String,
    sku: String,
    order_detail_id: i64,
    task_id: i64,
}

/// Addresses a service for stop, check, status and purge calls.
#[derive(Serialize, Debug, Default)]
struct ServiceRequest {
    id: i64,
    org_name: String,
    repo_name: String,
    cluster_id: String,
    svc_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    deploy_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    need_details: bool,
}

#[derive(Serialize, Debug, Default)]
struct LogsRequest {
    id: i64,
    org_name: String,
    repo_name: String,
    cluster_id: String,
    svc_name: String,
    instance_name: String,
}

#[derive(Deserialize, Debug, Default)]
struct StatusResponse {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
    #[serde(default)]
    instance: Vec<Instance>,
}

#[derive(Deserialize, Debug, Default)]
struct ReplicaResponse {
    #[serde(default)]
    actual_replica: i32,
    #[serde(default)]
    desired_replica: i32,
    #[serde(default)]
    instance: Vec<Instance>,
}

/// Client of the cluster runners, which run deploys as services.
#[derive(TypedBuilder)]
pub struct RemoteRunnerDeployer {
    http: reqwest::Client,
    /// Runner used when a cluster reports no endpoint of its own.
    #[builder(setter(into))]
    endpoint: String,
    #[builder(default, setter(into))]
    api_key: String,
    #[builder(default = Duration::from_secs(30))]
    timeout: Duration,
    deploy_task_repo: Arc<dyn DeployTaskRepo>,
    cluster_info_repo: Arc<dyn ClusterInfoRepo>,
    space_resource_repo: Arc<dyn SpaceResourceRepo>,
    runtime_framework_repo: Arc<dyn RuntimeFrameworkRepo>,
    user_resource_repo: Arc<dyn UserResourceRepo>,
}

impl RemoteRunnerDeployer {
    async fn runner_host(&self, cluster_id: &str) -> anyhow::Result<String> {
        if cluster_id.is_empty() {
            return Ok(self.endpoint.trim_end_matches('/').to_owned());
        }
        let cluster = self.cluster_info_repo.get_by_cluster_id(cluster_id).await?;
        Ok(pick_host(&self.endpoint, cluster.as_ref()))
    }

    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> anyhow::Result<Response> {
        self.send(self.http.request(method, url).timeout(self.timeout), body).await
    }

    /// Request without a total timeout, for streamed responses.
    async fn stream<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> anyhow::Result<Response> {
        self.send(self.http.get(url), body).await
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        request: RequestBuilder,
        body: &B,
    ) -> anyhow::Result<Response> {
        let response = request.bearer_auth(&self.api_key).json(body).send().await?;
        let status = response.status();
        tracing::debug!(url = %response.url(), %status, "runner answered");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("unexpected http status: {status}, error: {body}");
        }
        Ok(response)
    }

    async fn call<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> anyhow::Result<R> {
        Ok(self.request(method, url, body).await?.json().await?)
    }

    async fn service_url(&self, cluster_id: &str, svc_name: &str, action: &str) -> anyhow::Result<String> {
        let host = self.runner_host(cluster_id).await?;
        Ok(format!("{host}/api/v1/service/{svc_name}/{action}"))
    }

    async fn check(&self, dr: &DeployRepo) -> anyhow::Result<StatusResponse> {
        let url = self.service_url(&dr.cluster_id, &dr.svc_name, "get").await?;
        self.call(Method::GET, &url, &service_request(dr)).await
    }

    async fn find_deploy(&self, deploy_id: i64) -> anyhow::Result<Deploy> {
        self.deploy_task_repo
            .get_by_id(deploy_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("deploy {deploy_id} does not exist"))
    }

    /// Bind or release the reserved resource of an order.
    async fn attach_user_resource(
        &self,
        user_uuid: &str,
        order_detail_id: i64,
        deploy_id: i64,
    ) -> anyhow::Result<()> {
        if order_detail_id == 0 {
            return Ok(());
        }
        let Some(mut resource) = self
            .user_resource_repo
            .find_by_order_detail_id(user_uuid, order_detail_id)
            .await?
        else {
            anyhow::bail!("reserved resource of order {order_detail_id} does not exist");
        };
        resource.deploy_id = deploy_id;
        self.user_resource_repo.update(&resource).await
    }

    async fn cluster_resources(&self, cluster: &ClusterInfo) -> anyhow::Result<ClusterRes> {
        let host = pick_host(&self.endpoint, Some(cluster));
        let url = format!("{host}/api/v1/cluster/{}", cluster.cluster_id);
        self.call(Method::GET, &url, &()).await
    }
}

#[async_trait]
impl Deployer for RemoteRunnerDeployer {
    async fn deploy(&self, dr: DeployRepo) -> anyhow::Result<i64> {
        if dr.order_detail_id != 0 {
            if let Some(resource) = self
                .user_resource_repo
                .find_by_order_detail_id(&dr.user_uuid, dr.order_detail_id)
                .await?
            {
                if resource.deploy_id != 0 {
                    anyhow::bail!("order {} is already used by another deploy", dr.order_detail_id);
                }
            }
        }

        let mut deploy = new_deploy(&dr);
        deploy.id = self.deploy_task_repo.insert(&deploy).await?;
        if deploy.svc_name.is_empty() {
            deploy.svc_name = unique_svc_name(&dr.namespace, &dr.name, deploy.id);
            self.deploy_task_repo.update(&deploy).await?;
        }

        let image_ready = !deploy.image_id.trim().is_empty();
        let build_task = DeployTask {
            deploy_id: deploy.id,
            task_type: DeployTaskType::Build,
            status: if image_ready { DeployStatus::BuildSkip.code() } else { 0 },
            message: if image_ready { "Skip".to_owned() } else { String::new() },
            ..Default::default()
        };
        self.deploy_task_repo.create_deploy_task(&build_task).await?;
        tracing::info!(deploy_id = deploy.id, svc_name = %deploy.svc_name, "deploy created");

        if image_ready {
            self.start_deploy(&deploy).await?;
        }
        Ok(deploy.id)
    }

    async fn start_deploy(&self, deploy: &Deploy) -> anyhow::Result<()> {
        let mut deploy = deploy.clone();
        deploy.status = DeployStatus::Pending;
        self.deploy_task_repo.update(&deploy).await?;

        let task_id = self
            .deploy_task_repo
            .create_deploy_task(&DeployTask {
                deploy_id: deploy.id,
                task_type: DeployTaskType::Run,
                ..Default::default()
            })
            .await?;

        let request = run_request(&deploy, task_id)?;
        let url = self.service_url(&deploy.cluster_id, &deploy.svc_name, "run").await?;
        self.request(Method::POST, &url, &request).await?;
        tracing::info!(deploy_id = deploy.id, task_id, "deploy submitted to runner");

        self.attach_user_resource(&deploy.user_uuid, deploy.order_detail_id, deploy.id)
            .await
    }

    async fn stop(&self, dr: &DeployRepo) -> anyhow::Result<()> {
        let url = self.service_url(&dr.cluster_id, &dr.svc_name, "stop").await?;
        if let Err(e) = self.request(Method::POST, &url, &service_request(dr)).await {
            tracing::error!(svc_name = %dr.svc_name, "fail to stop service on runner: {e}");
        }
        self.attach_user_resource(&dr.user_uuid, dr.order_detail_id, 0).await
    }

    async fn purge(&self, dr: &DeployRepo) -> anyhow::Result<()> {
        let url = self.service_url(&dr.cluster_id, &dr.svc_name, "purge").await?;
        let request = ServiceRequest {
            deploy_type: Some(dr.deploy_type.into()),
            user_id: Some(dr.user_uuid.clone()),
            ..service_request(dr)
        };
        self.request(Method::DELETE, &url, &request).await?;
        Ok(())
    }

    async fn exist(&self, dr: &DeployRepo) -> anyhow::Result<bool> {
        let response = self.check(dr).await?;
        match response.code {
            UNKNOWN_CODE => anyhow::bail!("fail to check deploy instance, {}", response.message),
            code => Ok(code != DeployStatus::Stopped.code()),
        }
    }

    async fn status(&self, dr: &DeployRepo, need_details: bool) -> anyhow::Result<ServiceStatus> {
        let deploy = self.find_deploy(dr.deploy_id).await?;
        if deploy.status == DeployStatus::Pending {
            return Ok(ServiceStatus {
                svc_name: deploy.svc_name,
                code: DeployStatus::Pending.code(),
                instances: vec![],
            });
        }

        let dr = DeployRepo {
            svc_name: deploy.svc_name.clone(),
            cluster_id: deploy.cluster_id.clone(),
            ..dr.clone()
        };
        let response = if need_details {
            let url = self.service_url(&dr.cluster_id, &dr.svc_name, "status").await?;
            let request = ServiceRequest {
                need_details,
                ..service_request(&dr)
            };
            self.call(Method::GET, &url, &request).await?
        } else {
            self.check(&dr).await?
        };
        Ok(service_status(&deploy, response))
    }

    async fn update_deploy(&self, req: &DeployUpdateReq, deploy: &Deploy) -> anyhow::Result<()> {
        let frame = match req.runtime_framework_id {
            Some(id) => Some(
                self.runtime_framework_repo
                    .get_by_id(id)
                    .await?
                    .filter(|f| f.enabled)
                    .ok_or_else(|| anyhow::anyhow!("runtime framework {id} is not available"))?,
            ),
            None => None,
        };
        let resource = match req.resource_id {
            Some(id) => Some(
                self.space_resource_repo
                    .get_by_id(id)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("space resource {id} does not exist"))?,
            ),
            None => None,
        };
        let updated = apply_update(deploy, req, frame.as_ref(), resource.as_ref())?;
        self.deploy_task_repo.update(&updated).await
    }

    async fn get_replica(&self, dr: &DeployRepo) -> anyhow::Result<ReplicaInfo> {
        let url = self.service_url(&dr.cluster_id, &dr.svc_name, "replica").await?;
        let response: ReplicaResponse = self.call(Method::GET, &url, &service_request(dr)).await?;
        Ok(ReplicaInfo {
            actual: response.actual_replica,
            desired: response.desired_replica,
            instances: response.instance,
        })
    }

    async fn instance_logs(&self, dr: &DeployRepo) -> anyhow::Result<flume::Receiver<String>> {
        let action = if dr.instance_name.is_empty() {
            "logs".to_owned()
        } else {
            format!("logs/{}", dr.instance_name)
        };
        let url = self.service_url(&dr.cluster_id, &dr.svc_name, &action).await?;
        let request = LogsRequest {
            id: dr.space_id,
            org_name: dr.namespace.clone(),
            repo_name: dr.name.clone(),
            cluster_id: dr.cluster_id.clone(),
            svc_name: dr.svc_name.clone(),
            instance_name: dr.instance_name.clone(),
        };
        let mut response = self.stream(&url, &request).await?;

        let (tx, rx) = flume::unbounded();
        let svc_name = dr.svc_name.clone();
        tokio::spawn(async move {
            loop {
                match response.chunk().await {
                    Ok(Some(chunk)) => {
                        if tx.send_async(String::from_utf8_lossy(&chunk).into_owned()).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(%svc_name, "log stream interrupted: {e}");
                        break;
                    }
                }
            }
        });
        Ok(rx)
    }

    async fn check_resource_available(
        &self,
        cluster_id: &str,
        order_detail_id: i64,
        hardware: &HardWare,
    ) -> anyhow::Result<bool> {
        let cluster = if cluster_id.is_empty() {
            self.cluster_info_repo.list().await?.into_iter().next()
        } else {
            self.cluster_info_repo.get_by_cluster_id(cluster_id).await?
        };
        let Some(cluster) = cluster else {
            anyhow::bail!("cluster {cluster_id} does not exist");
        };
        let resources = self.cluster_resources(&cluster).await?;
        if resources.status == ClusterStatus::Unavailable {
            anyhow::bail!("cluster {} is unavailable", cluster.cluster_id);
        }
        let available = fits_cluster(&resources.resources, hardware)?;
        if !available {
            tracing::warn!(
                cluster_id = %cluster.cluster_id,
                order_detail_id,
                ?hardware,
                "insufficient cluster resources"
            );
        }
        Ok(available)
    }
}

fn pick_host(default: &str, cluster: Option<&ClusterInfo>) -> String {
    let host = match cluster {
        Some(cluster) if !cluster.endpoint.is_empty() => cluster.endpoint.as_str(),
        _ => default,
    };
    host.trim_end_matches('/').to_owned()
}

/// Runner id of a deploy, spaces are addressed by their space id.
fn runner_id(dr: &DeployRepo) -> i64 {
    if dr.space_id != 0 {
        dr.space_id
    } else {
        dr.deploy_id
    }
}

fn service_request(dr: &DeployRepo) -> ServiceRequest {
    ServiceRequest {
        id: runner_id(dr),
        org_name: dr.namespace.clone(),
        repo_name: dr.name.clone(),
        cluster_id: dr.cluster_id.clone(),
        svc_name: dr.svc_name.clone(),
        ..Default::default()
    }
}

fn service_status(deploy: &Deploy, response: StatusResponse) -> ServiceStatus {
    if response.code == DeployStatus::Stopped.code() || response.code == UNKNOWN_CODE {
        // Queued or stopped, the stored status is more accurate.
        return ServiceStatus {
            svc_name: deploy.svc_name.clone(),
            code: deploy.status.code(),
            instances: vec![],
        };
    }
    ServiceStatus {
        svc_name: deploy.svc_name.clone(),
        code: response.code,
        instances: response.instance,
    }
}

fn new_deploy(dr: &DeployRepo) -> Deploy {
    Deploy {
        deploy_name: dr.deploy_name.clone(),
        space_id: dr.space_id,
        model_id: dr.model_id,
        repo_id: dr.repo_id,
        user_id: dr.user_id,
        user_uuid: dr.user_uuid.clone(),
        git_path: dr.git_path.clone(),
        git_branch: dr.git_branch.clone(),
        env: dr.env.clone(),
        hardware: dr.hardware.clone(),
        image_id: dr.image_id.clone(),
        runtime_framework: dr.runtime_framework.clone(),
        container_port: dr.container_port,
        annotation: dr.annotation.clone(),
        min_replica: dr.min_replica,
        max_replica: dr.max_replica,
        svc_name: dr.svc_name.clone(),
        cluster_id: dr.cluster_id.clone(),
        status: DeployStatus::Pending,
        secure_level: dr.secure_level,
        deploy_type: dr.deploy_type,
        sku: dr.sku.clone(),
        order_detail_id: dr.order_detail_id,
        engine_args: dr.engine_args.clone(),
        variables: dr.variables.clone(),
        ..Default::default()
    }
}

/// Service names are DNS labels: lowercase alphanumerics and dashes.
fn unique_svc_name(namespace: &str, name: &str, deploy_id: i64) -> String {
    let raw = format!("{namespace}-{name}-{deploy_id}");
    let mut label: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    label.truncate(63);
    label.trim_matches('-').to_owned()
}

fn string_map(raw: &str) -> anyhow::Result<HashMap<String, String>> {
    if raw.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let map: Map<String, Value> = serde_json::from_str(raw)?;
    Ok(map
        .into_iter()
        .map(|(k, v)| match v {
            Value::String(s) => (k, s),
            v => (k, v.to_string()),
        })
        .collect())
}

fn run_request(deploy: &Deploy, task_id: i64) -> anyhow::Result<RunRequest> {
    let (org_name, repo_name) = deploy
        .git_path
        .trim_start_matches("models_")
        .trim_start_matches("spaces_")
        .split_once('/')
        .map(|(o, r)| (o.to_owned(), r.to_owned()))
        .unwrap_or_default();
    let hardware = if deploy.hardware.trim().is_empty() {
        HardWare::default()
    } else {
        serde_json::from_str(&deploy.hardware)?
    };
    Ok(RunRequest {
        id: if deploy.space_id != 0 { deploy.space_id } else { deploy.id },
        user_name: deploy.user_uuid.clone(),
        org_name,
        repo_name,
        repo_type: if deploy.space_id != 0 { "space" } else { "model" }.to_owned(),
        git_path: deploy.git_path.clone(),
        git_ref: deploy.git_branch.clone(),
        min_replica: deploy.min_replica,
        max_replica: deploy.max_replica,
        hardware,
        env: string_map(&deploy.env)?,
        annotation: string_map(&deploy.annotation)?,
        runtime_framework: deploy.runtime_framework.clone(),
        image_id: deploy.image_id.clone(),
        deploy_id: deploy.id,
        cluster_id: deploy.cluster_id.clone(),
        svc_name: deploy.svc_name.clone(),
        deploy_type: deploy.deploy_type.into(),
        user_id: deploy.user_uuid.clone(),
        sku: deploy.sku.clone(),
        order_detail_id: deploy.order_detail_id,
        task_id,
    })
}

fn node_fits(node: &NodeResourceInfo, hardware: &HardWare) -> anyhow::Result<bool> {
    if hardware.memory_gi()? > node.available_mem {
        return Ok(false);
    }
    if hardware.cpu_num()? > node.available_cpu {
        return Ok(false);
    }
    if let Some((num, kind)) = hardware.xpu()? {
        if num > node.available_xpu || (!kind.is_empty() && kind != node.xpu_model) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Whether the nodes can host the hardware, each replica on its own node.
fn fits_cluster(nodes: &[NodeResourceInfo], hardware: &HardWare) -> anyhow::Result<bool> {
    let replicas = hardware.replicas.max(1) as usize;
    let mut fitting = 0;
    for node in nodes {
        if node_fits(node, hardware)? {
            fitting += 1;
            if fitting >= replicas {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn apply_update(
    deploy: &Deploy,
    req: &DeployUpdateReq,
    frame: Option<&RuntimeFramework>,
    resource: Option<&SpaceResource>,
) -> anyhow::Result<Deploy> {
    let mut deploy = deploy.clone();
    if let Some(frame) = frame {
        deploy.image_id = frame.frame_image.clone();
        deploy.runtime_framework = frame.frame_name.clone();
        deploy.container_port = frame.container_port;
    }
    if let Some(resource) = resource {
        resource.hardware()?;
        deploy.hardware = resource.resources.clone();
        deploy.sku = resource.id.to_string();
    }
    if let Some(name) = &req.deploy_name {
        deploy.deploy_name = name.clone();
    }
    if let Some(env) = &req.env {
        deploy.env = env.clone();
    }
    if let Some(min) = req.min_replica {
        deploy.min_replica = min;
    }
    if let Some(max) = req.max_replica {
        deploy.max_replica = max;
    }
    if deploy.max_replica < deploy.min_replica {
        anyhow::bail!("invalid min/max replica {}/{}", deploy.min_replica, deploy.max_replica);
    }
    if let Some(revision) = &req.revision {
        deploy.git_branch = revision.clone();
    }
    if let Some(level) = req.secure_level {
        deploy.secure_level = level;
    }
    if let Some(cluster_id) = &req.cluster_id {
        deploy.cluster_id = cluster_id.clone();
    }
    if let Some(engine_args) = &req.engine_args {
        deploy.engine_args = engine_args.clone();
    }

    let mut variables = req.variables.clone();
    if let Some(entrypoint) = &req.entrypoint {
        if deploy.runtime_framework.to_lowercase().contains("llama.cpp") {
            let raw = variables.as_deref().unwrap_or_default();
            let mut map: Map<String, Value> = if raw.trim().is_empty() {
                Map::new()
            } else {
                serde_json::from_str(raw)
                    .map_err(|e| anyhow::anyhow!("invalid json format of variables, {e}"))?
            };
            map.insert(GGUF_ENTRY_POINT.to_owned(), Value::String(entrypoint.clone()));
            variables = Some(serde_json::to_string(&map)?);
        }
    }
    if let Some(variables) = variables {
        deploy.variables = variables;
    }
    Ok(deploy)
}
