use domain_repo::model::vo::RepositoryType;
use serde::{Deserialize, Serialize};

use super::{DeployType, SecureLevel};
use crate::model::entity::Deploy;

/// Action on one deploy of a repository, issued by `current_user`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployActReq {
    pub repo_type: RepositoryType,
    pub namespace: String,
    pub name: String,
    pub current_user: String,
    pub deploy_id: i64,
    pub deploy_type: DeployType,
    #[serde(default)]
    pub instance_name: String,
}

/// Partial update of a deploy, `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployUpdateReq {
    pub deploy_name: Option<String>,
    pub env: Option<String>,
    pub resource_id: Option<i64>,
    pub runtime_framework_id: Option<i64>,
    pub min_replica: Option<i32>,
    pub max_replica: Option<i32>,
    pub revision: Option<String>,
    pub secure_level: Option<SecureLevel>,
    pub cluster_id: Option<String>,
    pub engine_args: Option<String>,
    pub variables: Option<String>,
    pub entrypoint: Option<String>,
}

impl DeployUpdateReq {
    /// Whether applying the update requires the running service to be stopped first.
    pub fn need_restart_deploy(&self) -> bool {
        self.cluster_id.is_some()
            || self.runtime_framework_id.is_some()
            || self.resource_id.is_some()
            || self.max_replica.is_some()
            || self.min_replica.is_some()
            || self.env.is_some()
            || self.engine_args.is_some()
            || self.variables.is_some()
            || self.entrypoint.is_some()
    }
}

/// Addresses a deploy on the runner and carries what is needed to create it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployRepo {
    pub deploy_id: i64,
    pub space_id: i64,
    pub model_id: i64,
    pub repo_id: i64,
    pub user_id: i64,
    pub user_uuid: String,
    pub namespace: String,
    pub name: String,
    pub repo_type: RepositoryType,
    pub deploy_type: DeployType,
    pub deploy_name: String,
    pub svc_name: String,
    pub cluster_id: String,
    pub instance_name: String,
    pub git_path: String,
    pub git_branch: String,
    pub env: String,
    pub hardware: String,
    pub image_id: String,
    pub runtime_framework: String,
    pub container_port: i32,
    pub annotation: String,
    pub min_replica: i32,
    pub max_replica: i32,
    pub secure_level: SecureLevel,
    pub sku: String,
    pub order_detail_id: i64,
    pub engine_args: String,
    pub variables: String,
}

impl DeployRepo {
    /// Addressing of an existing deploy.
    pub fn of(deploy: &Deploy, namespace: &str, name: &str, repo_type: RepositoryType) -> Self {
        Self {
            deploy_id: deploy.id,
            space_id: deploy.space_id,
            model_id: deploy.model_id,
            repo_id: deploy.repo_id,
            user_id: deploy.user_id,
            user_uuid: deploy.user_uuid.clone(),
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            repo_type,
            deploy_type: deploy.deploy_type,
            deploy_name: deploy.deploy_name.clone(),
            svc_name: deploy.svc_name.clone(),
            cluster_id: deploy.cluster_id.clone(),
            git_path: deploy.git_path.clone(),
            git_branch: deploy.git_branch.clone(),
            env: deploy.env.clone(),
            hardware: deploy.hardware.clone(),
            image_id: deploy.image_id.clone(),
            runtime_framework: deploy.runtime_framework.clone(),
            container_port: deploy.container_port,
            annotation: deploy.annotation.clone(),
            min_replica: deploy.min_replica,
            max_replica: deploy.max_replica,
            secure_level: deploy.secure_level,
            sku: deploy.sku.clone(),
            order_detail_id: deploy.order_detail_id,
            engine_args: deploy.engine_args.clone(),
            variables: deploy.variables.clone(),
            instance_name: String::new(),
        }
    }

    pub fn with_instance(mut self, instance_name: &str) -> Self {
        self.instance_name = instance_name.to_owned();
        self
    }
}
