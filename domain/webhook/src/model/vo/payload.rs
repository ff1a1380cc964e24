use domain_deploy::model::{
    entity::{ClusterInfo, ClusterStatus},
    vo::DeployStatus,
};
use serde::{Deserialize, Serialize};

/// Status change of a service, sent on service create, change and stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceEvent {
    pub service_name: String,
    /// Deploy status code.
    pub status: i32,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub reason: String,
    pub task_id: i64,
    #[serde(default)]
    pub cluster_node: String,
    #[serde(default)]
    pub queue_name: String,
}

impl ServiceEvent {
    pub fn deploy_status(&self) -> Option<DeployStatus> {
        DeployStatus::from_code(self.status)
    }
}

/// Phase of an argo workflow, shared by image builds and workflows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowPhase {
    #[default]
    Pending,
    Running,
    Succeeded,
    Failed,
    Error,
}

impl WorkflowPhase {
    /// Build status an image build in this phase stands for.
    pub fn build_status(self) -> DeployStatus {
        match self {
            WorkflowPhase::Pending => DeployStatus::BuildPending,
            WorkflowPhase::Running => DeployStatus::BuildInProgress,
            WorkflowPhase::Succeeded => DeployStatus::BuildSucceed,
            WorkflowPhase::Failed | WorkflowPhase::Error => DeployStatus::BuildFailed,
        }
    }

    pub fn is_finished(self) -> bool {
        !matches!(self, WorkflowPhase::Pending | WorkflowPhase::Running)
    }
}

/// Progress of an image build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageBuilderEvent {
    pub deploy_id: String,
    pub task_id: i64,
    pub status: WorkflowPhase,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub image_path: String,
}

/// Cluster announced by a runner on start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterEvent {
    pub cluster_id: String,
    #[serde(default)]
    pub cluster_config: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub storage_class: String,
    #[serde(default)]
    pub status: ClusterStatus,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub network_interface: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub app_endpoint: String,
}

impl ClusterEvent {
    /// Apply the announced settings onto a stored cluster, keeping its resource snapshot.
    pub fn apply_to(&self, cluster: &mut ClusterInfo) {
        cluster.cluster_id = self.cluster_id.clone();
        cluster.cluster_config = self.cluster_config.clone();
        cluster.region = self.region.clone();
        cluster.zone = self.zone.clone();
        cluster.provider = self.provider.clone();
        cluster.enable = self.enable;
        cluster.storage_class = self.storage_class.clone();
        cluster.status = self.status;
        cluster.endpoint = self.endpoint.clone();
        cluster.network_interface = self.network_interface.clone();
        cluster.mode = self.mode.clone();
        cluster.app_endpoint = self.app_endpoint.clone();
    }
}
