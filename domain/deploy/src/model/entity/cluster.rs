use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cluster a runner is installed on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterInfo {
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
    /// Address of the runner serving this cluster.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub network_interface: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub app_endpoint: String,
    #[serde(default)]
    pub resource: Option<ClusterRes>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStatus {
    #[default]
    Running,
    Unavailable,
}

/// Resource snapshot reported by a runner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterRes {
    pub cluster_id: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub status: ClusterStatus,
    #[serde(default)]
    pub storage_class: String,
    #[serde(default)]
    pub resources: Vec<NodeResourceInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeResourceInfo {
    pub node_name: String,
    #[serde(default)]
    pub node_status: String,
    #[serde(default)]
    pub xpu_model: String,
    #[serde(default)]
    pub gpu_vendor: String,
    #[serde(default)]
    pub total_cpu: f64,
    #[serde(default)]
    pub available_cpu: f64,
    #[serde(default)]
    pub total_xpu: i64,
    #[serde(default)]
    pub available_xpu: i64,
    /// In Gi.
    #[serde(default)]
    pub total_mem: f32,
    /// In Gi.
    #[serde(default)]
    pub available_mem: f32,
}
