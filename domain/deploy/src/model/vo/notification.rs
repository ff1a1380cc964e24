use serde::{Deserialize, Serialize};

/// Published when a deploy becomes reachable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployNotification {
    pub deploy_id: i64,
    pub deploy_name: String,
    pub deploy_type: super::DeployType,
    pub user_uuid: String,
    pub svc_name: String,
    pub status: String,
    pub endpoint: String,
}
