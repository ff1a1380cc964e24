use hub_architecture::model::derive::AggregateRoot;
use num_derive::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

/// One build or run submission of a deploy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, AggregateRoot)]
pub struct DeployTask {
    pub id: i64,
    pub deploy_id: i64,
    pub task_type: DeployTaskType,
    pub status: i32,
    pub message: String,
}

#[derive(
    FromPrimitive, ToPrimitive, Clone, Copy, Serialize, Deserialize, Default, Debug, Hash, PartialEq, Eq,
)]
pub enum DeployTaskType {
    #[default]
    Build = 0,
    Run = 1,
}
