mod cluster;
mod deploy;
mod deploy_task;
mod runtime_framework;
mod space_resource;
mod user_resource;

#[rustfmt::skip]
pub use {
    cluster::{ClusterInfo, ClusterRes, ClusterStatus, NodeResourceInfo},
    deploy::Deploy,
    deploy_task::{DeployTask, DeployTaskType},
    runtime_framework::RuntimeFramework,
    space_resource::SpaceResource,
    user_resource::UserResource,
};
