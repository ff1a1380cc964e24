mod cluster;
mod deploy_task;
mod runtime_framework;
mod space_resource;
mod user_resource;

#[rustfmt::skip]
pub use {
    cluster::ClusterInfoRepo,
    deploy_task::DeployTaskRepo,
    runtime_framework::RuntimeFrameworkRepo,
    space_resource::SpaceResourceRepo,
    user_resource::UserResourceRepo,
};
