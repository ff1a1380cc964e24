mod lifecycle;
mod permission;
mod resource_gate;

#[rustfmt::skip]
pub use {
    lifecycle::DeployLifecycleServiceImpl,
    permission::DeployPermissionServiceImpl,
    resource_gate::ResourceGateServiceImpl,
};
