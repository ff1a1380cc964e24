mod accounting;
mod deployer;
mod lifecycle;
mod permission;
mod resource_gate;

#[rustfmt::skip]
pub use {
    accounting::AccountingService,
    deployer::Deployer,
    lifecycle::DeployLifecycleService,
    permission::DeployPermissionService,
    resource_gate::ResourceGateService,
};
