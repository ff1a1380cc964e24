mod deploy_type;
mod hardware;
mod notification;
mod request;
mod response;
mod status;

#[rustfmt::skip]
pub use {
    deploy_type::{DeployType, SecureLevel},
    hardware::{Cpu, HardWare, Processor},
    notification::DeployNotification,
    request::{DeployActReq, DeployRepo, DeployUpdateReq},
    response::{DeployDetail, DeployStatusReport, Instance, ReplicaInfo, ServiceStatus},
    status::{deploy_status_code_to_string, is_running_code, live_status, DeployStatus, RunnerStatus},
};
