mod cluster;
mod heartbeat;
mod image_builder;
mod kservice;
mod workflow;

#[rustfmt::skip]
pub use {
    cluster::ClusterExecutor,
    heartbeat::HeartbeatExecutor,
    image_builder::ImageBuilderExecutor,
    kservice::KServiceExecutor,
    workflow::WorkflowExecutor,
};
