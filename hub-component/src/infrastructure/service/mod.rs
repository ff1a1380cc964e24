mod remote_runner;
mod s3_object_storage;
mod webhook_dispatcher;

#[rustfmt::skip]
pub use {
    remote_runner::RemoteRunnerDeployer,
    s3_object_storage::S3ObjectStorage,
    webhook_dispatcher::WebHookDispatcher,
};
