mod executor;
mod web_hook;

#[rustfmt::skip]
pub use {
    executor::{ClusterExecutor, HeartbeatExecutor, ImageBuilderExecutor, KServiceExecutor, WorkflowExecutor},
    web_hook::{EventDispatcher, WebHookServiceImpl},
};
