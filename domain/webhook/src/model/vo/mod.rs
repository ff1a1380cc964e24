mod event;
mod payload;

#[rustfmt::skip]
pub use {
    event::{WebHookDataType, WebHookEventType, WebHookHeader, WebHookRecvEvent},
    payload::{ClusterEvent, ImageBuilderEvent, ServiceEvent, WorkflowPhase},
};
