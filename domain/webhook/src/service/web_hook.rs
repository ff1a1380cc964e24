use async_trait::async_trait;

use crate::{exception::WebHookResult, model::vo::WebHookRecvEvent};

#[async_trait]
pub trait WebHookService: Send + Sync {
    /// Queue an event received from a runner.
    async fn handle_web_hook(&self, event: &WebHookRecvEvent) -> WebHookResult<()>;

    /// Subscribe to queued events and route each one to its executor.
    async fn dispatch_web_hook_event(&self) -> WebHookResult<()>;
}
