use async_trait::async_trait;

use crate::model::vo::WebHookRecvEvent;

/// Handles the events of the types it is registered for.
#[async_trait]
pub trait WebHookExecutor: Send + Sync {
    async fn process_event(&self, event: &WebHookRecvEvent) -> anyhow::Result<()>;
}
