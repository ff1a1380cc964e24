use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use domain_webhook::service::WebHookService;
use hub_architecture::background_service::BackgroundService;
use tracing::error;

const RESUBSCRIBE_DELAY: Duration = Duration::from_secs(5);

/// Keeps the queued webhook events flowing into the executors.
pub struct WebHookDispatcher {
    service: Arc<dyn WebHookService>,
}

impl WebHookDispatcher {
    pub fn new(service: Arc<dyn WebHookService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl BackgroundService for WebHookDispatcher {
    async fn run(&self) {
        while let Err(e) = self.service.dispatch_web_hook_event().await {
            error!("Unable to subscribe webhook events: {e}");
            tokio::time::sleep(RESUBSCRIBE_DELAY).await;
        }
        // Consumers run on their own tasks from here.
        std::future::pending::<()>().await
    }
}
