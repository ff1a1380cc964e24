use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use domain_webhook::{
    exception::{WebHookException, WebHookResult},
    model::vo::WebHookRecvEvent,
    service::{ExecutorRegistry, WebHookService},
};
use hub_architecture::message_queue::{
    ConsumerFn, ConsumerReturn, MessageMeta, MessageQueueConsumer, MessageQueueProducer, SubscribeParams,
};
use tracing::{error, info, warn};
use typed_builder::TypedBuilder;

/// Routes raw queued events to the registered executors.
#[derive(TypedBuilder)]
pub struct EventDispatcher {
    registry: ExecutorRegistry,
    #[builder(default = 3)]
    retry_count: u32,
    #[builder(default = Duration::from_secs(1))]
    retry_delay: Duration,
    #[builder(default = Duration::from_secs(30))]
    executor_timeout: Duration,
}

impl EventDispatcher {
    /// Dispatch with bounded retries. An event still failing afterwards is logged and dropped.
    pub async fn dispatch_msg_with_retry(&self, raw: &[u8], meta: &MessageMeta) -> anyhow::Result<()> {
        let attempts = self.retry_count.max(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            match self.dispatch_executor(raw).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(attempt, subject = %meta.subject, "fail to dispatch webhook event: {e}");
                    last_error = Some(e);
                }
            }
            if attempt < attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }
        if let Some(e) = last_error {
            error!(
                subject = %meta.subject,
                payload = %String::from_utf8_lossy(raw),
                "drop webhook event after {attempts} attempts: {e}"
            );
        }
        Ok(())
    }

    pub async fn dispatch_executor(&self, raw: &[u8]) -> WebHookResult<()> {
        let event: WebHookRecvEvent = serde_json::from_slice(raw)?;
        let event_type = event.event_type();
        let executor = self
            .registry
            .get(event_type)
            .ok_or(WebHookException::UnknownEventType { event_type })?;

        match tokio::time::timeout(self.executor_timeout, executor.process_event(&event)).await {
            Ok(result) => result.map_err(WebHookException::from),
            Err(_) => Err(WebHookException::Timeout {
                event_type,
                seconds: self.executor_timeout.as_secs(),
            }),
        }
    }
}

#[derive(TypedBuilder)]
pub struct WebHookServiceImpl {
    producer: Arc<dyn MessageQueueProducer>,
    consumer: Arc<dyn MessageQueueConsumer>,
    dispatcher: Arc<EventDispatcher>,
    topic: String,
    group: String,
}

#[async_trait]
impl WebHookService for WebHookServiceImpl {
    async fn handle_web_hook(&self, event: &WebHookRecvEvent) -> WebHookResult<()> {
        let content = serde_json::to_vec(event)?;
        self.producer.publish(&self.topic, &content).await?;
        Ok(())
    }

    async fn dispatch_web_hook_event(&self) -> WebHookResult<()> {
        let dispatcher = self.dispatcher.clone();
        let callback: ConsumerFn = Arc::new(move |raw: Vec<u8>, meta: MessageMeta| -> ConsumerReturn {
            let dispatcher = dispatcher.clone();
            Box::pin(async move { dispatcher.dispatch_msg_with_retry(&raw, &meta).await })
        });
        self.consumer
            .subscribe(SubscribeParams {
                group: self.group.clone(),
                topics: vec![self.topic.clone()],
                auto_ack: true,
                callback,
            })
            .await?;
        info!(topic = %self.topic, group = %self.group, "webhook dispatcher subscribed");
        Ok(())
    }
}
