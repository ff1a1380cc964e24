use std::{collections::HashMap, sync::Mutex};

use hub_architecture::message_queue::{
    MessageMeta, MessageQueueConsumer, MessageQueueProducer, MessageQueueProducerTemplate,
    SubscribeError, SubscribeParams,
};
use tracing::{error, trace, Instrument};

#[derive(Debug, Clone)]
pub struct InternalMessage {
    pub topic: String,
    pub body: Vec<u8>,
}

type Channel = (flume::Sender<InternalMessage>, flume::Receiver<InternalMessage>);

/// In-process queue with one unbounded channel per topic.
///
/// Subscribers of the same topic compete for its messages.
#[derive(Default)]
pub struct InternalMessageQueue {
    channels: Mutex<HashMap<String, Channel>>,
}

impl InternalMessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn channel(&self, topic: &str) -> Channel {
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        channels.entry(topic.to_string()).or_insert_with(flume::unbounded).clone()
    }
}

#[async_trait::async_trait]
impl MessageQueueProducer for InternalMessageQueue {
    async fn publish(&self, topic: &str, content: &[u8]) -> anyhow::Result<()> {
        let (sender, _) = self.channel(topic);
        Ok(sender
            .send_async(InternalMessage {
                topic: topic.to_string(),
                body: content.to_vec(),
            })
            .await?)
    }
}

#[async_trait::async_trait]
impl<T> MessageQueueProducerTemplate<T> for InternalMessageQueue
where
    T: serde::Serialize + Send + Sync,
{
    async fn send_object(&self, content: &T, topic: &str) -> anyhow::Result<()> {
        self.publish(topic, &serde_json::to_vec(content)?).await
    }
}

#[async_trait::async_trait]
impl MessageQueueConsumer for InternalMessageQueue {
    async fn subscribe(&self, params: SubscribeParams) -> anyhow::Result<()> {
        if !params.auto_ack {
            return Err(SubscribeError::ManualAckUnsupported.into());
        }
        if params.topics.is_empty() {
            return Err(SubscribeError::NoTopic.into());
        }
        for topic in params.topics {
            let (_, receiver) = self.channel(&topic);
            let callback = params.callback.clone();
            let group = params.group.clone();
            tokio::spawn(
                async move {
                    while let Ok(message) = receiver.recv_async().await {
                        trace!(topic = %message.topic, "message received");
                        let meta = MessageMeta {
                            subject: message.topic,
                        };
                        if let Err(e) = callback(message.body, meta).await {
                            error!("{e}");
                        }
                    }
                }
                .instrument(tracing::trace_span!("internal_message_queue", %topic, %group)),
            );
        }
        Ok(())
    }
}
