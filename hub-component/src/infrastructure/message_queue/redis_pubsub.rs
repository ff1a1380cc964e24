use std::time::Duration;

use futures::StreamExt;
use hub_architecture::message_queue::{
    ConsumerFn, MessageMeta, MessageQueueConsumer, MessageQueueProducer,
    MessageQueueProducerTemplate, SubscribeError, SubscribeParams,
};
use redis::aio::ConnectionManager;
use tracing::{error, info, trace, warn};

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Queue over redis pub/sub.
///
/// Every subscriber receives every message of its channels, messages
/// published while nobody listens are lost.
pub struct RedisMessageQueue {
    client: redis::Client,
    connection: ConnectionManager,
}

impl RedisMessageQueue {
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(url)?;
        let connection = ConnectionManager::new(client.clone()).await?;
        Ok(Self { client, connection })
    }
}

async fn listen(
    client: &redis::Client,
    topics: &[String],
    callback: &ConsumerFn,
) -> anyhow::Result<()> {
    let mut pubsub = client.get_async_connection().await?.into_pubsub();
    for topic in topics {
        pubsub.subscribe(topic).await?;
    }
    info!(?topics, "subscribed to redis channels");
    let mut messages = pubsub.on_message();
    while let Some(message) = messages.next().await {
        let meta = MessageMeta {
            subject: message.get_channel_name().to_string(),
        };
        trace!(subject = %meta.subject, "message received");
        if let Err(e) = callback(message.get_payload_bytes().to_vec(), meta).await {
            error!("{e}");
        }
    }
    Ok(())
}

#[async_trait::async_trait]
impl MessageQueueProducer for RedisMessageQueue {
    async fn publish(&self, topic: &str, content: &[u8]) -> anyhow::Result<()> {
        let mut connection = self.connection.clone();
        let receivers: i64 = redis::cmd("PUBLISH")
            .arg(topic)
            .arg(content)
            .query_async(&mut connection)
            .await?;
        if receivers == 0 {
            warn!(topic, "message published without subscriber");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl<T> MessageQueueProducerTemplate<T> for RedisMessageQueue
where
    T: serde::Serialize + Send + Sync,
{
    async fn send_object(&self, content: &T, topic: &str) -> anyhow::Result<()> {
        self.publish(topic, &serde_json::to_vec(content)?).await
    }
}

#[async_trait::async_trait]
impl MessageQueueConsumer for RedisMessageQueue {
    async fn subscribe(&self, params: SubscribeParams) -> anyhow::Result<()> {
        if !params.auto_ack {
            return Err(SubscribeError::ManualAckUnsupported.into());
        }
        if params.topics.is_empty() {
            return Err(SubscribeError::NoTopic.into());
        }
        let client = self.client.clone();
        tokio::spawn(async move {
            loop {
                match listen(&client, &params.topics, &params.callback).await {
                    Ok(()) => warn!(group = %params.group, "redis subscription closed"),
                    Err(e) => error!(group = %params.group, "redis subscription failed: {e}"),
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        });
        Ok(())
    }
}
