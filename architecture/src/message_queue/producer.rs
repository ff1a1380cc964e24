use serde::Serialize;

/// Raw message producer.
#[async_trait::async_trait]
pub trait MessageQueueProducer: Send + Sync {
    /// Publish bytes to a topic.
    async fn publish(&self, topic: &str, content: &[u8]) -> anyhow::Result<()>;
}

/// Producer publishing serializable objects.
#[async_trait::async_trait]
pub trait MessageQueueProducerTemplate<T>: Send + Sync
where
    T: Serialize + Send + Sync,
{
    async fn send_object(&self, content: &T, topic: &str) -> anyhow::Result<()>;
}
