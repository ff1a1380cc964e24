use std::{future::Future, pin::Pin, sync::Arc};

pub type ConsumerReturn = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;
pub type ConsumerFn = Arc<dyn Fn(Vec<u8>, MessageMeta) -> ConsumerReturn + Send + Sync>;

/// Information about the delivered message.
#[derive(Debug, Clone, Default)]
pub struct MessageMeta {
    /// Topic the message was delivered on.
    pub subject: String,
}

pub struct SubscribeParams {
    pub group: String,
    pub topics: Vec<String>,
    /// Acknowledge messages before the callback runs.
    pub auto_ack: bool,
    pub callback: ConsumerFn,
}

#[derive(Debug, thiserror::Error)]
pub enum SubscribeError {
    #[error("manual acknowledgement is not supported by this transport")]
    ManualAckUnsupported,
    #[error("no topic given to subscribe")]
    NoTopic,
}

/// Message subscriber.
#[async_trait::async_trait]
pub trait MessageQueueConsumer: Send + Sync {
    /// Register a subscription; delivery happens on a task owned by the queue.
    async fn subscribe(&self, params: SubscribeParams) -> anyhow::Result<()>;
}
