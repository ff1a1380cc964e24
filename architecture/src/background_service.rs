/// Service running in the background during the whole lifetime of the process.
#[async_trait::async_trait]
pub trait BackgroundService: Send + Sync {
    /// Runs until the process stops.
    async fn run(&self);
}
