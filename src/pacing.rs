use async_trait::async_trait;
use std::time::Duration;

/// Wait inserted between two consecutive outbound requests.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SleepPacer;

#[async_trait]
impl Pacer for SleepPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
