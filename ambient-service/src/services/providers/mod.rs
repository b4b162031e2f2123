pub mod push;

use crate::models::NotificationPayload;
use async_trait::async_trait;
use thiserror::Error;

pub use push::{FcmProvider, MockPushProvider};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not enabled: {0}")]
    NotEnabled(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Send error: {0}")]
    SendFailed(String),
}

#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Deliver one payload to every token as a single batch. The first
    /// per-token failure aborts the remainder; there is no partial-success
    /// accounting.
    async fn send_batch(
        &self,
        tokens: &[String],
        payload: &NotificationPayload,
    ) -> Result<(), ProviderError>;

    async fn health_check(&self) -> Result<(), ProviderError>;

    fn is_enabled(&self) -> bool;
}
