use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("push delivery failed: {0}")]
    Delivery(String),
}

/// Boundary to the external push-delivery backend. Best-effort: no delivery
/// receipt is consumed and nothing here retries.
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn send(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        data: HashMap<String, String>,
    ) -> Result<(), PushError>;
}

/// Stand-in gateway for deployments without a push backend wired up: logs
/// the payload and reports success.
pub struct LoggingPushGateway;

#[async_trait]
impl PushGateway for LoggingPushGateway {
    async fn send(
        &self,
        device_token: &str,
        title: &str,
        _body: &str,
        data: HashMap<String, String>,
    ) -> Result<(), PushError> {
        info!(
            device_token,
            title,
            event_type = data.get("eventType").map(String::as_str).unwrap_or(""),
            "push delivered (logging gateway)"
        );
        Ok(())
    }
}
