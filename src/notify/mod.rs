pub mod payload;
pub mod push;
pub mod tokens;

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::notify::payload::{NotifyPayload, offer_payload};
use crate::notify::push::PushGateway;
use crate::notify::tokens::{Role, TokenStore};
use crate::observability::metrics::Metrics;

/// Fire-and-forget delivery of rendered payloads. Missing tokens are a
/// no-op; gateway errors are logged and swallowed (at-most-once).
#[derive(Clone)]
pub struct Notifier {
    tokens: TokenStore,
    gateway: Arc<dyn PushGateway>,
    metrics: Metrics,
}

impl Notifier {
    pub fn new(tokens: TokenStore, gateway: Arc<dyn PushGateway>, metrics: Metrics) -> Self {
        Self {
            tokens,
            gateway,
            metrics,
        }
    }

    pub async fn notify(&self, role: Role, recipient_id: Uuid, payload: &NotifyPayload) {
        let Some(token) = self.tokens.lookup(role, recipient_id) else {
            debug!(
                recipient = %recipient_id,
                role = role.as_label(),
                order_id = %payload.order_id,
                "no push token registered; skipping notification"
            );
            return;
        };

        match self
            .gateway
            .send(&token, payload.title, payload.body, payload.data())
            .await
        {
            Ok(()) => {
                self.metrics
                    .notifications_sent_total
                    .with_label_values(&[role.as_label()])
                    .inc();
                debug!(
                    recipient = %recipient_id,
                    role = role.as_label(),
                    event_type = payload.event_type,
                    order_id = %payload.order_id,
                    "notification sent"
                );
            }
            Err(err) => {
                warn!(
                    error = %err,
                    recipient = %recipient_id,
                    role = role.as_label(),
                    order_id = %payload.order_id,
                    "push delivery failed"
                );
            }
        }
    }

    pub async fn offer_order(&self, courier_id: Uuid, order_id: Uuid) {
        self.notify(Role::Courier, courier_id, &offer_payload(order_id))
            .await;
    }
}
