use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::engine::dispatch::{DispatchJob, run_dispatch};
use crate::models::courier::GeoPoint;
use crate::models::order::{OrderCreated, OrderRecord, OrderStatus, OrderStatusChanged};
use crate::notify::payload::{courier_payload, customer_payload};
use crate::notify::tokens::Role;
use crate::state::AppState;

/// Maps post-commit order lifecycle signals onto dispatch runs and direct
/// notifications. Nothing here surfaces an error to the signal producer.
pub async fn handle_order_created(state: Arc<AppState>, signal: OrderCreated) {
    info!(
        order_id = %signal.order_id,
        customer_id = %signal.customer_id,
        "order created; starting courier search"
    );

    state.orders.insert(
        signal.order_id,
        OrderRecord {
            order_id: signal.order_id,
            customer_id: signal.customer_id,
            pickup: signal.pickup,
            created_at: Utc::now(),
        },
    );

    if let Some(payload) = customer_payload(OrderStatus::FindingDriver, signal.order_id, None) {
        let notifier = state.notifier.clone();
        let customer_id = signal.customer_id;
        state
            .pool
            .submit_or_run(Box::pin(async move {
                notifier.notify(Role::Customer, customer_id, &payload).await;
            }))
            .await;
    }

    submit_dispatch(state, signal.order_id, signal.pickup).await;
}

pub async fn handle_status_changed(state: Arc<AppState>, signal: OrderStatusChanged) {
    debug!(
        order_id = %signal.order_id,
        from = ?signal.from,
        to = ?signal.to,
        "order status changed"
    );

    if signal.to.ends_delivery_for_courier() {
        if let Some(old_courier) = signal.old_courier_id {
            state.gate.clear_delivering(old_courier);
        }
    }

    if signal.to == OrderStatus::ReassigningDriver {
        state.gate.clear_assignment(signal.order_id);
    }

    // The courier copy goes to the assigned courier, or to the courier being
    // replaced when the order has just lost one.
    let courier_recipient = signal.new_courier_id.or(signal.old_courier_id);

    let customer = customer_payload(signal.to, signal.order_id, signal.new_courier_id);
    let courier = courier_payload(signal.to, signal.order_id, courier_recipient);

    if customer.is_some() || courier.is_some() {
        let notifier = state.notifier.clone();
        let customer_id = signal.customer_id;
        state
            .pool
            .submit_or_run(Box::pin(async move {
                if let Some(payload) = customer {
                    notifier.notify(Role::Customer, customer_id, &payload).await;
                }
                if let (Some(payload), Some(recipient)) = (courier, courier_recipient) {
                    notifier.notify(Role::Courier, recipient, &payload).await;
                }
            }))
            .await;
    }

    if signal.to == OrderStatus::ReassigningDriver {
        let pickup = state.orders.get(&signal.order_id).map(|record| record.pickup);
        match pickup {
            Some(pickup) => submit_dispatch(state, signal.order_id, pickup).await,
            None => warn!(
                order_id = %signal.order_id,
                "reassignment requested for unknown order; cannot re-dispatch"
            ),
        }
    }
}

async fn submit_dispatch(state: Arc<AppState>, order_id: Uuid, pickup: GeoPoint) {
    let job = DispatchJob {
        order_id,
        pickup,
        wave_size: state.config.wave_size,
    };

    let task_state = state.clone();
    let task = Box::pin(run_dispatch(task_state, job));
    if let Err(task) = state.pool.try_submit(task) {
        warn!(
            order_id = %order_id,
            "worker pool saturated; running dispatch inline"
        );
        task.await;
    }
}
