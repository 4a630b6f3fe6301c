use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde::Deserialize;
use uuid::Uuid;

use crate::bridge;
use crate::error::AppError;
use crate::models::assignment::{AssignmentRecord, DispatchEvent};
use crate::models::courier::GeoPoint;
use crate::models::order::{OrderCreated, OrderStatus, OrderStatusChanged};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(order_created))
        .route("/orders/:id/status", post(status_changed))
        .route("/orders/:id/accept", post(accept_order))
        .route("/orders/:id/assignment", get(get_assignment))
}

#[derive(Deserialize)]
pub struct OrderCreatedRequest {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub pickup: GeoPoint,
}

/// Post-commit signal from the order system of record. Dispatch failures
/// never fail this call; the response only acknowledges the signal.
async fn order_created(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<OrderCreatedRequest>,
) -> Result<StatusCode, AppError> {
    let pickup = payload.pickup;
    if !(-90.0..=90.0).contains(&pickup.lat) || !(-180.0..=180.0).contains(&pickup.lng) {
        return Err(AppError::BadRequest(
            "pickup coordinates out of range".to_string(),
        ));
    }

    bridge::handle_order_created(
        state,
        OrderCreated {
            order_id: payload.order_id,
            customer_id: payload.customer_id,
            pickup,
        },
    )
    .await;

    Ok(StatusCode::ACCEPTED)
}

#[derive(Deserialize)]
pub struct StatusChangedRequest {
    pub customer_id: Uuid,
    pub old_courier_id: Option<Uuid>,
    pub new_courier_id: Option<Uuid>,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

async fn status_changed(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusChangedRequest>,
) -> StatusCode {
    bridge::handle_status_changed(
        state,
        OrderStatusChanged {
            order_id: id,
            customer_id: payload.customer_id,
            old_courier_id: payload.old_courier_id,
            new_courier_id: payload.new_courier_id,
            from: payload.from,
            to: payload.to,
        },
    )
    .await;

    StatusCode::ACCEPTED
}

#[derive(Deserialize)]
pub struct AcceptOrderRequest {
    pub courier_id: Uuid,
}

/// Courier acceptance: the create-if-absent write that resolves the offer
/// race. Exactly one caller per order gets a 200; the rest get 409.
async fn accept_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AcceptOrderRequest>,
) -> Result<Json<AssignmentRecord>, AppError> {
    let order = state
        .orders
        .get(&id)
        .map(|record| record.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    if !state.gate.try_assign(id, payload.courier_id) {
        return Err(AppError::Conflict(format!(
            "order {id} already has a courier assigned"
        )));
    }

    let record = state
        .gate
        .assignment(id)
        .ok_or_else(|| AppError::Internal("assignment record missing after win".to_string()))?;

    if state
        .events_tx
        .send(DispatchEvent::Assigned {
            order_id: id,
            courier_id: payload.courier_id,
        })
        .is_err()
    {
        tracing::debug!(order_id = %id, "no dispatch event subscribers");
    }

    bridge::handle_status_changed(
        state,
        OrderStatusChanged {
            order_id: id,
            customer_id: order.customer_id,
            old_courier_id: None,
            new_courier_id: Some(payload.courier_id),
            from: OrderStatus::FindingDriver,
            to: OrderStatus::DriverAssigned,
        },
    )
    .await;

    Ok(Json(record))
}

async fn get_assignment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssignmentRecord>, AppError> {
    let record = state
        .gate
        .assignment(id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} is not assigned")))?;

    Ok(Json(record))
}
