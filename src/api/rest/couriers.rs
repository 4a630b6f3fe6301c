use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::courier::{CourierLocationEntry, GeoPoint};
use crate::notify::tokens::Role;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/couriers/:id/location",
            post(update_location).get(get_location),
        )
        .route(
            "/couriers/:id/push-token",
            put(register_token).delete(deregister_token),
        )
        .route("/couriers/:id/delivering", get(is_delivering))
}

#[derive(Deserialize)]
pub struct UpdateLocationRequest {
    pub location: GeoPoint,
}

#[derive(Serialize)]
pub struct UpdateLocationResponse {
    pub applied: bool,
}

#[derive(Deserialize)]
pub struct RegisterTokenRequest {
    pub token: String,
}

async fn update_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<Json<UpdateLocationResponse>, AppError> {
    let point = payload.location;
    if !(-90.0..=90.0).contains(&point.lat) || !(-180.0..=180.0).contains(&point.lng) {
        return Err(AppError::BadRequest("coordinates out of range".to_string()));
    }

    if !state.tokens.is_live(id) {
        return Err(AppError::BadRequest(
            "courier is not available for location updates".to_string(),
        ));
    }

    let applied = state.geo.upsert(id, point);
    state.metrics.couriers_tracked.set(state.geo.len() as i64);

    Ok(Json(UpdateLocationResponse { applied }))
}

async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourierLocationEntry>, AppError> {
    let entry = state
        .geo
        .latest(id)
        .ok_or_else(|| AppError::NotFound(format!("no location for courier {id}")))?;

    Ok(Json(entry))
}

async fn register_token(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RegisterTokenRequest>,
) -> Result<StatusCode, AppError> {
    if payload.token.trim().is_empty() {
        return Err(AppError::BadRequest("token cannot be empty".to_string()));
    }

    state.tokens.register(Role::Courier, id, payload.token);
    Ok(StatusCode::NO_CONTENT)
}

async fn deregister_token(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    state.tokens.deregister(Role::Courier, id);
    StatusCode::NO_CONTENT
}

#[derive(Serialize)]
pub struct DeliveringResponse {
    pub delivering: bool,
}

async fn is_delivering(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Json<DeliveringResponse> {
    Json(DeliveringResponse {
        delivering: state.gate.is_delivering(id),
    })
}
