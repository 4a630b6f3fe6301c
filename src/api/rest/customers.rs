use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::put;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::notify::tokens::Role;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/customers/:id/push-token",
        put(register_token).delete(deregister_token),
    )
}

#[derive(Deserialize)]
pub struct RegisterTokenRequest {
    pub token: String,
}

async fn register_token(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RegisterTokenRequest>,
) -> Result<StatusCode, AppError> {
    if payload.token.trim().is_empty() {
        return Err(AppError::BadRequest("token cannot be empty".to_string()));
    }

    state.tokens.register(Role::Customer, id, payload.token);
    Ok(StatusCode::NO_CONTENT)
}

async fn deregister_token(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    state.tokens.deregister(Role::Customer, id);
    StatusCode::NO_CONTENT
}
