use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    dto::work_order::{CreateWorkOrderRequest, RecordProductionRequest},
    errors::ServiceError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/work-orders", post(create_work_order))
        .route("/work-orders/:id", get(get_work_order))
        .route("/work-orders/:id/submit", post(submit_work_order))
        .route("/work-orders/:id/cancel", post(cancel_work_order))
        .route("/work-orders/:id/production", post(record_production))
}

async fn create_work_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateWorkOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let wo = state.services.work_orders.create(payload).await?;
    Ok((StatusCode::CREATED, Json(wo)))
}

async fn get_work_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.work_orders.get(id).await?))
}

async fn submit_work_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.work_orders.submit(id).await?))
}

async fn cancel_work_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.work_orders.cancel(id).await?))
}

async fn record_production(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordProductionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(
        state
            .services
            .work_orders
            .record_production(id, payload)
            .await?,
    ))
}
