use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use uuid::Uuid;

use crate::{
    dto::reposting::{
        CreateRepostRequest, FreezeStockRequest, ItemWiseRepostRequest, PendingRepostsQuery,
        RunRepostsRequest,
    },
    errors::ServiceError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/repost-item-valuations", post(create_repost))
        .route("/repost-item-valuations/item-wise", post(create_item_wise))
        .route("/repost-item-valuations/run", post(run_reposts))
        .route("/repost-item-valuations/:id", get(get_repost))
        .route("/repost-item-valuations/:id/submit", post(submit_repost))
        .route("/repost-item-valuations/:id/cancel", post(cancel_repost))
        .route("/stock-settings/freeze", post(freeze_stock))
        .route("/stock-settings/pending-reposts", get(check_pending_reposts))
}

async fn create_repost(
    State(state): State<AppState>,
    Json(payload): Json<CreateRepostRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let entry = state.services.reposting.create(payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn get_repost(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.reposting.get(id).await?))
}

async fn submit_repost(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let policy = state.config.stock_reposting.recency_policy;
    Ok(Json(state.services.reposting.submit(id, policy).await?))
}

async fn cancel_repost(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.reposting.cancel(id).await?))
}

async fn create_item_wise(
    State(state): State<AppState>,
    Json(payload): Json<ItemWiseRepostRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let policy = state.config.stock_reposting.recency_policy;
    let created = state
        .services
        .reposting
        .create_item_wise_repost_entries(payload, policy)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn run_reposts(
    State(state): State<AppState>,
    payload: Option<Json<RunRepostsRequest>>,
) -> Result<impl IntoResponse, ServiceError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let window = state
        .config
        .stock_reposting
        .window()
        .map_err(|e| ServiceError::InternalError(e.to_string()))?;
    let now = request.now.unwrap_or_else(|| Local::now().naive_local());
    Ok(Json(
        state.services.reposting.repost_entries(now, &window).await?,
    ))
}

async fn freeze_stock(
    State(state): State<AppState>,
    Json(payload): Json<FreezeStockRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(
        state
            .services
            .reposting
            .freeze_stock(payload.stock_frozen_upto)
            .await?,
    ))
}

/// 204 when nothing dated on or before `upto` is waiting to be reposted.
async fn check_pending_reposts(
    State(state): State<AppState>,
    Query(query): Query<PendingRepostsQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .reposting
        .check_pending_reposts(query.upto)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
