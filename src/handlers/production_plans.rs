use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    dto::production_plan::{
        CreateProductionPlanRequest, GetMaterialRequestItemsRequest, GetSalesOrderItemsRequest,
    },
    errors::ServiceError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/production-plans", post(create_production_plan))
        .route("/production-plans/:id", get(get_production_plan))
        .route("/production-plans/:id/submit", post(submit_production_plan))
        .route("/production-plans/:id/cancel", post(cancel_production_plan))
        .route("/production-plans/:id/open-sales-orders", get(get_open_sales_orders))
        .route("/production-plans/:id/sales-order-items", post(get_so_items))
        .route("/production-plans/:id/material-request-items", post(get_mr_items))
        .route("/production-plans/:id/sub-assembly-items", post(get_sub_assembly_items))
        .route(
            "/production-plans/:id/reconcile-references",
            post(reconcile_references),
        )
        .route(
            "/production-plans/:id/raw-materials",
            post(get_items_for_material_requests),
        )
        .route("/production-plans/:id/work-orders", post(make_work_orders))
        .route(
            "/production-plans/:id/material-requests",
            post(make_material_requests),
        )
        .route("/production-plans/:id/update-status", post(update_status))
}

async fn create_production_plan(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductionPlanRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let plan = state.services.production_plans.create(payload).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

async fn get_production_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.production_plans.get(id).await?))
}

async fn submit_production_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.production_plans.submit(id).await?))
}

async fn cancel_production_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.production_plans.cancel(id).await?))
}

async fn get_open_sales_orders(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(
        state
            .services
            .production_plans
            .get_open_sales_orders(id)
            .await?,
    ))
}

async fn get_so_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GetSalesOrderItemsRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(
        state
            .services
            .production_plans
            .get_so_items(id, payload)
            .await?,
    ))
}

async fn get_mr_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GetMaterialRequestItemsRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(
        state
            .services
            .production_plans
            .get_mr_items(id, payload)
            .await?,
    ))
}

async fn get_sub_assembly_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(
        state
            .services
            .production_plans
            .get_sub_assembly_items(id)
            .await?,
    ))
}

async fn reconcile_references(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(
        state
            .services
            .production_plans
            .reconcile_sub_assembly_references(id)
            .await?,
    ))
}

async fn get_items_for_material_requests(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(
        state
            .services
            .production_plans
            .get_items_for_material_requests(id)
            .await?,
    ))
}

async fn make_work_orders(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.production_plans.make_work_orders(id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn make_material_requests(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state
        .services
        .production_plans
        .make_material_requests(id)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.production_plans.update_status(id).await?))
}
