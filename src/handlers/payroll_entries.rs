use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::payroll::{CreatePayrollEntryRequest, PayrollRunRequest},
    errors::ServiceError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payroll-entries", post(create_payroll_entry))
        .route("/payroll-entries/:id", get(get_payroll_entry))
        .route("/payroll-entries/:id/employees", post(fill_employee_details))
        .route("/payroll-entries/:id/submit", post(submit_payroll_entry))
        .route("/payroll-entries/:id/salary-slips", post(create_salary_slips))
        .route(
            "/payroll-entries/:id/salary-slips/submit",
            post(submit_salary_slips),
        )
        .route("/payroll-entries/:id/payment-entry", post(make_payment_entry))
        .route("/payroll-entries/:id/cancel", post(cancel_payroll_entry))
}

async fn create_payroll_entry(
    State(state): State<AppState>,
    Json(payload): Json<CreatePayrollEntryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let entry = state.services.payroll_entries.create(payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn get_payroll_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.payroll_entries.get(id).await?))
}

async fn fill_employee_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(
        state
            .services
            .payroll_entries
            .fill_employee_details(id)
            .await?,
    ))
}

/// Body is optional; an empty one runs with the configured defaults.
async fn submit_payroll_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Option<Json<PayrollRunRequest>>,
) -> Result<impl IntoResponse, ServiceError> {
    let service = &state.services.payroll_entries;
    let options = run_options(payload, service.defaults())?;
    Ok(Json(service.submit(id, options).await?))
}

/// Retries slip creation for employees that have no slip yet.
async fn create_salary_slips(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(
        state
            .services
            .payroll_entries
            .create_salary_slips(id)
            .await?,
    ))
}

async fn submit_salary_slips(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Option<Json<PayrollRunRequest>>,
) -> Result<impl IntoResponse, ServiceError> {
    let service = &state.services.payroll_entries;
    let options = run_options(payload, service.defaults())?;
    Ok(Json(service.submit_salary_slips(id, options).await?))
}

async fn make_payment_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.payroll_entries.make_payment_entry(id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn cancel_payroll_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.payroll_entries.cancel(id).await?))
}

fn run_options(
    payload: Option<Json<PayrollRunRequest>>,
    defaults: crate::payroll::PayrollRunOptions,
) -> Result<crate::payroll::PayrollRunOptions, ServiceError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    request.validate()?;
    Ok(request.resolve(defaults))
}
