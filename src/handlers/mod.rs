pub mod health;
pub mod payroll_entries;
pub mod production_plans;
pub mod repost_item_valuations;
pub mod work_orders;

use axum::Router;

use crate::AppState;

/// Every document route, to be nested under `/api/v1`.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(production_plans::routes())
        .merge(work_orders::routes())
        .merge(payroll_entries::routes())
        .merge(repost_item_valuations::routes())
}
