//! ERP document rules
//!
//! Production planning, payroll batch processing and stock valuation
//! reposting, exposed as services over a sea-orm database and an axum API.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod docstatus;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod jobs;
pub mod migrator;
pub mod services;

// Document rules
pub mod manufacturing;
pub mod payroll;
pub mod stock;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::jobs::JobQueue;
use crate::services::factory::{ServiceContainer, ServiceFactory};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<config::AppConfig>,
    pub services: ServiceContainer,
    pub job_queue: Arc<dyn JobQueue>,
}

impl AppState {
    pub fn new(factory: &ServiceFactory, db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            config: factory.config().clone(),
            services: ServiceContainer::new(factory),
            job_queue: factory.job_queue().clone(),
        }
    }
}

/// Full HTTP surface: `/health` plus the document API under `/api/v1`.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", handlers::api_v1_routes())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}
