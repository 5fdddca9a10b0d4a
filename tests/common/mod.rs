#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use erp_rules::{
    build_router,
    config::AppConfig,
    db,
    docstatus::DocStatus,
    entities::{
        bin, bom, bom_item, employee, item, salary_component, salary_component_account,
        salary_structure_assignment, salary_structure_component,
        sales_order::{self, SalesOrderStatus},
        sales_order_item, warehouse,
    },
    events::{self, EventSender, LoggingEventHandler},
    jobs::{InMemoryJobQueue, JobQueue},
    payroll::ComponentType,
    services::factory::ServiceFactory,
    AppState,
};

pub const COMPANY: &str = "Acme Manufacturing";

/// Application wired against a fresh in-memory SQLite database.
pub struct TestApp {
    pub db: Arc<DatabaseConnection>,
    pub factory: ServiceFactory,
    pub state: AppState,
    pub queue: Arc<InMemoryJobQueue>,
    router: Router,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // One connection keeps every query on the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        adjust(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");
        let db = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(
            event_rx,
            vec![Box::new(LoggingEventHandler)],
        ));

        let queue = Arc::new(InMemoryJobQueue::new());
        let job_queue: Arc<dyn JobQueue> = queue.clone();
        let factory = ServiceFactory::new(db.clone(), event_sender, job_queue, Arc::new(cfg));
        let state = AppState::new(&factory, db.clone());
        let router = build_router(state.clone());

        Self {
            db,
            factory,
            state,
            queue,
            router,
            _event_task: event_task,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Sends one request through the router and returns status and JSON body.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json");
        let request = match body {
            Some(json) => builder.body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

pub fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

/// A stock item with no BOM and no ordering minimum.
pub fn item(item_code: &str) -> item::ActiveModel {
    item::ActiveModel {
        item_code: Set(item_code.to_string()),
        item_name: Set(item_code.to_string()),
        stock_uom: Set("Nos".to_string()),
        is_stock_item: Set(true),
        is_sub_contracted_item: Set(false),
        is_customer_provided_item: Set(false),
        variant_of: Set(None),
        default_bom: Set(None),
        default_warehouse: Set(None),
        min_order_qty: Set(Decimal::ZERO),
        disabled: Set(false),
    }
}

pub async fn seed_item(db: &DatabaseConnection, item_code: &str, default_bom: Option<&str>) {
    let mut model = item(item_code);
    model.default_bom = Set(default_bom.map(str::to_string));
    model.insert(db).await.expect("insert item");
}

/// Inserts a submitted, active BOM. Lines are (item, sub-assembly BOM, qty).
pub async fn seed_bom(
    db: &DatabaseConnection,
    name: &str,
    item_code: &str,
    quantity: Decimal,
    lines: &[(&str, Option<&str>, Decimal)],
) {
    bom::ActiveModel {
        name: Set(name.to_string()),
        item: Set(item_code.to_string()),
        company: Set(COMPANY.to_string()),
        quantity: Set(quantity),
        is_active: Set(true),
        is_default: Set(true),
        docstatus: Set(DocStatus::Submitted),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert bom");

    for (position, (component, bom_no, qty)) in lines.iter().enumerate() {
        bom_item::ActiveModel {
            bom: Set(name.to_string()),
            idx: Set(position as i32 + 1),
            item_code: Set(component.to_string()),
            bom_no: Set(bom_no.map(str::to_string)),
            qty: Set(*qty),
            stock_qty: Set(*qty),
            source_warehouse: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert bom item");
    }
}

/// BIKE is built from a FRAME (itself needing a WELD-KIT) and two WHEELs.
///
/// ```text
/// BIKE   <- FRAME x1 (BOM-FRAME), WHEEL x2 (BOM-WHEEL), SEAT x1
/// FRAME  <- TUBE x3, WELD-KIT x1 (BOM-WELD)
/// WHEEL  <- SPOKE x32, RIM x1
/// WELD-KIT <- ROD x2
/// ```
pub async fn seed_bike(db: &DatabaseConnection) {
    seed_item(db, "BIKE", Some("BOM-BIKE")).await;
    seed_item(db, "FRAME", Some("BOM-FRAME")).await;
    seed_item(db, "WHEEL", Some("BOM-WHEEL")).await;
    seed_item(db, "WELD-KIT", Some("BOM-WELD")).await;
    for raw in ["SEAT", "TUBE", "SPOKE", "RIM", "ROD"] {
        seed_item(db, raw, None).await;
    }

    seed_bom(
        db,
        "BOM-BIKE",
        "BIKE",
        dec(1),
        &[
            ("FRAME", Some("BOM-FRAME"), dec(1)),
            ("WHEEL", Some("BOM-WHEEL"), dec(2)),
            ("SEAT", None, dec(1)),
        ],
    )
    .await;
    seed_bom(
        db,
        "BOM-FRAME",
        "FRAME",
        dec(1),
        &[("TUBE", None, dec(3)), ("WELD-KIT", Some("BOM-WELD"), dec(1))],
    )
    .await;
    seed_bom(
        db,
        "BOM-WHEEL",
        "WHEEL",
        dec(1),
        &[("SPOKE", None, dec(32)), ("RIM", None, dec(1))],
    )
    .await;
    seed_bom(db, "BOM-WELD", "WELD-KIT", dec(1), &[("ROD", None, dec(2))]).await;
}

pub async fn seed_warehouse(
    db: &DatabaseConnection,
    name: &str,
    parent: Option<&str>,
    is_group: bool,
) {
    warehouse::ActiveModel {
        name: Set(name.to_string()),
        parent_warehouse: Set(parent.map(str::to_string)),
        is_group: Set(is_group),
        company: Set(COMPANY.to_string()),
    }
    .insert(db)
    .await
    .expect("insert warehouse");
}

pub async fn seed_bin(
    db: &DatabaseConnection,
    item_code: &str,
    warehouse: &str,
    actual_qty: Decimal,
    projected_qty: Decimal,
) {
    bin::ActiveModel {
        item_code: Set(item_code.to_string()),
        warehouse: Set(warehouse.to_string()),
        actual_qty: Set(actual_qty),
        projected_qty: Set(projected_qty),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert bin");
}

/// A submitted sales order open for delivery. Lines are (item, warehouse, qty).
pub async fn seed_sales_order(
    db: &DatabaseConnection,
    name: &str,
    customer: &str,
    transaction_date: NaiveDate,
    lines: &[(&str, &str, Decimal)],
) -> (sales_order::Model, Vec<sales_order_item::Model>) {
    let order = sales_order::ActiveModel {
        name: Set(name.to_string()),
        company: Set(COMPANY.to_string()),
        customer: Set(customer.to_string()),
        transaction_date: Set(transaction_date),
        delivery_date: Set(None),
        status: Set(SalesOrderStatus::ToDeliverAndBill),
        docstatus: Set(DocStatus::Submitted),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert sales order");

    let mut items = Vec::new();
    for (position, (item_code, warehouse, qty)) in lines.iter().enumerate() {
        let line = sales_order_item::ActiveModel {
            sales_order: Set(order.id),
            idx: Set(position as i32 + 1),
            item_code: Set(item_code.to_string()),
            bom_no: Set(None),
            warehouse: Set(warehouse.to_string()),
            qty: Set(*qty),
            work_order_qty: Set(Decimal::ZERO),
            delivery_date: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert sales order item");
        items.push(line);
    }

    (order, items)
}

pub async fn seed_employee(db: &DatabaseConnection, name: &str, status: employee::EmployeeStatus) {
    employee::ActiveModel {
        name: Set(name.to_string()),
        employee_name: Set(format!("Employee {}", name)),
        company: Set(COMPANY.to_string()),
        branch: Set(None),
        department: Set(Some("Assembly".to_string())),
        status: Set(status),
        date_of_joining: Set(d("2020-01-01")),
        relieving_date: Set(None),
    }
    .insert(db)
    .await
    .expect("insert employee");
}

/// A salary component, with a company account unless `with_account` is false.
pub async fn seed_component(
    db: &DatabaseConnection,
    name: &str,
    component_type: ComponentType,
    with_account: bool,
) {
    salary_component::ActiveModel {
        name: Set(name.to_string()),
        component_type: Set(component_type),
    }
    .insert(db)
    .await
    .expect("insert salary component");

    if with_account {
        salary_component_account::ActiveModel {
            id: Set(Uuid::new_v4()),
            salary_component: Set(name.to_string()),
            company: Set(COMPANY.to_string()),
            account: Set(format!("{} - Acme", name)),
        }
        .insert(db)
        .await
        .expect("insert component account");
    }
}

pub async fn seed_structure(db: &DatabaseConnection, structure: &str, lines: &[(&str, Decimal)]) {
    for (position, (component, amount)) in lines.iter().enumerate() {
        salary_structure_component::ActiveModel {
            id: Set(Uuid::new_v4()),
            salary_structure: Set(structure.to_string()),
            idx: Set(position as i32 + 1),
            salary_component: Set(component.to_string()),
            amount: Set(*amount),
        }
        .insert(db)
        .await
        .expect("insert structure component");
    }
}

pub async fn seed_assignment(
    db: &DatabaseConnection,
    employee: &str,
    structure: &str,
    from_date: NaiveDate,
) {
    salary_structure_assignment::ActiveModel {
        id: Set(Uuid::new_v4()),
        employee: Set(employee.to_string()),
        salary_structure: Set(structure.to_string()),
        company: Set(COMPANY.to_string()),
        from_date: Set(from_date),
        currency: Set("USD".to_string()),
        payroll_payable_account: Set(None),
        docstatus: Set(DocStatus::Submitted),
    }
    .insert(db)
    .await
    .expect("insert salary structure assignment");
}
