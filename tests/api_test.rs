mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use common::{seed_bike, TestApp, COMPANY};

#[tokio::test]
async fn health_reports_database_and_queue() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"], "up");
    assert_eq!(body["queued_jobs"], 0);
}

#[tokio::test]
async fn unknown_documents_are_json_404s() {
    let app = TestApp::new().await;

    let path = format!("/api/v1/production-plans/{}", Uuid::new_v4());
    let (status, body) = app.request(Method::GET, &path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert!(body["message"].as_str().unwrap().contains("Production Plan"));
}

#[tokio::test]
async fn production_plan_is_created_over_http() {
    let app = TestApp::new().await;
    seed_bike(app.db()).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/production-plans",
            Some(json!({
                "company": COMPANY,
                "posting_date": "2024-03-01",
                "from_date": null,
                "to_date": null,
                "customer": null,
                "item_code": null,
                "get_items_from": "Manual",
                "for_warehouse": null,
                "po_items": [
                    { "item_code": "BIKE", "warehouse": "Stores - A", "planned_qty": "3" }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["po_items"][0]["bom_no"], "BOM-BIKE");
    let plan_id = body["id"].as_str().unwrap().to_string();

    let (status, rows) = app
        .request(
            Method::POST,
            &format!("/api/v1/production-plans/{}/sub-assembly-items", plan_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows.as_array().unwrap().len(), 3);
    assert_eq!(rows[0]["production_item"], "WELD-KIT");
}

#[tokio::test]
async fn repost_lifecycle_over_http() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/repost-item-valuations",
            Some(json!({
                "based_on": "ItemAndWarehouse",
                "item_code": "RM-1",
                "warehouse": "Stores - A",
                "voucher_type": null,
                "voucher_no": null,
                "posting_date": "2024-05-01",
                "posting_time": null,
                "company": COMPANY
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/v1/repost-item-valuations/{}/submit", id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Queued");

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/v1/repost-item-valuations/{}/cancel", id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .request(
            Method::GET,
            "/api/v1/stock-settings/pending-reposts?upto=2024-04-30",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = app
        .request(
            Method::GET,
            "/api/v1/stock-settings/pending-reposts?upto=2024-05-31",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/stock-settings/freeze",
            Some(json!({ "stock_frozen_upto": "2024-05-31" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/repost-item-valuations",
            Some(json!({
                "based_on": "ItemAndWarehouse",
                "item_code": "RM-1",
                "warehouse": null,
                "voucher_type": null,
                "voucher_no": null,
                "posting_date": "2024-05-01",
                "posting_time": null,
                "company": COMPANY
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}
