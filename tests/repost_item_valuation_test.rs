mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{NaiveDateTime, NaiveTime, Weekday};

use common::{d, TestApp, COMPANY};
use erp_rules::{
    docstatus::DocStatus,
    dto::reposting::{CreateRepostRequest, ItemWiseRepostRequest, StockLedgerTouch},
    entities::repost_item_valuation,
    errors::ServiceError,
    services::repost_item_valuation::{RepostItemValuationService, ValuationReposter},
    stock::{RecencyPolicy, RepostBasedOn, RepostStatus, RepostingWindow},
};

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn item_repost(item_code: &str, posting_date: &str, posting_time: NaiveTime) -> CreateRepostRequest {
    CreateRepostRequest {
        based_on: RepostBasedOn::ItemAndWarehouse,
        item_code: Some(item_code.to_string()),
        warehouse: Some("Stores - A".to_string()),
        voucher_type: None,
        voucher_no: None,
        posting_date: d(posting_date),
        posting_time: Some(posting_time),
        company: COMPANY.to_string(),
    }
}

async fn queue(
    reposts: &RepostItemValuationService,
    request: CreateRepostRequest,
) -> repost_item_valuation::Model {
    let entry = reposts.create(request).await.unwrap();
    reposts.submit(entry.id, RecencyPolicy::LatestWins).await.unwrap()
}

fn night_window() -> RepostingWindow {
    RepostingWindow {
        enabled: true,
        start: time(23, 0),
        end: time(9, 0),
        exempt_weekday: None,
    }
}

#[tokio::test]
async fn latest_posting_survives_whatever_the_submission_order() {
    let app = TestApp::new().await;
    let reposts = app.factory.repost_item_valuation_service();

    // Newer posting submitted first.
    let newer = queue(&reposts, item_repost("RM-1", "2024-05-03", time(10, 0))).await;
    let older = queue(&reposts, item_repost("RM-1", "2024-05-01", time(10, 0))).await;
    assert_eq!(reposts.get(newer.id).await.unwrap().status, RepostStatus::Queued);
    assert_eq!(older.status, RepostStatus::Skipped);

    // Older posting submitted first.
    let older = queue(&reposts, item_repost("RM-2", "2024-05-01", time(10, 0))).await;
    let newer = queue(&reposts, item_repost("RM-2", "2024-05-01", time(15, 30))).await;
    assert_eq!(reposts.get(older.id).await.unwrap().status, RepostStatus::Skipped);
    assert_eq!(newer.status, RepostStatus::Queued);
}

#[tokio::test]
async fn earliest_policy_keeps_the_oldest_posting() {
    let app = TestApp::new().await;
    let reposts = app.factory.repost_item_valuation_service();

    let a = reposts
        .create(item_repost("RM-1", "2024-05-03", time(10, 0)))
        .await
        .unwrap();
    let b = reposts
        .create(item_repost("RM-1", "2024-05-01", time(10, 0)))
        .await
        .unwrap();
    reposts.submit(a.id, RecencyPolicy::EarliestWins).await.unwrap();
    reposts.submit(b.id, RecencyPolicy::EarliestWins).await.unwrap();

    assert_eq!(reposts.get(a.id).await.unwrap().status, RepostStatus::Skipped);
    assert_eq!(reposts.get(b.id).await.unwrap().status, RepostStatus::Queued);
}

#[tokio::test]
async fn identical_postings_keep_the_first_submitted() {
    let app = TestApp::new().await;
    let reposts = app.factory.repost_item_valuation_service();

    let first = queue(&reposts, item_repost("RM-1", "2024-05-01", time(8, 0))).await;
    let second = queue(&reposts, item_repost("RM-1", "2024-05-01", time(8, 0))).await;

    assert_eq!(reposts.get(first.id).await.unwrap().status, RepostStatus::Queued);
    assert_eq!(second.status, RepostStatus::Skipped);
}

#[tokio::test]
async fn transaction_reposts_are_never_deduplicated() {
    let app = TestApp::new().await;
    let reposts = app.factory.repost_item_valuation_service();

    let request = CreateRepostRequest {
        based_on: RepostBasedOn::Transaction,
        item_code: None,
        warehouse: None,
        voucher_type: Some("Stock Entry".to_string()),
        voucher_no: Some("STE-0001".to_string()),
        posting_date: d("2024-05-01"),
        posting_time: None,
        company: COMPANY.to_string(),
    };
    let a = queue(&reposts, request.clone()).await;
    let b = queue(&reposts, request).await;

    assert_eq!(a.posting_time, NaiveTime::MIN);
    assert_eq!(reposts.get(a.id).await.unwrap().status, RepostStatus::Queued);
    assert_eq!(b.status, RepostStatus::Queued);
}

#[tokio::test]
async fn transaction_reposts_with_item_fields_stay_out_of_dedup() {
    let app = TestApp::new().await;
    let reposts = app.factory.repost_item_valuation_service();

    let item_wise = queue(&reposts, item_repost("RM-1", "2024-05-03", time(10, 0))).await;
    let voucher = queue(
        &reposts,
        CreateRepostRequest {
            based_on: RepostBasedOn::Transaction,
            voucher_type: Some("Stock Entry".to_string()),
            voucher_no: Some("STE-0002".to_string()),
            ..item_repost("RM-1", "2024-05-01", time(10, 0))
        },
    )
    .await;
    assert_eq!(voucher.status, RepostStatus::Queued);

    // A later item-wise entry only supersedes the earlier item-wise one.
    let newer = queue(&reposts, item_repost("RM-1", "2024-05-04", time(10, 0))).await;
    assert_eq!(newer.status, RepostStatus::Queued);
    assert_eq!(reposts.get(item_wise.id).await.unwrap().status, RepostStatus::Skipped);
    assert_eq!(reposts.get(voucher.id).await.unwrap().status, RepostStatus::Queued);
}

#[tokio::test]
async fn only_skipped_entries_can_be_cancelled() {
    let app = TestApp::new().await;
    let reposts = app.factory.repost_item_valuation_service();

    let kept = queue(&reposts, item_repost("RM-1", "2024-05-03", time(10, 0))).await;
    let skipped = queue(&reposts, item_repost("RM-1", "2024-05-01", time(10, 0))).await;

    assert_matches!(reposts.cancel(kept.id).await, Err(ServiceError::InvalidStatus(_)));

    let cancelled = reposts.cancel(skipped.id).await.unwrap();
    assert_eq!(cancelled.docstatus, DocStatus::Cancelled);
    assert_eq!(cancelled.status, RepostStatus::Skipped);
}

#[tokio::test]
async fn item_wise_entries_cover_each_pair_once() {
    let app = TestApp::new().await;
    let reposts = app.factory.repost_item_valuation_service();
    let stale = queue(&reposts, item_repost("RM-1", "2024-04-20", time(9, 0))).await;

    let touch = |item: &str| StockLedgerTouch {
        item_code: item.to_string(),
        warehouse: "Stores - A".to_string(),
    };
    let created = reposts
        .create_item_wise_repost_entries(
            ItemWiseRepostRequest {
                voucher_type: "Purchase Receipt".to_string(),
                voucher_no: "PR-0007".to_string(),
                posting_date: d("2024-05-02"),
                posting_time: time(11, 0),
                company: COMPANY.to_string(),
                stock_ledger_entries: vec![touch("RM-1"), touch("RM-1"), touch("RM-2")],
            },
            RecencyPolicy::LatestWins,
        )
        .await
        .unwrap();

    let items: Vec<Option<&str>> = created.iter().map(|e| e.item_code.as_deref()).collect();
    assert_eq!(items, vec![Some("RM-1"), Some("RM-2")]);
    assert!(created.iter().all(|e| e.status == RepostStatus::Queued));
    assert!(created.iter().all(|e| e.voucher_no.as_deref() == Some("PR-0007")));
    assert_eq!(reposts.get(stale.id).await.unwrap().status, RepostStatus::Skipped);
}

#[tokio::test]
async fn reposting_waits_for_the_configured_window() {
    let app = TestApp::new().await;
    let reposts = app.factory.repost_item_valuation_service();
    let entry = queue(&reposts, item_repost("RM-1", "2024-05-01", time(10, 0))).await;

    // 2024-05-01 is a Wednesday.
    let summary = reposts
        .repost_entries(at("2024-05-01 12:00"), &night_window())
        .await
        .unwrap();
    assert!(!summary.ran);
    assert_eq!(reposts.get(entry.id).await.unwrap().status, RepostStatus::Queued);

    let summary = reposts
        .repost_entries(at("2024-05-01 23:30"), &night_window())
        .await
        .unwrap();
    assert!(summary.ran);
    assert_eq!(summary.completed, 1);
    assert_eq!(reposts.get(entry.id).await.unwrap().status, RepostStatus::Completed);
}

#[tokio::test]
async fn exempt_weekday_ignores_the_window() {
    let app = TestApp::new().await;
    let reposts = app.factory.repost_item_valuation_service();
    queue(&reposts, item_repost("RM-1", "2024-05-01", time(10, 0))).await;

    let window = RepostingWindow {
        exempt_weekday: Some(Weekday::Sun),
        ..night_window()
    };
    let summary = reposts
        .repost_entries(at("2024-05-05 12:00"), &window)
        .await
        .unwrap();
    assert!(summary.ran);
    assert_eq!(summary.completed, 1);
}

struct FailOn(&'static str);

#[async_trait]
impl ValuationReposter for FailOn {
    async fn repost(&self, entry: &repost_item_valuation::Model) -> Result<(), ServiceError> {
        if entry.item_code.as_deref() == Some(self.0) {
            Err(ServiceError::InternalError("negative stock".to_string()))
        } else {
            Ok(())
        }
    }
}

#[tokio::test]
async fn a_failing_repost_is_logged_and_the_rest_still_run() {
    let app = TestApp::new().await;
    let reposts = app
        .factory
        .repost_item_valuation_service()
        .with_reposter(Arc::new(FailOn("RM-BAD")));
    let bad = queue(&reposts, item_repost("RM-BAD", "2024-05-01", time(10, 0))).await;
    let good = queue(&reposts, item_repost("RM-1", "2024-05-02", time(10, 0))).await;

    let summary = reposts
        .repost_entries(at("2024-05-03 02:00"), &RepostingWindow::default())
        .await
        .unwrap();
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.failed, 1);

    let bad = reposts.get(bad.id).await.unwrap();
    assert_eq!(bad.status, RepostStatus::Failed);
    assert!(bad.error_log.unwrap().contains("negative stock"));
    assert_eq!(reposts.get(good.id).await.unwrap().status, RepostStatus::Completed);

    // Failed entries are not picked up again.
    let summary = reposts
        .repost_entries(at("2024-05-03 03:00"), &RepostingWindow::default())
        .await
        .unwrap();
    assert_eq!(summary.completed + summary.failed, 0);
}

#[tokio::test]
async fn stock_cannot_be_frozen_over_pending_reposts() {
    let app = TestApp::new().await;
    let reposts = app.factory.repost_item_valuation_service();
    queue(&reposts, item_repost("RM-1", "2024-05-01", time(10, 0))).await;

    assert_matches!(
        reposts.freeze_stock(d("2024-05-10")).await,
        Err(ServiceError::PendingReposting(_))
    );
    let settings = reposts.freeze_stock(d("2024-04-30")).await.unwrap();
    assert_eq!(settings.stock_frozen_upto, Some(d("2024-04-30")));

    reposts
        .repost_entries(at("2024-05-10 01:00"), &RepostingWindow::default())
        .await
        .unwrap();
    reposts.check_pending_reposts(d("2024-05-10")).await.unwrap();
    let settings = reposts.freeze_stock(d("2024-05-10")).await.unwrap();
    assert_eq!(settings.stock_frozen_upto, Some(d("2024-05-10")));
}
