use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    docstatus::DocStatus,
    dto::reposting::{CreateRepostRequest, ItemWiseRepostRequest},
    entities::{repost_item_valuation, stock_settings},
    errors::ServiceError,
    events::{Event, EventSender},
    stock::{
        in_configured_timeslot, reposting::deduplicate, RecencyPolicy, RepostBasedOn,
        RepostStatus, RepostingWindow,
    },
};

/// Recomputes valuation for one repost entry.
#[async_trait]
pub trait ValuationReposter: Send + Sync {
    async fn repost(&self, entry: &repost_item_valuation::Model) -> Result<(), ServiceError>;
}

/// Reposter that only records what would be recomputed.
#[derive(Debug, Clone, Default)]
pub struct LoggingReposter;

#[async_trait]
impl ValuationReposter for LoggingReposter {
    async fn repost(&self, entry: &repost_item_valuation::Model) -> Result<(), ServiceError> {
        info!(
            repost_id = %entry.id,
            item_code = ?entry.item_code,
            warehouse = ?entry.warehouse,
            voucher_no = ?entry.voucher_no,
            posting_date = %entry.posting_date,
            "Reposting valuation"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepostRunSummary {
    /// False when the configured window kept the run from starting
    pub ran: bool,
    pub completed: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct RepostItemValuationService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<EventSender>,
    reposter: Arc<dyn ValuationReposter>,
}

impl RepostItemValuationService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<EventSender>) -> Self {
        Self {
            db,
            event_sender,
            reposter: Arc::new(LoggingReposter),
        }
    }

    pub fn with_reposter(mut self, reposter: Arc<dyn ValuationReposter>) -> Self {
        self.reposter = reposter;
        self
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            sender.send_or_log(event).await;
        }
    }

    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        request: CreateRepostRequest,
    ) -> Result<repost_item_valuation::Model, ServiceError> {
        request.validate()?;

        let entry = repost_item_valuation::ActiveModel {
            based_on: Set(request.based_on),
            item_code: Set(request.item_code),
            warehouse: Set(request.warehouse),
            voucher_type: Set(request.voucher_type),
            voucher_no: Set(request.voucher_no),
            posting_date: Set(request.posting_date),
            posting_time: Set(request.posting_time.unwrap_or(NaiveTime::MIN)),
            company: Set(request.company),
            status: Set(RepostStatus::Queued),
            docstatus: Set(DocStatus::Draft),
            error_log: Set(None),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        Ok(entry)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<repost_item_valuation::Model, ServiceError> {
        find_repost(&*self.db, id).await
    }

    /// Submits an entry and then collapses the queue for its item and
    /// warehouse down to one entry.
    #[instrument(skip(self))]
    pub async fn submit(
        &self,
        id: Uuid,
        policy: RecencyPolicy,
    ) -> Result<repost_item_valuation::Model, ServiceError> {
        let db = &*self.db;
        let entry = find_repost(db, id).await?;
        if !entry.docstatus.is_draft() {
            return Err(ServiceError::InvalidStatus(format!(
                "Repost Item Valuation {} is already submitted",
                id
            )));
        }

        let mut active: repost_item_valuation::ActiveModel = entry.into();
        active.docstatus = Set(DocStatus::Submitted);
        active.status = Set(RepostStatus::Queued);
        let entry = active.update(db).await?;

        counter!("repost_item_valuation.queued", 1);
        self.emit(Event::RepostQueued(id)).await;

        if entry.based_on == RepostBasedOn::ItemAndWarehouse {
            if let (Some(item_code), Some(warehouse)) = (&entry.item_code, &entry.warehouse) {
                self.deduplicate_similar_repost(item_code, warehouse, policy)
                    .await?;
            }
        }

        find_repost(db, id).await
    }

    /// Marks every queued item-and-warehouse entry for the pair Skipped except
    /// the one the policy keeps. Transaction reposts are left alone. Returns
    /// the ids that were skipped.
    #[instrument(skip(self))]
    pub async fn deduplicate_similar_repost(
        &self,
        item_code: &str,
        warehouse: &str,
        policy: RecencyPolicy,
    ) -> Result<Vec<Uuid>, ServiceError> {
        let txn = self.db.begin().await?;
        let queued = repost_item_valuation::Entity::find()
            .filter(repost_item_valuation::Column::ItemCode.eq(item_code))
            .filter(repost_item_valuation::Column::Warehouse.eq(warehouse))
            .filter(repost_item_valuation::Column::BasedOn.eq(RepostBasedOn::ItemAndWarehouse))
            .filter(repost_item_valuation::Column::Status.eq(RepostStatus::Queued))
            .filter(repost_item_valuation::Column::Docstatus.eq(DocStatus::Submitted))
            .all(&txn)
            .await?;

        let candidates: Vec<_> = queued.iter().map(|e| e.candidate()).collect();
        let Some(decision) = deduplicate(&candidates, policy) else {
            return Ok(Vec::new());
        };

        let skip: HashSet<Uuid> = decision.skip.iter().copied().collect();
        for entry in queued.into_iter().filter(|e| skip.contains(&e.id)) {
            let mut active: repost_item_valuation::ActiveModel = entry.into();
            active.status = Set(RepostStatus::Skipped);
            active.update(&txn).await?;
        }
        txn.commit().await?;

        if !decision.skip.is_empty() {
            counter!("repost_item_valuation.skipped", decision.skip.len() as u64);
            info!(
                item_code,
                warehouse,
                kept = %decision.keep,
                skipped = decision.skip.len(),
                "Similar reposts skipped"
            );
        }
        for repost_id in &decision.skip {
            self.emit(Event::RepostSkipped {
                repost_id: *repost_id,
                superseded_by: decision.keep,
            })
            .await;
        }

        Ok(decision.skip)
    }

    /// Only skipped entries may be cancelled; anything else is still owed a run.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: Uuid) -> Result<repost_item_valuation::Model, ServiceError> {
        let db = &*self.db;
        let entry = find_repost(db, id).await?;
        if entry.status != RepostStatus::Skipped {
            return Err(ServiceError::InvalidStatus(format!(
                "Cannot cancel Repost Item Valuation {} in status {:?}",
                id, entry.status
            )));
        }

        let mut active: repost_item_valuation::ActiveModel = entry.into();
        active.docstatus = Set(DocStatus::Cancelled);
        Ok(active.update(db).await?)
    }

    /// Queues one submitted repost per distinct (item, warehouse) the voucher
    /// touched, in the order they first appear.
    #[instrument(skip(self, request), fields(voucher_no = %request.voucher_no))]
    pub async fn create_item_wise_repost_entries(
        &self,
        request: ItemWiseRepostRequest,
        policy: RecencyPolicy,
    ) -> Result<Vec<repost_item_valuation::Model>, ServiceError> {
        request.validate()?;

        let mut seen = HashSet::new();
        let pairs: Vec<_> = request
            .stock_ledger_entries
            .iter()
            .filter(|sle| seen.insert((sle.item_code.clone(), sle.warehouse.clone())))
            .cloned()
            .collect();

        let txn = self.db.begin().await?;
        let mut created = Vec::with_capacity(pairs.len());
        for pair in &pairs {
            let entry = repost_item_valuation::ActiveModel {
                based_on: Set(RepostBasedOn::ItemAndWarehouse),
                item_code: Set(Some(pair.item_code.clone())),
                warehouse: Set(Some(pair.warehouse.clone())),
                voucher_type: Set(Some(request.voucher_type.clone())),
                voucher_no: Set(Some(request.voucher_no.clone())),
                posting_date: Set(request.posting_date),
                posting_time: Set(request.posting_time),
                company: Set(request.company.clone()),
                status: Set(RepostStatus::Queued),
                docstatus: Set(DocStatus::Submitted),
                error_log: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            created.push(entry);
        }
        txn.commit().await?;

        counter!("repost_item_valuation.queued", created.len() as u64);
        for entry in &created {
            self.emit(Event::RepostQueued(entry.id)).await;
        }
        for pair in &pairs {
            self.deduplicate_similar_repost(&pair.item_code, &pair.warehouse, policy)
                .await?;
        }

        let ids: Vec<Uuid> = created.iter().map(|e| e.id).collect();
        Ok(repost_item_valuation::Entity::find()
            .filter(repost_item_valuation::Column::Id.is_in(ids))
            .order_by_asc(repost_item_valuation::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Runs every queued repost, oldest posting first, if the window is open.
    #[instrument(skip(self, window))]
    pub async fn repost_entries(
        &self,
        now: chrono::NaiveDateTime,
        window: &RepostingWindow,
    ) -> Result<RepostRunSummary, ServiceError> {
        if !in_configured_timeslot(window, now) {
            info!(%now, "Outside the reposting window, nothing run");
            return Ok(RepostRunSummary::default());
        }

        let db = &*self.db;
        let queued = repost_item_valuation::Entity::find()
            .filter(repost_item_valuation::Column::Status.eq(RepostStatus::Queued))
            .filter(repost_item_valuation::Column::Docstatus.eq(DocStatus::Submitted))
            .order_by_asc(repost_item_valuation::Column::PostingDate)
            .order_by_asc(repost_item_valuation::Column::PostingTime)
            .order_by_asc(repost_item_valuation::Column::CreatedAt)
            .all(db)
            .await?;

        let mut summary = RepostRunSummary {
            ran: true,
            ..Default::default()
        };

        for entry in queued {
            let id = entry.id;
            let mut active: repost_item_valuation::ActiveModel = entry.into();
            active.status = Set(RepostStatus::InProgress);
            let entry = active.update(db).await?;

            let result = self.reposter.repost(&entry).await;
            let mut active: repost_item_valuation::ActiveModel = entry.into();
            match result {
                Ok(()) => {
                    active.status = Set(RepostStatus::Completed);
                    active.error_log = Set(None);
                    active.update(db).await?;
                    summary.completed += 1;
                    counter!("repost_item_valuation.completed", 1);
                    self.emit(Event::RepostCompleted(id)).await;
                }
                Err(e) => {
                    error!(repost_id = %id, "Reposting failed: {}", e);
                    let message = e.to_string();
                    active.status = Set(RepostStatus::Failed);
                    active.error_log = Set(Some(message.clone()));
                    active.update(db).await?;
                    summary.failed += 1;
                    counter!("repost_item_valuation.failed", 1);
                    self.emit(Event::RepostFailed {
                        repost_id: id,
                        error: message,
                    })
                    .await;
                }
            }
        }

        Ok(summary)
    }

    /// Fails while reposts posted on or before `upto` are still pending.
    pub async fn check_pending_reposts(&self, upto: NaiveDate) -> Result<(), ServiceError> {
        pending_reposts_guard(&*self.db, upto).await
    }

    /// Freezes stock up to `upto`; refused while reposts for that range are pending.
    #[instrument(skip(self))]
    pub async fn freeze_stock(
        &self,
        upto: NaiveDate,
    ) -> Result<stock_settings::Model, ServiceError> {
        let txn = self.db.begin().await?;
        pending_reposts_guard(&txn, upto).await?;

        let settings = match stock_settings::Entity::find_by_id(1).one(&txn).await? {
            Some(existing) => {
                let mut active: stock_settings::ActiveModel = existing.into();
                active.stock_frozen_upto = Set(Some(upto));
                active.update(&txn).await?
            }
            None => {
                stock_settings::ActiveModel {
                    id: Set(1),
                    stock_frozen_upto: Set(Some(upto)),
                }
                .insert(&txn)
                .await?
            }
        };
        txn.commit().await?;

        info!(%upto, "Stock frozen");
        Ok(settings)
    }
}

async fn pending_reposts_guard<C: ConnectionTrait>(
    conn: &C,
    upto: NaiveDate,
) -> Result<(), ServiceError> {
    let pending = repost_item_valuation::Entity::find()
        .filter(
            repost_item_valuation::Column::Status
                .is_in([RepostStatus::Queued, RepostStatus::InProgress]),
        )
        .filter(repost_item_valuation::Column::Docstatus.eq(DocStatus::Submitted))
        .filter(repost_item_valuation::Column::PostingDate.lte(upto))
        .count(conn)
        .await?;

    if pending > 0 {
        warn!(%upto, pending, "Reposting still pending");
        return Err(ServiceError::PendingReposting(format!(
            "{} item valuation repost(s) dated on or before {} are still pending",
            pending, upto
        )));
    }
    Ok(())
}

async fn find_repost<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<repost_item_valuation::Model, ServiceError> {
    repost_item_valuation::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Repost Item Valuation", id))
}
