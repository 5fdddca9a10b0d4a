use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DatabaseTransaction, EntityTrait,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    docstatus::DocStatus,
    dto::work_order::{CreateWorkOrderRequest, RecordProductionRequest},
    entities::{
        production_plan_item, production_plan_sub_assembly_item,
        work_order::{self, WorkOrderStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    manufacturing::progress::{check_overproduction, overproduction_limit},
    services::production_plan::{refresh_plan_row, refresh_plan_status, refresh_sub_assembly_row},
};

/// Work orders and the production plan quantities they drive
#[derive(Clone)]
pub struct WorkOrderService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<EventSender>,
    overproduction_percentage: Decimal,
}

impl WorkOrderService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: Option<EventSender>,
        overproduction_percentage: Decimal,
    ) -> Self {
        Self {
            db,
            event_sender,
            overproduction_percentage,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            sender.send_or_log(event).await;
        }
    }

    #[instrument(skip(self, request), fields(item = %request.production_item))]
    pub async fn create(
        &self,
        request: CreateWorkOrderRequest,
    ) -> Result<work_order::Model, ServiceError> {
        request.validate()?;

        let wo = work_order::ActiveModel {
            company: Set(request.company),
            production_item: Set(request.production_item),
            bom_no: Set(request.bom_no),
            qty: Set(request.qty),
            fg_warehouse: Set(request.fg_warehouse),
            planned_start_date: Set(request.planned_start_date),
            production_plan: Set(None),
            production_plan_item: Set(None),
            production_plan_sub_assembly_item: Set(None),
            sales_order: Set(request.sales_order),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        counter!("work_order.created", 1);
        self.emit(Event::WorkOrderCreated {
            work_order_id: wo.id,
            item_code: wo.production_item.clone(),
            quantity: wo.qty,
        })
        .await;

        Ok(wo)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, work_order_id: Uuid) -> Result<work_order::Model, ServiceError> {
        find_work_order(&*self.db, work_order_id).await
    }

    /// Submits a work order. Work orders raised from a plan may not take the
    /// row past its planned quantity plus the overproduction allowance.
    #[instrument(skip(self))]
    pub async fn submit(&self, work_order_id: Uuid) -> Result<work_order::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let wo = find_work_order(&txn, work_order_id).await?;
        if !wo.docstatus.is_draft() {
            return Err(ServiceError::InvalidStatus(format!(
                "Work Order {} is already submitted or cancelled",
                work_order_id
            )));
        }

        if let Some(row_id) = wo.production_plan_item {
            if let Some(row) = production_plan_item::Entity::find_by_id(row_id)
                .one(&txn)
                .await?
            {
                check_overproduction(
                    row.planned_qty,
                    row.ordered_qty,
                    wo.qty,
                    self.overproduction_percentage,
                )?;
            }
        }
        if let Some(sub_id) = wo.production_plan_sub_assembly_item {
            if let Some(sub) = production_plan_sub_assembly_item::Entity::find_by_id(sub_id)
                .one(&txn)
                .await?
            {
                check_overproduction(
                    sub.qty,
                    sub.ordered_qty,
                    wo.qty,
                    self.overproduction_percentage,
                )?;
            }
        }

        let mut active: work_order::ActiveModel = wo.into();
        active.docstatus = Set(DocStatus::Submitted);
        active.status = Set(WorkOrderStatus::NotStarted);
        let wo = active.update(&txn).await?;

        let change = propagate_to_plan(&txn, &wo).await?;
        txn.commit().await?;

        counter!("work_order.submitted", 1);
        info!(work_order_id = %work_order_id, qty = %wo.qty, "Work order submitted");
        self.emit(Event::WorkOrderSubmitted(work_order_id)).await;
        if let Some(event) = change {
            self.emit(event).await;
        }

        Ok(wo)
    }

    /// Cancels a submitted work order that has produced nothing yet; the plan
    /// row's ordered quantity drops by exactly this order's quantity.
    #[instrument(skip(self))]
    pub async fn cancel(&self, work_order_id: Uuid) -> Result<work_order::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let wo = find_work_order(&txn, work_order_id).await?;
        if !wo.docstatus.is_submitted() {
            return Err(ServiceError::InvalidStatus(format!(
                "Only submitted work orders can be cancelled, {} is not",
                work_order_id
            )));
        }
        if wo.produced_qty > Decimal::ZERO {
            return Err(ServiceError::InvalidOperation(format!(
                "Work Order {} has already produced {}",
                work_order_id, wo.produced_qty
            )));
        }

        let mut active: work_order::ActiveModel = wo.into();
        active.docstatus = Set(DocStatus::Cancelled);
        active.status = Set(WorkOrderStatus::Cancelled);
        let wo = active.update(&txn).await?;

        let change = propagate_to_plan(&txn, &wo).await?;
        txn.commit().await?;

        counter!("work_order.cancelled", 1);
        self.emit(Event::WorkOrderCancelled(work_order_id)).await;
        if let Some(event) = change {
            self.emit(event).await;
        }

        Ok(wo)
    }

    /// Books finished goods against a submitted work order.
    #[instrument(skip(self, request))]
    pub async fn record_production(
        &self,
        work_order_id: Uuid,
        request: RecordProductionRequest,
    ) -> Result<work_order::Model, ServiceError> {
        request.validate()?;

        let txn = self.db.begin().await?;
        let wo = find_work_order(&txn, work_order_id).await?;
        if !wo.docstatus.is_submitted() {
            return Err(ServiceError::InvalidStatus(format!(
                "Work Order {} must be submitted before recording production",
                work_order_id
            )));
        }

        let produced = wo.produced_qty + request.qty;
        let limit = overproduction_limit(wo.qty, self.overproduction_percentage);
        if produced > limit {
            return Err(ServiceError::OverProduction(format!(
                "Work Order {} can produce at most {}, {} requested in total",
                work_order_id, limit, produced
            )));
        }

        let status = WorkOrderStatus::for_progress(wo.qty, produced);
        let mut active: work_order::ActiveModel = wo.into();
        active.produced_qty = Set(produced);
        active.status = Set(status);
        let wo = active.update(&txn).await?;

        let change = propagate_to_plan(&txn, &wo).await?;
        txn.commit().await?;

        counter!("work_order.production_recorded", 1);
        self.emit(Event::ProductionRecorded {
            work_order_id,
            quantity: request.qty,
        })
        .await;
        if let Some(event) = change {
            self.emit(event).await;
        }

        Ok(wo)
    }
}

async fn find_work_order<C: sea_orm::ConnectionTrait>(
    conn: &C,
    work_order_id: Uuid,
) -> Result<work_order::Model, ServiceError> {
    work_order::Entity::find_by_id(work_order_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Work Order", work_order_id))
}

/// Recomputes the plan rows this work order counts against, then the plan.
async fn propagate_to_plan(
    txn: &DatabaseTransaction,
    wo: &work_order::Model,
) -> Result<Option<Event>, ServiceError> {
    if let Some(row_id) = wo.production_plan_item {
        refresh_plan_row(txn, row_id).await?;
    }
    if let Some(sub_id) = wo.production_plan_sub_assembly_item {
        refresh_sub_assembly_row(txn, sub_id).await?;
    }

    let Some(plan_id) = wo.production_plan else {
        return Ok(None);
    };
    let (_, change) = refresh_plan_status(txn, plan_id).await?;
    Ok(change.map(|(old, new)| Event::ProductionPlanStatusChanged {
        plan_id,
        old_status: old.as_str().to_string(),
        new_status: new.as_str().to_string(),
    }))
}
