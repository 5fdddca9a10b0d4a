use chrono::NaiveDate;
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    docstatus::DocStatus,
    dto::production_plan::{
        CreateProductionPlanRequest, GetMaterialRequestItemsRequest, GetSalesOrderItemsRequest,
        ProductionPlanDocument,
    },
    entities::{
        bin, bom, bom_item, item,
        material_request::{self, MaterialRequestPurpose},
        material_request_item, material_request_plan_item, production_plan, production_plan_item,
        production_plan_item_reference, production_plan_sub_assembly_item,
        sales_order::{self, SalesOrderStatus},
        sales_order_item, warehouse,
        work_order,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    manufacturing::{
        bom_tree::{BomCatalog, BomLine, BomNode, ExplosionDepth},
        material_planning::{explode_raw_materials, net_requirements, StockPosition},
        progress::{derive_status, distribute_ordered, pending_qty, RowProgress},
        references::{reconcile_references, IdentityMap, ProvisionalKey, ReconciliationReport, RowRef},
        sub_assembly::{plan_sub_assemblies, FinishedGoodDemand, SubAssemblyRow},
        warehouses::{WarehouseNode, WarehouseTree},
        ManufacturingType, MaterialRequestLine, ProductionPlanStatus,
    },
};

/// Lifecycle and planning operations of production plans
#[derive(Clone)]
pub struct ProductionPlanService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<EventSender>,
}

/// A finished-good row that is about to be written, keyed locally.
struct NewPlanRow {
    key: ProvisionalKey,
    item_code: String,
    bom_no: String,
    warehouse: String,
    planned_qty: Decimal,
    planned_start_date: NaiveDate,
    use_multi_level_bom: bool,
    sales_order: Option<Uuid>,
    sales_order_item: Option<Uuid>,
    material_request: Option<Uuid>,
    material_request_item: Option<Uuid>,
}

struct NewReference {
    row: ProvisionalKey,
    sales_order: Uuid,
    sales_order_item: Uuid,
    qty: Decimal,
}

impl ProductionPlanService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            sender.send_or_log(event).await;
        }
    }

    /// Saves a draft plan with its finished-good and sub-assembly rows.
    ///
    /// Sub-assembly rows point at finished-good rows by position; those
    /// positions are resolved to row ids once the finished goods are saved.
    /// A position with no matching row leaves the reference empty.
    #[instrument(skip(self, request), fields(company = %request.company))]
    pub async fn create(
        &self,
        request: CreateProductionPlanRequest,
    ) -> Result<ProductionPlanDocument, ServiceError> {
        request.validate()?;

        let txn = self.db.begin().await?;
        let catalog = load_catalog(&txn).await?;

        let plan = production_plan::ActiveModel {
            company: Set(request.company.clone()),
            posting_date: Set(request.posting_date),
            from_date: Set(request.from_date),
            to_date: Set(request.to_date),
            customer: Set(request.customer.clone()),
            item_code: Set(request.item_code.clone()),
            get_items_from: Set(request.get_items_from),
            combine_items: Set(request.combine_items),
            combine_sub_items: Set(request.combine_sub_items),
            ignore_existing_ordered_qty: Set(request.ignore_existing_ordered_qty),
            include_non_stock_items: Set(request.include_non_stock_items),
            include_subcontracted_items: Set(request.include_subcontracted_items),
            for_warehouse: Set(request.for_warehouse.clone()),
            status: Set(ProductionPlanStatus::Draft),
            docstatus: Set(DocStatus::Draft),
            total_planned_qty: Set(Decimal::ZERO),
            total_produced_qty: Set(Decimal::ZERO),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut rows = Vec::with_capacity(request.po_items.len());
        for (position, input) in request.po_items.iter().enumerate() {
            let bom_no = resolve_bom(&catalog, &input.item_code, input.bom_no.as_deref())?;
            rows.push(NewPlanRow {
                key: ProvisionalKey(position as u32),
                item_code: input.item_code.clone(),
                bom_no,
                warehouse: input.warehouse.clone(),
                planned_qty: input.planned_qty,
                planned_start_date: input.planned_start_date.unwrap_or(plan.posting_date),
                use_multi_level_bom: input.use_multi_level_bom,
                sales_order: None,
                sales_order_item: None,
                material_request: None,
                material_request_item: None,
            });
        }

        let identity = persist_plan_rows(&txn, plan.id, rows, Vec::new()).await?;

        let mut sub_rows: Vec<SubAssemblyRow> = request
            .sub_assembly_items
            .iter()
            .map(|input| SubAssemblyRow {
                parent_row: input
                    .parent_row
                    .map(|position| RowRef::Provisional(ProvisionalKey(position))),
                parent_item_code: input.parent_item_code.clone(),
                production_item: input.production_item.clone(),
                bom_no: input.bom_no.clone(),
                bom_level: input.bom_level,
                indent: input.bom_level,
                qty: input.qty,
                fg_warehouse: input.fg_warehouse.clone(),
                type_of_manufacturing: input.type_of_manufacturing,
                schedule_date: input.schedule_date,
            })
            .collect();

        let report = reconcile_references(&mut sub_rows, &identity, &identity.durable_ids());
        if report.nulled > 0 {
            warn!(
                plan_id = %plan.id,
                orphaned = report.nulled,
                "Sub-assembly rows refer to finished goods that do not exist"
            );
        }
        insert_sub_assembly_rows(&txn, plan.id, &sub_rows).await?;

        let document = load_document(&txn, plan.id).await?;
        txn.commit().await?;

        counter!("production_plan.created", 1);
        info!(plan_id = %plan.id, rows = document.po_items.len(), "Production plan created");
        self.emit(Event::ProductionPlanCreated(plan.id)).await;

        Ok(document)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, plan_id: Uuid) -> Result<ProductionPlanDocument, ServiceError> {
        load_document(&*self.db, plan_id).await
    }

    /// Submitted, open sales orders matching the plan filters that still
    /// have quantity without a work order.
    #[instrument(skip(self))]
    pub async fn get_open_sales_orders(
        &self,
        plan_id: Uuid,
    ) -> Result<Vec<sales_order::Model>, ServiceError> {
        let db = &*self.db;
        let plan = find_plan(db, plan_id).await?;

        let mut query = sales_order::Entity::find()
            .filter(sales_order::Column::Company.eq(plan.company.clone()))
            .filter(sales_order::Column::Docstatus.eq(DocStatus::Submitted))
            .filter(sales_order::Column::Status.eq(SalesOrderStatus::ToDeliverAndBill));
        if let Some(from) = plan.from_date {
            query = query.filter(sales_order::Column::TransactionDate.gte(from));
        }
        if let Some(to) = plan.to_date {
            query = query.filter(sales_order::Column::TransactionDate.lte(to));
        }
        if let Some(customer) = plan.customer.clone().filter(|c| !c.is_empty()) {
            query = query.filter(sales_order::Column::Customer.eq(customer));
        }

        let orders = query
            .order_by_asc(sales_order::Column::TransactionDate)
            .all(db)
            .await?;
        if orders.is_empty() {
            return Ok(orders);
        }

        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let lines = sales_order_item::Entity::find()
            .filter(sales_order_item::Column::SalesOrder.is_in(ids))
            .all(db)
            .await?;

        let with_pending: HashSet<Uuid> = lines
            .iter()
            .filter(|line| line.pending_qty() > Decimal::ZERO)
            .filter(|line| matches_item_filter(&plan, &line.item_code))
            .map(|line| line.sales_order)
            .collect();

        Ok(orders
            .into_iter()
            .filter(|o| with_pending.contains(&o.id))
            .collect())
    }

    /// Replaces the plan's finished-good rows with the pending lines of the
    /// given sales orders.
    ///
    /// With `combine_items`, lines sharing item, BOM and warehouse become one
    /// row and each sales-order line is kept as a reference on it.
    #[instrument(skip(self, request))]
    pub async fn get_so_items(
        &self,
        plan_id: Uuid,
        request: GetSalesOrderItemsRequest,
    ) -> Result<ProductionPlanDocument, ServiceError> {
        request.validate()?;

        let txn = self.db.begin().await?;
        let plan = find_plan(&txn, plan_id).await?;
        ensure_draft(&plan)?;

        let orders = sales_order::Entity::find()
            .filter(sales_order::Column::Id.is_in(request.sales_orders.clone()))
            .all(&txn)
            .await?;
        for order in &orders {
            if !order.docstatus.is_submitted() || !order.status.is_open() {
                return Err(ServiceError::ValidationError(format!(
                    "Sales Order {} is not open for production",
                    order.name
                )));
            }
        }
        if orders.len() != request.sales_orders.len() {
            let found: HashSet<Uuid> = orders.iter().map(|o| o.id).collect();
            if let Some(missing) = request.sales_orders.iter().find(|id| !found.contains(id)) {
                return Err(ServiceError::not_found("Sales Order", missing));
            }
        }

        let catalog = load_catalog(&txn).await?;
        let lines = sales_order_item::Entity::find()
            .filter(sales_order_item::Column::SalesOrder.is_in(request.sales_orders.clone()))
            .order_by_asc(sales_order_item::Column::SalesOrder)
            .order_by_asc(sales_order_item::Column::Idx)
            .all(&txn)
            .await?;

        let mut rows: Vec<NewPlanRow> = Vec::new();
        let mut references: Vec<NewReference> = Vec::new();
        let mut groups: HashMap<(String, String, String), ProvisionalKey> = HashMap::new();

        for line in lines {
            let qty = line.pending_qty();
            if qty <= Decimal::ZERO || !matches_item_filter(&plan, &line.item_code) {
                continue;
            }
            let bom_no = match resolve_bom(&catalog, &line.item_code, line.bom_no.as_deref()) {
                Ok(bom_no) => bom_no,
                Err(e) => {
                    warn!(item_code = %line.item_code, "Skipping sales order line: {}", e);
                    continue;
                }
            };

            if plan.combine_items {
                let group = (line.item_code.clone(), bom_no.clone(), line.warehouse.clone());
                let key = match groups.get(&group) {
                    Some(key) => {
                        if let Some(row) = rows.iter_mut().find(|r| r.key == *key) {
                            row.planned_qty += qty;
                        }
                        *key
                    }
                    None => {
                        let key = ProvisionalKey(rows.len() as u32);
                        groups.insert(group, key);
                        rows.push(NewPlanRow {
                            key,
                            item_code: line.item_code.clone(),
                            bom_no,
                            warehouse: line.warehouse.clone(),
                            planned_qty: qty,
                            planned_start_date: plan.posting_date,
                            use_multi_level_bom: true,
                            sales_order: None,
                            sales_order_item: None,
                            material_request: None,
                            material_request_item: None,
                        });
                        key
                    }
                };
                references.push(NewReference {
                    row: key,
                    sales_order: line.sales_order,
                    sales_order_item: line.id,
                    qty,
                });
            } else {
                rows.push(NewPlanRow {
                    key: ProvisionalKey(rows.len() as u32),
                    item_code: line.item_code.clone(),
                    bom_no,
                    warehouse: line.warehouse.clone(),
                    planned_qty: qty,
                    planned_start_date: plan.posting_date,
                    use_multi_level_bom: true,
                    sales_order: Some(line.sales_order),
                    sales_order_item: Some(line.id),
                    material_request: None,
                    material_request_item: None,
                });
            }
        }

        if rows.is_empty() {
            return Err(ServiceError::ValidationError(
                "Selected sales orders have no items pending production".to_string(),
            ));
        }

        replace_plan_rows(&txn, &plan, rows, references).await?;
        let document = load_document(&txn, plan_id).await?;
        txn.commit().await?;

        info!(plan_id = %plan_id, rows = document.po_items.len(), "Pulled sales order items");
        Ok(document)
    }

    /// Replaces the plan's finished-good rows with the pending lines of
    /// submitted manufacture material requests.
    #[instrument(skip(self, request))]
    pub async fn get_mr_items(
        &self,
        plan_id: Uuid,
        request: GetMaterialRequestItemsRequest,
    ) -> Result<ProductionPlanDocument, ServiceError> {
        request.validate()?;

        let txn = self.db.begin().await?;
        let plan = find_plan(&txn, plan_id).await?;
        ensure_draft(&plan)?;

        let requests = material_request::Entity::find()
            .filter(material_request::Column::Id.is_in(request.material_requests.clone()))
            .all(&txn)
            .await?;
        for mr in &requests {
            if !mr.docstatus.is_submitted()
                || mr.material_request_type != MaterialRequestPurpose::Manufacture
            {
                return Err(ServiceError::ValidationError(format!(
                    "Material Request {} is not a submitted manufacture request",
                    mr.id
                )));
            }
        }
        if requests.len() != request.material_requests.len() {
            return Err(ServiceError::NotFound(
                "One or more material requests were not found".to_string(),
            ));
        }

        let catalog = load_catalog(&txn).await?;
        let lines = material_request_item::Entity::find()
            .filter(
                material_request_item::Column::MaterialRequest
                    .is_in(request.material_requests.clone()),
            )
            .order_by_asc(material_request_item::Column::MaterialRequest)
            .order_by_asc(material_request_item::Column::Idx)
            .all(&txn)
            .await?;

        let mut rows = Vec::new();
        for line in lines {
            let qty = line.pending_qty();
            if qty <= Decimal::ZERO {
                continue;
            }
            let bom_no = match resolve_bom(&catalog, &line.item_code, line.bom_no.as_deref()) {
                Ok(bom_no) => bom_no,
                Err(e) => {
                    warn!(item_code = %line.item_code, "Skipping material request line: {}", e);
                    continue;
                }
            };
            rows.push(NewPlanRow {
                key: ProvisionalKey(rows.len() as u32),
                item_code: line.item_code.clone(),
                bom_no,
                warehouse: line.warehouse.clone(),
                planned_qty: qty,
                planned_start_date: line.schedule_date.max(plan.posting_date),
                use_multi_level_bom: true,
                sales_order: line.sales_order,
                sales_order_item: None,
                material_request: Some(line.material_request),
                material_request_item: Some(line.id),
            });
        }

        if rows.is_empty() {
            return Err(ServiceError::ValidationError(
                "Selected material requests have no pending items".to_string(),
            ));
        }

        replace_plan_rows(&txn, &plan, rows, Vec::new()).await?;
        let document = load_document(&txn, plan_id).await?;
        txn.commit().await?;

        Ok(document)
    }

    /// Rebuilds the sub-assembly rows from the finished-good rows.
    #[instrument(skip(self))]
    pub async fn get_sub_assembly_items(
        &self,
        plan_id: Uuid,
    ) -> Result<Vec<production_plan_sub_assembly_item::Model>, ServiceError> {
        let txn = self.db.begin().await?;
        let plan = find_plan(&txn, plan_id).await?;
        ensure_draft(&plan)?;

        let catalog = load_catalog(&txn).await?;
        let po_items = plan_items(&txn, plan_id).await?;
        let demands: Vec<FinishedGoodDemand> = po_items.iter().map(demand_for).collect();

        let mut rows = plan_sub_assemblies(&catalog, &demands, plan.combine_sub_items)?;
        let live: HashSet<Uuid> = po_items.iter().map(|r| r.id).collect();
        let report = reconcile_references(&mut rows, &IdentityMap::new(), &live);

        production_plan_sub_assembly_item::Entity::delete_many()
            .filter(production_plan_sub_assembly_item::Column::ProductionPlan.eq(plan_id))
            .exec(&txn)
            .await?;
        insert_sub_assembly_rows(&txn, plan_id, &rows).await?;

        let saved = sub_assembly_rows(&txn, plan_id).await?;
        txn.commit().await?;

        info!(plan_id = %plan_id, rows = saved.len(), "Sub-assembly rows planned");
        self.emit(Event::SubAssembliesPlanned {
            plan_id,
            rows: saved.len(),
            orphaned_references: report.nulled,
        })
        .await;

        Ok(saved)
    }

    /// Re-points persisted sub-assembly rows at live finished-good rows,
    /// clearing references to rows that no longer exist.
    #[instrument(skip(self))]
    pub async fn reconcile_sub_assembly_references(
        &self,
        plan_id: Uuid,
    ) -> Result<ReconciliationReport, ServiceError> {
        let txn = self.db.begin().await?;
        find_plan(&txn, plan_id).await?;
        let report = reconcile_persisted_sub_assemblies(&txn, plan_id).await?;
        txn.commit().await?;
        Ok(report)
    }

    /// Computes the raw materials to request for the plan and stores them
    /// as the plan's material request rows.
    #[instrument(skip(self))]
    pub async fn get_items_for_material_requests(
        &self,
        plan_id: Uuid,
    ) -> Result<Vec<material_request_plan_item::Model>, ServiceError> {
        let txn = self.db.begin().await?;
        let plan = find_plan(&txn, plan_id).await?;
        if plan.docstatus.is_cancelled() {
            return Err(ServiceError::InvalidStatus(format!(
                "Production Plan {} is cancelled",
                plan_id
            )));
        }

        let catalog = load_catalog(&txn).await?;
        let options = plan.material_plan_options();
        let po_items = plan_items(&txn, plan_id).await?;

        let mut needs = Vec::new();
        for row in &po_items {
            needs.extend(explode_raw_materials(&catalog, &demand_for(row), &options)?);
        }

        let keys: Vec<(String, String)> = needs
            .iter()
            .map(|n| (n.item_code.clone(), n.warehouse.clone()))
            .collect();
        let stock = stock_positions(&txn, &keys).await?;
        let lines = net_requirements(&needs, &catalog, &stock, &options);

        material_request_plan_item::Entity::delete_many()
            .filter(material_request_plan_item::Column::ProductionPlan.eq(plan_id))
            .exec(&txn)
            .await?;
        insert_material_plan_rows(&txn, plan_id, &lines).await?;

        let saved = material_request_plan_item::Entity::find()
            .filter(material_request_plan_item::Column::ProductionPlan.eq(plan_id))
            .order_by_asc(material_request_plan_item::Column::Idx)
            .all(&txn)
            .await?;
        txn.commit().await?;

        info!(plan_id = %plan_id, lines = saved.len(), "Material requirements planned");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn submit(&self, plan_id: Uuid) -> Result<production_plan::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let plan = find_plan(&txn, plan_id).await?;
        ensure_draft(&plan)?;

        let rows = plan_items(&txn, plan_id).await?;
        if rows.is_empty() {
            return Err(ServiceError::ValidationError(
                "Production Plan has no items to manufacture".to_string(),
            ));
        }
        for row in &rows {
            if row.planned_qty <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(format!(
                    "Row {}: planned quantity must be greater than zero",
                    row.idx
                )));
            }
        }

        let total_planned: Decimal = rows.iter().map(|r| r.planned_qty).sum();
        for row in rows {
            if let Some(mr_item) = row.material_request_item {
                adjust_material_request_ordered(&txn, mr_item, row.planned_qty).await?;
            }
            let pending = pending_qty(row.planned_qty, row.ordered_qty);
            let mut active: production_plan_item::ActiveModel = row.into();
            active.pending_qty = Set(pending);
            active.update(&txn).await?;
        }

        let mut active: production_plan::ActiveModel = plan.into();
        active.docstatus = Set(DocStatus::Submitted);
        active.total_planned_qty = Set(total_planned);
        active.update(&txn).await?;

        let (plan, change) = refresh_plan_status(&txn, plan_id).await?;
        txn.commit().await?;

        counter!("production_plan.submitted", 1);
        info!(plan_id = %plan_id, status = plan.status.as_str(), "Production plan submitted");
        self.emit(Event::ProductionPlanSubmitted(plan_id)).await;
        self.emit_status_change(plan_id, change).await;

        Ok(plan)
    }

    /// Cancels a submitted plan. Refused while submitted work orders exist;
    /// draft work orders raised from the plan are removed.
    #[instrument(skip(self))]
    pub async fn cancel(&self, plan_id: Uuid) -> Result<production_plan::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let plan = find_plan(&txn, plan_id).await?;
        if !plan.docstatus.is_submitted() {
            return Err(ServiceError::InvalidStatus(format!(
                "Only submitted production plans can be cancelled, {} is {}",
                plan_id,
                plan.status.as_str()
            )));
        }

        let submitted_work_orders = work_order::Entity::find()
            .filter(work_order::Column::ProductionPlan.eq(plan_id))
            .filter(work_order::Column::Docstatus.eq(DocStatus::Submitted))
            .count(&txn)
            .await?;
        if submitted_work_orders > 0 {
            return Err(ServiceError::InvalidOperation(format!(
                "Cannot cancel Production Plan {}: {} submitted work order(s) must be cancelled first",
                plan_id, submitted_work_orders
            )));
        }

        work_order::Entity::delete_many()
            .filter(work_order::Column::ProductionPlan.eq(plan_id))
            .filter(work_order::Column::Docstatus.eq(DocStatus::Draft))
            .exec(&txn)
            .await?;

        for row in plan_items(&txn, plan_id).await? {
            if let Some(mr_item) = row.material_request_item {
                adjust_material_request_ordered(&txn, mr_item, -row.planned_qty).await?;
            }
        }

        let old_status = plan.status;
        let mut active: production_plan::ActiveModel = plan.into();
        active.docstatus = Set(DocStatus::Cancelled);
        active.status = Set(ProductionPlanStatus::Cancelled);
        let plan = active.update(&txn).await?;
        txn.commit().await?;

        counter!("production_plan.cancelled", 1);
        info!(plan_id = %plan_id, "Production plan cancelled");
        self.emit(Event::ProductionPlanCancelled(plan_id)).await;
        self.emit_status_change(plan_id, Some((old_status, ProductionPlanStatus::Cancelled)))
            .await;

        Ok(plan)
    }

    /// Raises draft work orders for everything not yet on a work order:
    /// finished-good rows and in-house sub-assembly rows.
    #[instrument(skip(self))]
    pub async fn make_work_orders(
        &self,
        plan_id: Uuid,
    ) -> Result<Vec<work_order::Model>, ServiceError> {
        let txn = self.db.begin().await?;
        let plan = find_plan(&txn, plan_id).await?;
        ensure_submitted(&plan)?;

        let drafts = work_order::Entity::find()
            .filter(work_order::Column::ProductionPlan.eq(plan_id))
            .filter(work_order::Column::Docstatus.eq(DocStatus::Draft))
            .all(&txn)
            .await?;
        let mut draft_for_row: HashMap<Uuid, Decimal> = HashMap::new();
        let mut draft_for_sub: HashMap<Uuid, Decimal> = HashMap::new();
        for wo in &drafts {
            if let Some(row) = wo.production_plan_item {
                *draft_for_row.entry(row).or_default() += wo.qty;
            }
            if let Some(sub) = wo.production_plan_sub_assembly_item {
                *draft_for_sub.entry(sub).or_default() += wo.qty;
            }
        }

        let mut created = Vec::new();

        for row in plan_items(&txn, plan_id).await? {
            let drafted = draft_for_row.get(&row.id).copied().unwrap_or_default();
            let qty = pending_qty(row.planned_qty, row.ordered_qty) - drafted;
            if qty <= Decimal::ZERO {
                continue;
            }
            let wo = work_order::ActiveModel {
                company: Set(plan.company.clone()),
                production_item: Set(row.item_code.clone()),
                bom_no: Set(row.bom_no.clone()),
                qty: Set(qty),
                fg_warehouse: Set(row.warehouse.clone()),
                planned_start_date: Set(row.planned_start_date),
                production_plan: Set(Some(plan_id)),
                production_plan_item: Set(Some(row.id)),
                production_plan_sub_assembly_item: Set(None),
                sales_order: Set(row.sales_order),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            created.push(wo);
        }

        for sub in sub_assembly_rows(&txn, plan_id).await? {
            if sub.type_of_manufacturing != ManufacturingType::InHouse {
                info!(
                    item_code = %sub.production_item,
                    "Subcontracted sub-assembly is procured, not manufactured"
                );
                continue;
            }
            let drafted = draft_for_sub.get(&sub.id).copied().unwrap_or_default();
            let qty = pending_qty(sub.qty, sub.ordered_qty) - drafted;
            if qty <= Decimal::ZERO {
                continue;
            }
            let wo = work_order::ActiveModel {
                company: Set(plan.company.clone()),
                production_item: Set(sub.production_item.clone()),
                bom_no: Set(sub.bom_no.clone()),
                qty: Set(qty),
                fg_warehouse: Set(sub.fg_warehouse.clone()),
                planned_start_date: Set(sub.schedule_date.unwrap_or(plan.posting_date)),
                production_plan: Set(Some(plan_id)),
                production_plan_item: Set(None),
                production_plan_sub_assembly_item: Set(Some(sub.id)),
                sales_order: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            created.push(wo);
        }

        txn.commit().await?;

        counter!("production_plan.work_orders_created", created.len() as u64);
        info!(plan_id = %plan_id, count = created.len(), "Work orders created");
        for wo in &created {
            self.emit(Event::WorkOrderCreated {
                work_order_id: wo.id,
                item_code: wo.production_item.clone(),
                quantity: wo.qty,
            })
            .await;
        }

        Ok(created)
    }

    /// Raises one submitted material request per request type from the
    /// plan's material rows.
    #[instrument(skip(self))]
    pub async fn make_material_requests(
        &self,
        plan_id: Uuid,
    ) -> Result<Vec<material_request::Model>, ServiceError> {
        let txn = self.db.begin().await?;
        let plan = find_plan(&txn, plan_id).await?;
        ensure_submitted(&plan)?;

        let lines = material_request_plan_item::Entity::find()
            .filter(material_request_plan_item::Column::ProductionPlan.eq(plan_id))
            .order_by_asc(material_request_plan_item::Column::Idx)
            .all(&txn)
            .await?;
        if lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "No material requirements planned for this production plan".to_string(),
            ));
        }

        let mut order: Vec<MaterialRequestPurpose> = Vec::new();
        let mut grouped: HashMap<MaterialRequestPurpose, Vec<material_request_plan_item::Model>> =
            HashMap::new();
        for line in lines {
            let purpose = MaterialRequestPurpose::from(line.material_request_type);
            if !grouped.contains_key(&purpose) {
                order.push(purpose);
            }
            grouped.entry(purpose).or_default().push(line);
        }

        let mut created = Vec::new();
        for purpose in order {
            let Some(lines) = grouped.remove(&purpose) else {
                continue;
            };
            let mr = material_request::ActiveModel {
                company: Set(plan.company.clone()),
                material_request_type: Set(purpose),
                transaction_date: Set(plan.posting_date),
                schedule_date: Set(plan.posting_date),
                production_plan: Set(Some(plan_id)),
                docstatus: Set(DocStatus::Submitted),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            for (position, line) in lines.iter().enumerate() {
                material_request_item::ActiveModel {
                    material_request: Set(mr.id),
                    idx: Set(position as i32 + 1),
                    item_code: Set(line.item_code.clone()),
                    warehouse: Set(line.warehouse.clone()),
                    qty: Set(line.quantity),
                    ordered_qty: Set(Decimal::ZERO),
                    schedule_date: Set(plan.posting_date),
                    bom_no: Set(None),
                    sales_order: Set(line.sales_order),
                    production_plan: Set(Some(plan_id)),
                    material_request_plan_item: Set(Some(line.id)),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
            created.push(mr);
        }

        let (_, change) = refresh_plan_status(&txn, plan_id).await?;
        txn.commit().await?;

        counter!("production_plan.material_requests_created", created.len() as u64);
        for mr in &created {
            self.emit(Event::MaterialRequestCreated {
                material_request_id: mr.id,
                plan_id: Some(plan_id),
                request_type: mr.material_request_type.to_string(),
            })
            .await;
        }
        self.emit_status_change(plan_id, change).await;

        Ok(created)
    }

    /// Recomputes the plan status from its rows and follow-up documents.
    #[instrument(skip(self))]
    pub async fn update_status(&self, plan_id: Uuid) -> Result<production_plan::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let (plan, change) = refresh_plan_status(&txn, plan_id).await?;
        txn.commit().await?;
        self.emit_status_change(plan_id, change).await;
        Ok(plan)
    }

    async fn emit_status_change(
        &self,
        plan_id: Uuid,
        change: Option<(ProductionPlanStatus, ProductionPlanStatus)>,
    ) {
        if let Some((old, new)) = change {
            self.emit(Event::ProductionPlanStatusChanged {
                plan_id,
                old_status: old.as_str().to_string(),
                new_status: new.as_str().to_string(),
            })
            .await;
        }
    }
}

fn ensure_draft(plan: &production_plan::Model) -> Result<(), ServiceError> {
    if plan.docstatus.is_draft() {
        Ok(())
    } else {
        Err(ServiceError::InvalidStatus(format!(
            "Production Plan {} is {} and can no longer be edited",
            plan.id,
            plan.status.as_str()
        )))
    }
}

fn ensure_submitted(plan: &production_plan::Model) -> Result<(), ServiceError> {
    if plan.docstatus.is_submitted() {
        Ok(())
    } else {
        Err(ServiceError::InvalidStatus(format!(
            "Production Plan {} must be submitted first",
            plan.id
        )))
    }
}

fn matches_item_filter(plan: &production_plan::Model, item_code: &str) -> bool {
    plan.item_code
        .as_deref()
        .filter(|c| !c.is_empty())
        .map_or(true, |c| c == item_code)
}

/// Explicit BOM if given, else the item's default, else its template's.
fn resolve_bom(
    catalog: &BomCatalog,
    item_code: &str,
    explicit: Option<&str>,
) -> Result<String, ServiceError> {
    let bom_no = match explicit.filter(|b| !b.is_empty()) {
        Some(bom_no) => bom_no.to_string(),
        None => catalog
            .default_bom_for(item_code)
            .map(str::to_string)
            .ok_or_else(|| {
                ServiceError::ValidationError(format!("No default BOM found for item {}", item_code))
            })?,
    };
    catalog.require_bom(&bom_no)?;
    Ok(bom_no)
}

fn demand_for(row: &production_plan_item::Model) -> FinishedGoodDemand {
    FinishedGoodDemand {
        row: RowRef::Durable(row.id),
        item_code: row.item_code.clone(),
        bom_no: row.bom_no.clone(),
        warehouse: row.warehouse.clone(),
        planned_qty: row.planned_qty,
        depth: ExplosionDepth::from_multi_level_flag(row.use_multi_level_bom),
        schedule_date: Some(row.planned_start_date),
        sales_order: row.sales_order,
    }
}

/// Items and active submitted BOMs, as the explosion sees them.
pub(crate) async fn load_catalog<C: ConnectionTrait>(conn: &C) -> Result<BomCatalog, ServiceError> {
    let mut catalog = BomCatalog::new();

    for item in item::Entity::find().all(conn).await? {
        catalog.insert_item(item.to_item_info());
    }

    let mut lines: HashMap<String, Vec<BomLine>> = HashMap::new();
    for line in bom_item::Entity::find()
        .order_by_asc(bom_item::Column::Bom)
        .order_by_asc(bom_item::Column::Idx)
        .all(conn)
        .await?
    {
        lines.entry(line.bom.clone()).or_default().push(line.to_bom_line());
    }

    let boms = bom::Entity::find()
        .filter(bom::Column::IsActive.eq(true))
        .filter(bom::Column::Docstatus.eq(DocStatus::Submitted))
        .all(conn)
        .await?;
    for bom in boms {
        catalog.insert_bom(BomNode {
            lines: lines.remove(&bom.name).unwrap_or_default(),
            name: bom.name,
            item: bom.item,
            quantity: bom.quantity,
        });
    }

    Ok(catalog)
}

/// Stock per (item, warehouse); group warehouses sum their leaves.
async fn stock_positions<C: ConnectionTrait>(
    conn: &C,
    keys: &[(String, String)],
) -> Result<HashMap<(String, String), StockPosition>, ServiceError> {
    let mut positions = HashMap::new();
    if keys.is_empty() {
        return Ok(positions);
    }

    let tree = WarehouseTree::new(
        warehouse::Entity::find()
            .all(conn)
            .await?
            .into_iter()
            .map(WarehouseNode::from),
    );

    let item_codes: HashSet<String> = keys.iter().map(|(item, _)| item.clone()).collect();
    let bins = bin::Entity::find()
        .filter(bin::Column::ItemCode.is_in(item_codes))
        .all(conn)
        .await?;
    let by_key: HashMap<(String, String), &bin::Model> = bins
        .iter()
        .map(|b| ((b.item_code.clone(), b.warehouse.clone()), b))
        .collect();

    for (item_code, warehouse) in keys {
        let key = (item_code.clone(), warehouse.clone());
        if positions.contains_key(&key) {
            continue;
        }
        let mut position = StockPosition::default();
        for leaf in tree.leaf_warehouses(warehouse) {
            if let Some(b) = by_key.get(&(item_code.clone(), leaf)) {
                position.actual_qty += b.actual_qty;
                position.projected_qty += b.projected_qty;
            }
        }
        positions.insert(key, position);
    }

    Ok(positions)
}

async fn find_plan<C: ConnectionTrait>(
    conn: &C,
    plan_id: Uuid,
) -> Result<production_plan::Model, ServiceError> {
    production_plan::Entity::find_by_id(plan_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Production Plan", plan_id))
}

async fn plan_items<C: ConnectionTrait>(
    conn: &C,
    plan_id: Uuid,
) -> Result<Vec<production_plan_item::Model>, ServiceError> {
    Ok(production_plan_item::Entity::find()
        .filter(production_plan_item::Column::ProductionPlan.eq(plan_id))
        .order_by_asc(production_plan_item::Column::Idx)
        .all(conn)
        .await?)
}

async fn sub_assembly_rows<C: ConnectionTrait>(
    conn: &C,
    plan_id: Uuid,
) -> Result<Vec<production_plan_sub_assembly_item::Model>, ServiceError> {
    Ok(production_plan_sub_assembly_item::Entity::find()
        .filter(production_plan_sub_assembly_item::Column::ProductionPlan.eq(plan_id))
        .order_by_asc(production_plan_sub_assembly_item::Column::Idx)
        .all(conn)
        .await?)
}

async fn load_document<C: ConnectionTrait>(
    conn: &C,
    plan_id: Uuid,
) -> Result<ProductionPlanDocument, ServiceError> {
    let plan = find_plan(conn, plan_id).await?;
    let po_items = plan_items(conn, plan_id).await?;
    let prod_plan_references = production_plan_item_reference::Entity::find()
        .filter(production_plan_item_reference::Column::ProductionPlan.eq(plan_id))
        .order_by_asc(production_plan_item_reference::Column::Idx)
        .all(conn)
        .await?;
    let sub_assembly_items = sub_assembly_rows(conn, plan_id).await?;
    let mr_items = material_request_plan_item::Entity::find()
        .filter(material_request_plan_item::Column::ProductionPlan.eq(plan_id))
        .order_by_asc(material_request_plan_item::Column::Idx)
        .all(conn)
        .await?;

    Ok(ProductionPlanDocument {
        plan,
        po_items,
        prod_plan_references,
        sub_assembly_items,
        mr_items,
    })
}

/// Writes finished-good rows and their sales-order references.
///
/// References are built against local row keys; the keys are mapped to the
/// saved row ids before the references are written.
async fn persist_plan_rows<C: ConnectionTrait>(
    conn: &C,
    plan_id: Uuid,
    rows: Vec<NewPlanRow>,
    references: Vec<NewReference>,
) -> Result<IdentityMap, ServiceError> {
    let mut identity = IdentityMap::new();

    for (position, row) in rows.into_iter().enumerate() {
        let saved = production_plan_item::ActiveModel {
            production_plan: Set(plan_id),
            idx: Set(position as i32 + 1),
            item_code: Set(row.item_code),
            bom_no: Set(row.bom_no),
            warehouse: Set(row.warehouse),
            planned_qty: Set(row.planned_qty),
            ordered_qty: Set(Decimal::ZERO),
            pending_qty: Set(row.planned_qty),
            produced_qty: Set(Decimal::ZERO),
            planned_start_date: Set(row.planned_start_date),
            use_multi_level_bom: Set(row.use_multi_level_bom),
            sales_order: Set(row.sales_order),
            sales_order_item: Set(row.sales_order_item),
            material_request: Set(row.material_request),
            material_request_item: Set(row.material_request_item),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        identity.record(row.key, saved.id);
    }

    for (position, reference) in references.into_iter().enumerate() {
        let Some(item_reference) = identity.resolve(reference.row) else {
            warn!(key = reference.row.0, "Dropping reference to an unsaved plan row");
            continue;
        };
        production_plan_item_reference::ActiveModel {
            production_plan: Set(plan_id),
            idx: Set(position as i32 + 1),
            item_reference: Set(item_reference),
            sales_order: Set(reference.sales_order),
            sales_order_item: Set(reference.sales_order_item),
            qty: Set(reference.qty),
            ordered_qty: Set(Decimal::ZERO),
            ..Default::default()
        }
        .insert(conn)
        .await?;
    }

    Ok(identity)
}

/// Swaps the finished-good rows of a draft plan and re-points the existing
/// sub-assembly rows, which lose their parent when it was removed.
async fn replace_plan_rows<C: ConnectionTrait>(
    conn: &C,
    plan: &production_plan::Model,
    rows: Vec<NewPlanRow>,
    references: Vec<NewReference>,
) -> Result<(), ServiceError> {
    production_plan_item_reference::Entity::delete_many()
        .filter(production_plan_item_reference::Column::ProductionPlan.eq(plan.id))
        .exec(conn)
        .await?;
    production_plan_item::Entity::delete_many()
        .filter(production_plan_item::Column::ProductionPlan.eq(plan.id))
        .exec(conn)
        .await?;

    let total_planned: Decimal = rows.iter().map(|r| r.planned_qty).sum();
    persist_plan_rows(conn, plan.id, rows, references).await?;

    let report = reconcile_persisted_sub_assemblies(conn, plan.id).await?;
    if report.nulled > 0 {
        warn!(
            plan_id = %plan.id,
            orphaned = report.nulled,
            "Sub-assembly rows lost their finished good"
        );
    }

    let mut active: production_plan::ActiveModel = plan.clone().into();
    active.total_planned_qty = Set(total_planned);
    active.update(conn).await?;

    Ok(())
}

async fn reconcile_persisted_sub_assemblies<C: ConnectionTrait>(
    conn: &C,
    plan_id: Uuid,
) -> Result<ReconciliationReport, ServiceError> {
    let live: HashSet<Uuid> = plan_items(conn, plan_id)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect();

    let mut rows = sub_assembly_rows(conn, plan_id).await?;
    let before: Vec<Option<Uuid>> = rows.iter().map(|r| r.production_plan_item).collect();
    let report = reconcile_references(&mut rows, &IdentityMap::new(), &live);

    for (row, previous) in rows.into_iter().zip(before) {
        if row.production_plan_item != previous {
            let parent = row.production_plan_item;
            let mut active: production_plan_sub_assembly_item::ActiveModel = row.into();
            active.production_plan_item = Set(parent);
            active.update(conn).await?;
        }
    }

    Ok(report)
}

async fn insert_sub_assembly_rows<C: ConnectionTrait>(
    conn: &C,
    plan_id: Uuid,
    rows: &[SubAssemblyRow],
) -> Result<(), ServiceError> {
    for (position, row) in rows.iter().enumerate() {
        production_plan_sub_assembly_item::ActiveModel {
            production_plan: Set(plan_id),
            idx: Set(position as i32 + 1),
            production_plan_item: Set(row.parent_row.and_then(|r| r.durable_id())),
            parent_item_code: Set(row.parent_item_code.clone()),
            production_item: Set(row.production_item.clone()),
            bom_no: Set(row.bom_no.clone()),
            bom_level: Set(row.bom_level as i32),
            indent: Set(row.indent as i32),
            qty: Set(row.qty),
            ordered_qty: Set(Decimal::ZERO),
            fg_warehouse: Set(row.fg_warehouse.clone()),
            type_of_manufacturing: Set(row.type_of_manufacturing),
            schedule_date: Set(row.schedule_date),
            ..Default::default()
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

async fn insert_material_plan_rows<C: ConnectionTrait>(
    conn: &C,
    plan_id: Uuid,
    lines: &[MaterialRequestLine],
) -> Result<(), ServiceError> {
    for (position, line) in lines.iter().enumerate() {
        material_request_plan_item::ActiveModel {
            production_plan: Set(plan_id),
            idx: Set(position as i32 + 1),
            item_code: Set(line.item_code.clone()),
            warehouse: Set(line.warehouse.clone()),
            quantity: Set(line.quantity),
            required_bom_qty: Set(line.required_bom_qty),
            actual_qty: Set(line.actual_qty),
            projected_qty: Set(line.projected_qty),
            min_order_qty: Set(line.min_order_qty),
            material_request_type: Set(line.material_request_type),
            sales_order: Set(line.sales_order),
            ..Default::default()
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

async fn adjust_material_request_ordered<C: ConnectionTrait>(
    conn: &C,
    mr_item_id: Uuid,
    delta: Decimal,
) -> Result<(), ServiceError> {
    let Some(line) = material_request_item::Entity::find_by_id(mr_item_id)
        .one(conn)
        .await?
    else {
        warn!(mr_item = %mr_item_id, "Material request line no longer exists");
        return Ok(());
    };
    let ordered = (line.ordered_qty + delta).max(Decimal::ZERO);
    let mut active: material_request_item::ActiveModel = line.into();
    active.ordered_qty = Set(ordered);
    active.update(conn).await?;
    Ok(())
}

/// Recomputes a finished-good row from the submitted work orders against it
/// and pushes the ordered quantity down to the sales-order lines it serves.
pub(crate) async fn refresh_plan_row<C: ConnectionTrait>(
    conn: &C,
    row_id: Uuid,
) -> Result<production_plan_item::Model, ServiceError> {
    let row = production_plan_item::Entity::find_by_id(row_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Production Plan Item", row_id))?;

    let work_orders = work_order::Entity::find()
        .filter(work_order::Column::ProductionPlanItem.eq(row_id))
        .filter(work_order::Column::Docstatus.eq(DocStatus::Submitted))
        .all(conn)
        .await?;
    let ordered: Decimal = work_orders.iter().map(|wo| wo.qty).sum();
    let produced: Decimal = work_orders.iter().map(|wo| wo.produced_qty).sum();

    let sales_order_item = row.sales_order_item;
    let mut active: production_plan_item::ActiveModel = row.clone().into();
    active.ordered_qty = Set(ordered);
    active.pending_qty = Set(pending_qty(row.planned_qty, ordered));
    active.produced_qty = Set(produced);
    let row = active.update(conn).await?;

    let references = production_plan_item_reference::Entity::find()
        .filter(production_plan_item_reference::Column::ItemReference.eq(row_id))
        .order_by_asc(production_plan_item_reference::Column::Idx)
        .all(conn)
        .await?;
    let qtys: Vec<Decimal> = references.iter().map(|r| r.qty).collect();
    let shares = distribute_ordered(&qtys, ordered);

    let mut touched: Vec<Uuid> = sales_order_item.into_iter().collect();
    for (reference, share) in references.into_iter().zip(shares) {
        touched.push(reference.sales_order_item);
        let mut active: production_plan_item_reference::ActiveModel = reference.into();
        active.ordered_qty = Set(share);
        active.update(conn).await?;
    }

    for so_item in touched {
        refresh_sales_order_item(conn, so_item).await?;
    }

    Ok(row)
}

pub(crate) async fn refresh_sub_assembly_row<C: ConnectionTrait>(
    conn: &C,
    sub_id: Uuid,
) -> Result<(), ServiceError> {
    let Some(sub) = production_plan_sub_assembly_item::Entity::find_by_id(sub_id)
        .one(conn)
        .await?
    else {
        return Ok(());
    };
    let ordered: Decimal = work_order::Entity::find()
        .filter(work_order::Column::ProductionPlanSubAssemblyItem.eq(sub_id))
        .filter(work_order::Column::Docstatus.eq(DocStatus::Submitted))
        .all(conn)
        .await?
        .iter()
        .map(|wo| wo.qty)
        .sum();
    let mut active: production_plan_sub_assembly_item::ActiveModel = sub.into();
    active.ordered_qty = Set(ordered);
    active.update(conn).await?;
    Ok(())
}

/// A sales-order line's work-order quantity is what the plan rows serving
/// it have on submitted work orders.
async fn refresh_sales_order_item<C: ConnectionTrait>(
    conn: &C,
    so_item_id: Uuid,
) -> Result<(), ServiceError> {
    let Some(line) = sales_order_item::Entity::find_by_id(so_item_id)
        .one(conn)
        .await?
    else {
        return Ok(());
    };

    let via_references: Decimal = production_plan_item_reference::Entity::find()
        .filter(production_plan_item_reference::Column::SalesOrderItem.eq(so_item_id))
        .all(conn)
        .await?
        .iter()
        .map(|r| r.ordered_qty)
        .sum();
    let direct: Decimal = production_plan_item::Entity::find()
        .filter(production_plan_item::Column::SalesOrderItem.eq(so_item_id))
        .all(conn)
        .await?
        .iter()
        .map(|r| r.ordered_qty)
        .sum();

    let mut active: sales_order_item::ActiveModel = line.into();
    active.work_order_qty = Set(via_references + direct);
    active.update(conn).await?;
    Ok(())
}

/// Returns the plan and, when it moved, the status transition.
pub(crate) async fn refresh_plan_status<C: ConnectionTrait>(
    conn: &C,
    plan_id: Uuid,
) -> Result<
    (
        production_plan::Model,
        Option<(ProductionPlanStatus, ProductionPlanStatus)>,
    ),
    ServiceError,
> {
    let plan = find_plan(conn, plan_id).await?;
    let rows = plan_items(conn, plan_id).await?;
    let progress: Vec<RowProgress> = rows.iter().map(|r| r.progress()).collect();

    let material_requests = material_request::Entity::find()
        .filter(material_request::Column::ProductionPlan.eq(plan_id))
        .filter(material_request::Column::Docstatus.ne(DocStatus::Cancelled))
        .count(conn)
        .await?;

    let status = derive_status(plan.docstatus, &progress, material_requests > 0);
    let total_produced: Decimal = progress.iter().map(|p| p.produced_qty).sum();

    if status == plan.status && total_produced == plan.total_produced_qty {
        return Ok((plan, None));
    }

    let old_status = plan.status;
    let mut active: production_plan::ActiveModel = plan.into();
    active.status = Set(status);
    active.total_produced_qty = Set(total_produced);
    let plan = active.update(conn).await?;

    let change = (old_status != status).then_some((old_status, status));
    Ok((plan, change))
}
