use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{validate_not_blank, validate_positive};
use crate::entities::{
    material_request_plan_item, production_plan, production_plan_item,
    production_plan_item_reference, production_plan_sub_assembly_item,
};
use crate::entities::production_plan::PlanItemSource;
use crate::manufacturing::ManufacturingType;

fn default_true() -> bool {
    true
}

/// A draft production plan together with its rows, saved in one call.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[validate(schema(function = "validate_plan_dates", skip_on_field_errors = false))]
pub struct CreateProductionPlanRequest {
    #[validate(custom = "validate_not_blank")]
    pub company: String,
    pub posting_date: NaiveDate,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub customer: Option<String>,
    pub item_code: Option<String>,
    pub get_items_from: PlanItemSource,
    #[serde(default)]
    pub combine_items: bool,
    #[serde(default)]
    pub combine_sub_items: bool,
    #[serde(default)]
    pub ignore_existing_ordered_qty: bool,
    #[serde(default)]
    pub include_non_stock_items: bool,
    #[serde(default)]
    pub include_subcontracted_items: bool,
    pub for_warehouse: Option<String>,
    #[serde(default)]
    #[validate]
    pub po_items: Vec<PlanItemInput>,
    /// Rows referring to `po_items` by their position in that list
    #[serde(default)]
    #[validate]
    pub sub_assembly_items: Vec<SubAssemblyItemInput>,
}

fn validate_plan_dates(req: &CreateProductionPlanRequest) -> Result<(), ValidationError> {
    if let (Some(from), Some(to)) = (req.from_date, req.to_date) {
        if to < from {
            let mut err = ValidationError::new("date_range");
            err.message = Some("To date cannot be before from date".into());
            return Err(err);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct PlanItemInput {
    #[validate(custom = "validate_not_blank")]
    pub item_code: String,
    /// Falls back to the item's default BOM
    pub bom_no: Option<String>,
    #[validate(custom = "validate_not_blank")]
    pub warehouse: String,
    #[validate(custom = "validate_positive")]
    pub planned_qty: Decimal,
    pub planned_start_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub use_multi_level_bom: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SubAssemblyItemInput {
    /// Index into `po_items` of the finished good this step feeds
    pub parent_row: Option<u32>,
    pub parent_item_code: String,
    #[validate(custom = "validate_not_blank")]
    pub production_item: String,
    #[validate(custom = "validate_not_blank")]
    pub bom_no: String,
    #[serde(default)]
    pub bom_level: u32,
    #[validate(custom = "validate_positive")]
    pub qty: Decimal,
    #[validate(custom = "validate_not_blank")]
    pub fg_warehouse: String,
    pub type_of_manufacturing: ManufacturingType,
    pub schedule_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct GetSalesOrderItemsRequest {
    #[validate(length(min = 1))]
    pub sales_orders: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct GetMaterialRequestItemsRequest {
    #[validate(length(min = 1))]
    pub material_requests: Vec<Uuid>,
}

/// A production plan with every child table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionPlanDocument {
    #[serde(flatten)]
    pub plan: production_plan::Model,
    pub po_items: Vec<production_plan_item::Model>,
    pub prod_plan_references: Vec<production_plan_item_reference::Model>,
    pub sub_assembly_items: Vec<production_plan_sub_assembly_item::Model>,
    pub mr_items: Vec<material_request_plan_item::Model>,
}
