use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::docstatus::DocStatus;
use crate::manufacturing::material_planning::MaterialPlanOptions;
use crate::manufacturing::ProductionPlanStatus;

/// Where the finished-good rows of a plan come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum PlanItemSource {
    #[sea_orm(string_value = "Sales Order")]
    SalesOrder,
    #[sea_orm(string_value = "Material Request")]
    MaterialRequest,
    #[sea_orm(string_value = "Manual")]
    Manual,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company: String,
    pub posting_date: NaiveDate,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub customer: Option<String>,
    /// Restricts sales-order intake to one item
    pub item_code: Option<String>,
    pub get_items_from: PlanItemSource,
    pub combine_items: bool,
    pub combine_sub_items: bool,
    pub ignore_existing_ordered_qty: bool,
    pub include_non_stock_items: bool,
    pub include_subcontracted_items: bool,
    pub for_warehouse: Option<String>,
    pub status: ProductionPlanStatus,
    pub docstatus: DocStatus,
    pub total_planned_qty: Decimal,
    pub total_produced_qty: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn material_plan_options(&self) -> MaterialPlanOptions {
        MaterialPlanOptions {
            ignore_existing_ordered_qty: self.ignore_existing_ordered_qty,
            include_non_stock_items: self.include_non_stock_items,
            include_subcontracted_items: self.include_subcontracted_items,
            for_warehouse: self.for_warehouse.clone().filter(|w| !w.is_empty()),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();

        if insert {
            if let ActiveValue::NotSet = self.id {
                self.id = ActiveValue::Set(Uuid::new_v4());
            }
            if let ActiveValue::NotSet = self.created_at {
                self.created_at = ActiveValue::Set(now);
            }
            if let ActiveValue::NotSet = self.status {
                self.status = ActiveValue::Set(ProductionPlanStatus::Draft);
            }
            if let ActiveValue::NotSet = self.docstatus {
                self.docstatus = ActiveValue::Set(DocStatus::Draft);
            }
        }

        self.updated_at = ActiveValue::Set(now);

        Ok(self)
    }
}
