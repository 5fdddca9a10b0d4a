use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::manufacturing::progress::RowProgress;

/// Finished-good row of a production plan (`po_items`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production_plan_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub production_plan: Uuid,
    pub idx: i32,
    pub item_code: String,
    pub bom_no: String,
    pub warehouse: String,
    pub planned_qty: Decimal,
    pub ordered_qty: Decimal,
    pub pending_qty: Decimal,
    pub produced_qty: Decimal,
    pub planned_start_date: NaiveDate,
    pub use_multi_level_bom: bool,
    pub sales_order: Option<Uuid>,
    pub sales_order_item: Option<Uuid>,
    pub material_request: Option<Uuid>,
    pub material_request_item: Option<Uuid>,
}

impl Model {
    pub fn progress(&self) -> RowProgress {
        RowProgress {
            planned_qty: self.planned_qty,
            ordered_qty: self.ordered_qty,
            produced_qty: self.produced_qty,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::production_plan::Entity",
        from = "Column::ProductionPlan",
        to = "super::production_plan::Column::Id"
    )]
    ProductionPlan,
}

impl Related<super::production_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionPlan.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            if let ActiveValue::NotSet = self.id {
                self.id = ActiveValue::Set(Uuid::new_v4());
            }
        }
        Ok(self)
    }
}
