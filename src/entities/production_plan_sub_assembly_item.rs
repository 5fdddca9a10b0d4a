use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::manufacturing::references::{ParentLinked, RowRef};
use crate::manufacturing::ManufacturingType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production_plan_sub_assembly_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub production_plan: Uuid,
    pub idx: i32,
    /// Finished-good row this step feeds; cleared when that row is gone
    pub production_plan_item: Option<Uuid>,
    pub parent_item_code: String,
    pub production_item: String,
    pub bom_no: String,
    pub bom_level: i32,
    pub indent: i32,
    pub qty: Decimal,
    pub ordered_qty: Decimal,
    pub fg_warehouse: String,
    pub type_of_manufacturing: ManufacturingType,
    pub schedule_date: Option<NaiveDate>,
}

impl ParentLinked for Model {
    fn parent_ref(&self) -> Option<RowRef> {
        self.production_plan_item.map(RowRef::Durable)
    }

    fn set_parent_ref(&mut self, parent: Option<RowRef>) {
        self.production_plan_item = parent.and_then(|r| r.durable_id());
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
