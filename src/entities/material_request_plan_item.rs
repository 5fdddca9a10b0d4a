use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::manufacturing::MaterialRequestType;

/// Raw-material requirement of a production plan (`mr_items`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "material_request_plan_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub production_plan: Uuid,
    pub idx: i32,
    pub item_code: String,
    pub warehouse: String,
    pub quantity: Decimal,
    pub required_bom_qty: Decimal,
    pub actual_qty: Decimal,
    pub projected_qty: Decimal,
    pub min_order_qty: Decimal,
    pub material_request_type: MaterialRequestType,
    pub sales_order: Option<Uuid>,
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
