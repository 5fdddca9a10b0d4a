use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sales-order line served by a combined finished-good row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production_plan_item_references")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub production_plan: Uuid,
    pub idx: i32,
    /// The `production_plan_items` row this line was folded into
    pub item_reference: Uuid,
    pub sales_order: Uuid,
    pub sales_order_item: Uuid,
    pub qty: Decimal,
    pub ordered_qty: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::production_plan_item::Entity",
        from = "Column::ItemReference",
        to = "super::production_plan_item::Column::Id"
    )]
    ProductionPlanItem,
}

impl Related<super::production_plan_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionPlanItem.def()
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
