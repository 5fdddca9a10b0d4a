use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::manufacturing::BomLine;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bom_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bom: String,
    pub idx: i32,
    pub item_code: String,
    /// BOM of the component when it is a sub-assembly
    pub bom_no: Option<String>,
    pub qty: Decimal,
    pub stock_qty: Decimal,
    pub source_warehouse: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bom::Entity",
        from = "Column::Bom",
        to = "super::bom::Column::Name"
    )]
    Bom,
}

impl Related<super::bom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bom.def()
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

impl Model {
    pub fn to_bom_line(&self) -> BomLine {
        BomLine {
            item_code: self.item_code.clone(),
            bom_no: self.bom_no.clone().filter(|b| !b.is_empty()),
            stock_qty: self.stock_qty,
            source_warehouse: self.source_warehouse.clone(),
        }
    }
}
