use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "material_request_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub material_request: Uuid,
    pub idx: i32,
    pub item_code: String,
    pub warehouse: String,
    pub qty: Decimal,
    /// Quantity already planned or ordered against this line
    pub ordered_qty: Decimal,
    pub schedule_date: NaiveDate,
    pub bom_no: Option<String>,
    pub sales_order: Option<Uuid>,
    pub production_plan: Option<Uuid>,
    pub material_request_plan_item: Option<Uuid>,
}

impl Model {
    pub fn pending_qty(&self) -> Decimal {
        (self.qty - self.ordered_qty).max(Decimal::ZERO)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::material_request::Entity",
        from = "Column::MaterialRequest",
        to = "super::material_request::Column::Id"
    )]
    MaterialRequest,
}

impl Related<super::material_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaterialRequest.def()
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
