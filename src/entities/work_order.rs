use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::docstatus::DocStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum WorkOrderStatus {
    #[sea_orm(string_value = "Draft")]
    Draft,
    #[sea_orm(string_value = "Not Started")]
    NotStarted,
    #[sea_orm(string_value = "In Process")]
    InProcess,
    #[sea_orm(string_value = "Completed")]
    Completed,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl WorkOrderStatus {
    pub fn for_progress(qty: Decimal, produced_qty: Decimal) -> Self {
        if produced_qty >= qty && qty > Decimal::ZERO {
            WorkOrderStatus::Completed
        } else if produced_qty > Decimal::ZERO {
            WorkOrderStatus::InProcess
        } else {
            WorkOrderStatus::NotStarted
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company: String,
    pub production_item: String,
    pub bom_no: String,
    pub qty: Decimal,
    pub produced_qty: Decimal,
    pub fg_warehouse: String,
    pub planned_start_date: NaiveDate,
    pub production_plan: Option<Uuid>,
    pub production_plan_item: Option<Uuid>,
    pub production_plan_sub_assembly_item: Option<Uuid>,
    pub sales_order: Option<Uuid>,
    pub status: WorkOrderStatus,
    pub docstatus: DocStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
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
                self.status = ActiveValue::Set(WorkOrderStatus::Draft);
            }

            if let ActiveValue::NotSet = self.docstatus {
                self.docstatus = ActiveValue::Set(DocStatus::Draft);
            }

            if let ActiveValue::NotSet = self.produced_qty {
                self.produced_qty = ActiveValue::Set(Decimal::ZERO);
            }
        }

        self.updated_at = ActiveValue::Set(now);

        Ok(self)
    }
}
