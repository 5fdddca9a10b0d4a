use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::docstatus::DocStatus;

/// Consolidated payment of a payroll batch for one payable account and currency.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_payment_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub payroll_entry: Uuid,
    pub company: String,
    pub posting_date: NaiveDate,
    pub payable_account: String,
    pub payment_account: Option<String>,
    pub currency: String,
    pub amount: Decimal,
    pub base_amount: Decimal,
    pub slip_count: i32,
    pub docstatus: DocStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payroll_entry::Entity",
        from = "Column::PayrollEntry",
        to = "super::payroll_entry::Column::Id"
    )]
    PayrollEntry,
}

impl Related<super::payroll_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollEntry.def()
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
            if let ActiveValue::NotSet = self.created_at {
                self.created_at = ActiveValue::Set(Utc::now());
            }
        }
        Ok(self)
    }
}
