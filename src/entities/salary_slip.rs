use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::docstatus::DocStatus;
use crate::payroll::slip::SlipPayable;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "salary_slips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub payroll_entry: Option<Uuid>,
    pub employee: String,
    pub employee_name: String,
    pub company: String,
    pub posting_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub salary_structure: String,
    pub currency: String,
    pub exchange_rate: Decimal,
    pub payroll_payable_account: String,
    pub gross_pay: Decimal,
    pub total_deduction: Decimal,
    pub net_pay: Decimal,
    pub base_gross_pay: Decimal,
    pub base_total_deduction: Decimal,
    pub base_net_pay: Decimal,
    pub docstatus: DocStatus,
    pub created_at: DateTime<Utc>,
}

impl Model {
    pub fn payable(&self) -> SlipPayable {
        SlipPayable {
            payable_account: self.payroll_payable_account.clone(),
            currency: self.currency.clone(),
            net_pay: self.net_pay,
            base_net_pay: self.base_net_pay,
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
