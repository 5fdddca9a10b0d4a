use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::docstatus::DocStatus;
use crate::payroll::{PayrollFrequency, PayrollStatus};

/// A batch of salary slips for one company and pay period.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company: String,
    pub posting_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub payroll_frequency: PayrollFrequency,
    pub branch: Option<String>,
    pub department: Option<String>,
    pub payroll_payable_account: String,
    pub payment_account: Option<String>,
    pub currency: String,
    pub exchange_rate: Decimal,
    pub cost_center: Option<String>,
    pub status: PayrollStatus,
    pub docstatus: DocStatus,
    pub number_of_employees: i32,
    pub salary_slips_created: bool,
    pub salary_slips_submitted: bool,
    /// Failures of the last batch pass, one line per employee
    pub error_message: Option<String>,
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
                self.status = ActiveValue::Set(PayrollStatus::Draft);
            }
            if let ActiveValue::NotSet = self.docstatus {
                self.docstatus = ActiveValue::Set(DocStatus::Draft);
            }
        }

        self.updated_at = ActiveValue::Set(now);

        Ok(self)
    }
}
