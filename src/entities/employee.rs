use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EmployeeStatus {
    #[sea_orm(string_value = "Active")]
    Active,
    #[sea_orm(string_value = "Inactive")]
    Inactive,
    #[sea_orm(string_value = "Suspended")]
    Suspended,
    #[sea_orm(string_value = "Left")]
    Left,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub employee_name: String,
    pub company: String,
    pub branch: Option<String>,
    pub department: Option<String>,
    pub status: EmployeeStatus,
    pub date_of_joining: NaiveDate,
    pub relieving_date: Option<NaiveDate>,
}

impl Model {
    /// Whether the employee can be paid for a period ending on `end_date`.
    pub fn is_payable(&self, start_date: NaiveDate, end_date: NaiveDate) -> bool {
        self.status == EmployeeStatus::Active
            && self.date_of_joining <= end_date
            && self.relieving_date.map_or(true, |d| d >= start_date)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
