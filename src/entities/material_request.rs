use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::docstatus::DocStatus;
use crate::manufacturing::MaterialRequestType;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum MaterialRequestPurpose {
    #[sea_orm(string_value = "Purchase")]
    Purchase,
    #[sea_orm(string_value = "Manufacture")]
    Manufacture,
    #[sea_orm(string_value = "Customer Provided")]
    #[strum(serialize = "Customer Provided")]
    CustomerProvided,
}

impl From<MaterialRequestType> for MaterialRequestPurpose {
    fn from(kind: MaterialRequestType) -> Self {
        match kind {
            MaterialRequestType::Purchase => MaterialRequestPurpose::Purchase,
            MaterialRequestType::CustomerProvided => MaterialRequestPurpose::CustomerProvided,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "material_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company: String,
    pub material_request_type: MaterialRequestPurpose,
    pub transaction_date: NaiveDate,
    pub schedule_date: NaiveDate,
    /// Set when the request was raised from a production plan
    pub production_plan: Option<Uuid>,
    pub docstatus: DocStatus,
    pub created_at: DateTime<Utc>,
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
