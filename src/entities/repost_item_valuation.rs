use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::docstatus::DocStatus;
use crate::stock::{RepostBasedOn, RepostCandidate, RepostStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repost_item_valuations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub based_on: RepostBasedOn,
    pub item_code: Option<String>,
    pub warehouse: Option<String>,
    pub voucher_type: Option<String>,
    pub voucher_no: Option<String>,
    pub posting_date: NaiveDate,
    pub posting_time: NaiveTime,
    pub company: String,
    pub status: RepostStatus,
    pub docstatus: DocStatus,
    pub error_log: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn candidate(&self) -> RepostCandidate {
        RepostCandidate {
            id: self.id,
            posting_date: self.posting_date,
            posting_time: self.posting_time,
            created_at: self.created_at,
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
        let now = Utc::now();

        if insert {
            if let ActiveValue::NotSet = self.id {
                self.id = ActiveValue::Set(Uuid::new_v4());
            }
            if let ActiveValue::NotSet = self.created_at {
                self.created_at = ActiveValue::Set(now);
            }
            if let ActiveValue::NotSet = self.status {
                self.status = ActiveValue::Set(RepostStatus::Queued);
            }
            if let ActiveValue::NotSet = self.docstatus {
                self.docstatus = ActiveValue::Set(DocStatus::Draft);
            }
        }

        self.updated_at = ActiveValue::Set(now);

        Ok(self)
    }
}
