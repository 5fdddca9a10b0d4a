use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Submission state shared by every transactional document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
pub enum DocStatus {
    #[sea_orm(num_value = 0)]
    Draft,
    #[sea_orm(num_value = 1)]
    Submitted,
    #[sea_orm(num_value = 2)]
    Cancelled,
}

impl DocStatus {
    pub fn is_draft(self) -> bool {
        self == DocStatus::Draft
    }

    pub fn is_submitted(self) -> bool {
        self == DocStatus::Submitted
    }

    pub fn is_cancelled(self) -> bool {
        self == DocStatus::Cancelled
    }
}
