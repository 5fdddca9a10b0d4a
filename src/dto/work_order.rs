use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{validate_not_blank, validate_positive};

/// A work order raised by hand rather than from a production plan.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateWorkOrderRequest {
    #[validate(custom = "validate_not_blank")]
    pub company: String,
    #[validate(custom = "validate_not_blank")]
    pub production_item: String,
    #[validate(custom = "validate_not_blank")]
    pub bom_no: String,
    #[validate(custom = "validate_positive")]
    pub qty: Decimal,
    #[validate(custom = "validate_not_blank")]
    pub fg_warehouse: String,
    pub planned_start_date: NaiveDate,
    pub sales_order: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RecordProductionRequest {
    #[validate(custom = "validate_positive")]
    pub qty: Decimal,
}
