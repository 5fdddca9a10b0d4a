use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::validate_not_blank;
use crate::stock::RepostBasedOn;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[validate(schema(function = "validate_repost_target", skip_on_field_errors = false))]
pub struct CreateRepostRequest {
    pub based_on: RepostBasedOn,
    pub item_code: Option<String>,
    pub warehouse: Option<String>,
    pub voucher_type: Option<String>,
    pub voucher_no: Option<String>,
    pub posting_date: NaiveDate,
    /// Midnight when omitted
    pub posting_time: Option<NaiveTime>,
    #[validate(custom = "validate_not_blank")]
    pub company: String,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().map_or(false, |v| !v.trim().is_empty())
}

fn validate_repost_target(req: &CreateRepostRequest) -> Result<(), ValidationError> {
    let ok = match req.based_on {
        RepostBasedOn::ItemAndWarehouse => present(&req.item_code) && present(&req.warehouse),
        RepostBasedOn::Transaction => present(&req.voucher_type) && present(&req.voucher_no),
    };
    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("repost_target");
        err.message = Some(
            match req.based_on {
                RepostBasedOn::ItemAndWarehouse => "Item and warehouse are required",
                RepostBasedOn::Transaction => "Voucher type and number are required",
            }
            .into(),
        );
        Err(err)
    }
}

/// An (item, warehouse) pair a voucher posted stock against.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StockLedgerTouch {
    pub item_code: String,
    pub warehouse: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ItemWiseRepostRequest {
    #[validate(custom = "validate_not_blank")]
    pub voucher_type: String,
    #[validate(custom = "validate_not_blank")]
    pub voucher_no: String,
    pub posting_date: NaiveDate,
    pub posting_time: NaiveTime,
    #[validate(custom = "validate_not_blank")]
    pub company: String,
    #[validate(length(min = 1))]
    pub stock_ledger_entries: Vec<StockLedgerTouch>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FreezeStockRequest {
    pub stock_frozen_upto: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PendingRepostsQuery {
    pub upto: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RunRepostsRequest {
    /// Local time to evaluate the window against; the current time when omitted
    pub now: Option<NaiveDateTime>,
}
