use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{validate_not_blank, validate_positive};
use crate::entities::{payroll_employee_detail, payroll_entry};
use crate::payroll::{PayrollFrequency, PayrollRunOptions, ProcessingMode};

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[validate(schema(function = "validate_payroll_dates", skip_on_field_errors = false))]
pub struct CreatePayrollEntryRequest {
    #[validate(custom = "validate_not_blank")]
    pub company: String,
    pub posting_date: NaiveDate,
    pub start_date: NaiveDate,
    /// Derived from the frequency when omitted
    pub end_date: Option<NaiveDate>,
    pub payroll_frequency: PayrollFrequency,
    pub branch: Option<String>,
    pub department: Option<String>,
    #[validate(custom = "validate_not_blank")]
    pub payroll_payable_account: String,
    pub payment_account: Option<String>,
    #[validate(length(min = 3, max = 3))]
    pub currency: String,
    #[validate(custom = "validate_positive")]
    pub exchange_rate: Option<Decimal>,
    pub cost_center: Option<String>,
}

fn validate_payroll_dates(req: &CreatePayrollEntryRequest) -> Result<(), ValidationError> {
    if let Some(end) = req.end_date {
        if end < req.start_date {
            let mut err = ValidationError::new("date_range");
            err.message = Some("End date cannot be before start date".into());
            return Err(err);
        }
    }
    Ok(())
}

/// Overrides for how a batch operation runs; unset fields use the configured defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct PayrollRunRequest {
    pub mode: Option<ProcessingMode>,
    #[validate(range(min = 1))]
    pub defer_threshold: Option<usize>,
    pub make_payment_entry: Option<bool>,
}

impl PayrollRunRequest {
    pub fn resolve(&self, defaults: PayrollRunOptions) -> PayrollRunOptions {
        PayrollRunOptions {
            mode: self.mode.unwrap_or(defaults.mode),
            defer_threshold: self.defer_threshold.unwrap_or(defaults.defer_threshold),
            make_payment_entry: self
                .make_payment_entry
                .unwrap_or(defaults.make_payment_entry),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollEntryDocument {
    #[serde(flatten)]
    pub entry: payroll_entry::Model,
    pub employees: Vec<payroll_employee_detail::Model>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> CreatePayrollEntryRequest {
        CreatePayrollEntryRequest {
            company: "Acme".into(),
            posting_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            payroll_frequency: PayrollFrequency::Monthly,
            branch: None,
            department: None,
            payroll_payable_account: "Payroll Payable".into(),
            payment_account: None,
            currency: "USD".into(),
            exchange_rate: None,
            cost_center: None,
        }
    }

    #[test]
    fn rejects_end_before_start() {
        let mut req = request();
        req.end_date = NaiveDate::from_ymd_opt(2023, 12, 31);
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_exchange_rate() {
        let mut req = request();
        req.exchange_rate = Some(dec!(0));
        assert!(req.validate().is_err());
        req.exchange_rate = Some(dec!(1.5));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn run_request_overrides_only_what_it_sets() {
        let defaults = PayrollRunOptions {
            mode: ProcessingMode::Threshold,
            defer_threshold: 10,
            make_payment_entry: true,
        };
        let req = PayrollRunRequest {
            mode: Some(ProcessingMode::Immediate),
            ..Default::default()
        };
        let resolved = req.resolve(defaults);
        assert_eq!(resolved.mode, ProcessingMode::Immediate);
        assert_eq!(resolved.defer_threshold, 10);
        assert!(resolved.make_payment_entry);
    }
}
