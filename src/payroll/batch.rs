use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PayrollStatus {
    #[sea_orm(string_value = "Draft")]
    Draft,
    #[sea_orm(string_value = "Submitted")]
    Submitted,
    #[sea_orm(string_value = "Queued")]
    Queued,
    #[sea_orm(string_value = "Failed")]
    Failed,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl PayrollStatus {
    /// Whether a batch in this status may move to `next`.
    ///
    /// Draft batches only leave Draft through submission. Queued batches wait
    /// for the worker and cannot be cancelled. Cancelled is terminal.
    pub fn can_transition_to(self, next: PayrollStatus) -> bool {
        use PayrollStatus::*;
        matches!(
            (self, next),
            (Draft, Submitted)
                | (Draft, Queued)
                | (Draft, Failed)
                | (Submitted, Submitted)
                | (Submitted, Queued)
                | (Submitted, Failed)
                | (Submitted, Cancelled)
                | (Queued, Submitted)
                | (Queued, Failed)
                | (Failed, Queued)
                | (Failed, Submitted)
                | (Failed, Failed)
                | (Failed, Cancelled)
        )
    }

    pub fn transition(self, next: PayrollStatus) -> Result<PayrollStatus, ServiceError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ServiceError::InvalidStatus(format!(
                "Payroll entry cannot move from {:?} to {:?}",
                self, next
            )))
        }
    }
}

/// How a salary-slip batch operation is executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    #[default]
    Immediate,
    Deferred,
    /// Deferred only when the batch has more employees than the threshold
    Threshold,
}

/// Per-call execution settings for payroll batch operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRunOptions {
    pub mode: ProcessingMode,
    pub defer_threshold: usize,
    pub make_payment_entry: bool,
}

impl Default for PayrollRunOptions {
    fn default() -> Self {
        Self {
            mode: ProcessingMode::Immediate,
            defer_threshold: 30,
            make_payment_entry: false,
        }
    }
}

impl PayrollRunOptions {
    pub fn immediate() -> Self {
        Self::default()
    }

    pub fn deferred() -> Self {
        Self {
            mode: ProcessingMode::Deferred,
            ..Self::default()
        }
    }

    pub fn should_defer(&self, employee_count: usize) -> bool {
        match self.mode {
            ProcessingMode::Immediate => false,
            ProcessingMode::Deferred => true,
            ProcessingMode::Threshold => employee_count > self.defer_threshold,
        }
    }
}

/// Outcome of one pass over a batch of employees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub succeeded: usize,
    pub failures: Vec<(String, String)>,
}

impl BatchOutcome {
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, employee: impl Into<String>, reason: impl Into<String>) {
        self.failures.push((employee.into(), reason.into()));
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Status the batch lands in after this pass.
    pub fn resulting_status(&self) -> PayrollStatus {
        if self.is_success() {
            PayrollStatus::Submitted
        } else {
            PayrollStatus::Failed
        }
    }

    /// Message stored on the batch, one line per failed employee.
    pub fn error_message(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        Some(
            self.failures
                .iter()
                .map(|(employee, reason)| format!("{}: {}", employee, reason))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(PayrollStatus::Draft, PayrollStatus::Submitted => true; "draft submits")]
    #[test_case(PayrollStatus::Draft, PayrollStatus::Queued => true; "draft queues")]
    #[test_case(PayrollStatus::Draft, PayrollStatus::Cancelled => false; "draft cannot cancel")]
    #[test_case(PayrollStatus::Queued, PayrollStatus::Cancelled => false; "queued cannot cancel")]
    #[test_case(PayrollStatus::Failed, PayrollStatus::Queued => true; "failed retries deferred")]
    #[test_case(PayrollStatus::Failed, PayrollStatus::Submitted => true; "failed recovers")]
    #[test_case(PayrollStatus::Submitted, PayrollStatus::Cancelled => true; "submitted cancels")]
    #[test_case(PayrollStatus::Cancelled, PayrollStatus::Submitted => false; "cancelled is terminal")]
    #[test_case(PayrollStatus::Submitted, PayrollStatus::Draft => false; "no way back to draft")]
    fn transitions(from: PayrollStatus, to: PayrollStatus) -> bool {
        from.can_transition_to(to)
    }

    #[test]
    fn invalid_transition_is_an_error() {
        assert!(matches!(
            PayrollStatus::Cancelled.transition(PayrollStatus::Queued),
            Err(ServiceError::InvalidStatus(_))
        ));
        assert_eq!(
            PayrollStatus::Submitted
                .transition(PayrollStatus::Failed)
                .unwrap(),
            PayrollStatus::Failed
        );
    }

    #[test]
    fn threshold_mode_defers_large_batches() {
        let options = PayrollRunOptions {
            mode: ProcessingMode::Threshold,
            defer_threshold: 2,
            make_payment_entry: false,
        };
        assert!(!options.should_defer(2));
        assert!(options.should_defer(3));
        assert!(!PayrollRunOptions::immediate().should_defer(1000));
        assert!(PayrollRunOptions::deferred().should_defer(0));
    }

    #[test]
    fn outcome_reports_failures() {
        let mut outcome = BatchOutcome::default();
        outcome.record_success();
        assert_eq!(outcome.resulting_status(), PayrollStatus::Submitted);
        assert_eq!(outcome.error_message(), None);

        outcome.record_failure("EMP-2", "Employee is not active");
        assert_eq!(outcome.resulting_status(), PayrollStatus::Failed);
        assert_eq!(
            outcome.error_message().as_deref(),
            Some("EMP-2: Employee is not active")
        );
    }
}
