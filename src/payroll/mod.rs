//! Payroll batch rules: pay periods, the batch status machine, slip totals
//! and payment consolidation.

pub mod batch;
pub mod period;
pub mod slip;

pub use batch::{BatchOutcome, PayrollRunOptions, PayrollStatus, ProcessingMode};
pub use period::{PayrollFrequency, PayrollPeriod};
pub use slip::{ComponentType, ConsolidatedPayment, SlipTotals};
