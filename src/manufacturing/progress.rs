use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::docstatus::DocStatus;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ProductionPlanStatus {
    #[sea_orm(string_value = "Draft")]
    Draft,
    #[sea_orm(string_value = "Not Started")]
    NotStarted,
    #[sea_orm(string_value = "Material Requested")]
    MaterialRequested,
    #[sea_orm(string_value = "In Process")]
    InProcess,
    #[sea_orm(string_value = "Completed")]
    Completed,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl ProductionPlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionPlanStatus::Draft => "Draft",
            ProductionPlanStatus::NotStarted => "Not Started",
            ProductionPlanStatus::MaterialRequested => "Material Requested",
            ProductionPlanStatus::InProcess => "In Process",
            ProductionPlanStatus::Completed => "Completed",
            ProductionPlanStatus::Cancelled => "Cancelled",
        }
    }
}

/// Planned, ordered and produced quantities of one finished-good row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RowProgress {
    pub planned_qty: Decimal,
    pub ordered_qty: Decimal,
    pub produced_qty: Decimal,
}

pub fn pending_qty(planned_qty: Decimal, ordered_qty: Decimal) -> Decimal {
    (planned_qty - ordered_qty).max(Decimal::ZERO)
}

/// Most a row may have on work orders given the overproduction allowance.
pub fn overproduction_limit(planned_qty: Decimal, allowance_percentage: Decimal) -> Decimal {
    planned_qty + planned_qty * allowance_percentage / Decimal::ONE_HUNDRED
}

pub fn check_overproduction(
    planned_qty: Decimal,
    ordered_qty: Decimal,
    additional_qty: Decimal,
    allowance_percentage: Decimal,
) -> Result<(), ServiceError> {
    let limit = overproduction_limit(planned_qty, allowance_percentage);
    let total = ordered_qty + additional_qty;
    if total > limit {
        return Err(ServiceError::OverProduction(format!(
            "Cannot produce {} against planned {} (already ordered {}, allowed up to {})",
            additional_qty, planned_qty, ordered_qty, limit
        )));
    }
    Ok(())
}

pub fn all_items_completed(rows: &[RowProgress]) -> bool {
    !rows.is_empty() && rows.iter().all(|r| r.produced_qty >= r.planned_qty)
}

/// Status a plan should carry given its rows and follow-up documents.
pub fn derive_status(
    docstatus: DocStatus,
    rows: &[RowProgress],
    has_material_requests: bool,
) -> ProductionPlanStatus {
    match docstatus {
        DocStatus::Draft => return ProductionPlanStatus::Draft,
        DocStatus::Cancelled => return ProductionPlanStatus::Cancelled,
        DocStatus::Submitted => {}
    }

    if all_items_completed(rows) {
        ProductionPlanStatus::Completed
    } else if rows
        .iter()
        .any(|r| r.ordered_qty > Decimal::ZERO || r.produced_qty > Decimal::ZERO)
    {
        ProductionPlanStatus::InProcess
    } else if has_material_requests {
        ProductionPlanStatus::MaterialRequested
    } else {
        ProductionPlanStatus::NotStarted
    }
}

/// Spreads a combined row's ordered quantity over the sales-order lines it serves.
///
/// Lines are filled in order up to their own quantity; anything beyond the
/// total goes to the last line.
pub fn distribute_ordered(reference_qtys: &[Decimal], total_ordered: Decimal) -> Vec<Decimal> {
    let mut remaining = total_ordered.max(Decimal::ZERO);
    let mut shares: Vec<Decimal> = reference_qtys
        .iter()
        .map(|qty| {
            let share = remaining.min(*qty);
            remaining -= share;
            share
        })
        .collect();

    if remaining > Decimal::ZERO {
        if let Some(last) = shares.last_mut() {
            *last += remaining;
        }
    }

    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn progress(planned: Decimal, ordered: Decimal, produced: Decimal) -> RowProgress {
        RowProgress {
            planned_qty: planned,
            ordered_qty: ordered,
            produced_qty: produced,
        }
    }

    #[test]
    fn pending_never_goes_negative() {
        assert_eq!(pending_qty(dec!(10), dec!(4)), dec!(6));
        assert_eq!(pending_qty(dec!(10), dec!(12)), dec!(0));
    }

    #[test]
    fn overproduction_respects_allowance() {
        assert!(check_overproduction(dec!(10), dec!(5), dec!(5), dec!(0)).is_ok());
        assert!(matches!(
            check_overproduction(dec!(10), dec!(5), dec!(6), dec!(0)),
            Err(ServiceError::OverProduction(_))
        ));
        assert!(check_overproduction(dec!(10), dec!(5), dec!(6), dec!(10)).is_ok());
        assert!(check_overproduction(dec!(10), dec!(5), dec!(7), dec!(10)).is_err());
    }

    #[test]
    fn status_follows_progress() {
        let idle = [progress(dec!(5), dec!(0), dec!(0))];
        let ordered = [progress(dec!(5), dec!(2), dec!(0))];
        let done = [progress(dec!(5), dec!(5), dec!(5))];

        assert_eq!(
            derive_status(DocStatus::Draft, &done, true),
            ProductionPlanStatus::Draft
        );
        assert_eq!(
            derive_status(DocStatus::Cancelled, &done, false),
            ProductionPlanStatus::Cancelled
        );
        assert_eq!(
            derive_status(DocStatus::Submitted, &idle, false),
            ProductionPlanStatus::NotStarted
        );
        assert_eq!(
            derive_status(DocStatus::Submitted, &idle, true),
            ProductionPlanStatus::MaterialRequested
        );
        assert_eq!(
            derive_status(DocStatus::Submitted, &ordered, true),
            ProductionPlanStatus::InProcess
        );
        assert_eq!(
            derive_status(DocStatus::Submitted, &done, false),
            ProductionPlanStatus::Completed
        );
        assert_eq!(
            derive_status(DocStatus::Submitted, &[], false),
            ProductionPlanStatus::NotStarted
        );
    }

    #[test]
    fn ordered_qty_fills_references_in_order() {
        assert_eq!(
            distribute_ordered(&[dec!(2), dec!(3)], dec!(4)),
            vec![dec!(2), dec!(2)]
        );
        assert_eq!(
            distribute_ordered(&[dec!(2), dec!(3)], dec!(6)),
            vec![dec!(2), dec!(4)]
        );
        assert_eq!(
            distribute_ordered(&[dec!(2), dec!(3)], dec!(0)),
            vec![dec!(0), dec!(0)]
        );
        assert!(distribute_ordered(&[], dec!(3)).is_empty());
    }

    proptest! {
        #[test]
        fn pending_is_clamped_difference(planned in 0i64..1000, ordered in 0i64..1000) {
            let pending = pending_qty(Decimal::from(planned), Decimal::from(ordered));
            prop_assert_eq!(pending, Decimal::from((planned - ordered).max(0)));
        }

        #[test]
        fn distribution_accounts_for_every_unit(
            qtys in prop::collection::vec(1i64..50, 1..8),
            total in 0i64..400
        ) {
            let qtys: Vec<Decimal> = qtys.into_iter().map(Decimal::from).collect();
            let shares = distribute_ordered(&qtys, Decimal::from(total));
            let sum: Decimal = shares.iter().copied().sum();
            prop_assert_eq!(sum, Decimal::from(total));
        }
    }
}
