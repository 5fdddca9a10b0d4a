use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ComponentType {
    #[sea_orm(string_value = "Earning")]
    Earning,
    #[sea_orm(string_value = "Deduction")]
    Deduction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentAmount {
    pub salary_component: String,
    pub component_type: ComponentType,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SlipTotals {
    pub gross_pay: Decimal,
    pub total_deduction: Decimal,
    pub net_pay: Decimal,
    pub base_gross_pay: Decimal,
    pub base_total_deduction: Decimal,
    pub base_net_pay: Decimal,
}

/// Gross, deduction and net pay in slip currency and in company currency.
pub fn compute_totals(components: &[ComponentAmount], exchange_rate: Decimal) -> SlipTotals {
    let sum_of = |kind: ComponentType| -> Decimal {
        components
            .iter()
            .filter(|c| c.component_type == kind)
            .map(|c| c.amount)
            .sum()
    };

    let gross_pay = sum_of(ComponentType::Earning);
    let total_deduction = sum_of(ComponentType::Deduction);
    let net_pay = gross_pay - total_deduction;

    SlipTotals {
        gross_pay,
        total_deduction,
        net_pay,
        base_gross_pay: gross_pay * exchange_rate,
        base_total_deduction: total_deduction * exchange_rate,
        base_net_pay: net_pay * exchange_rate,
    }
}

/// Components used on a slip that have no account for the company, sorted.
pub fn missing_component_accounts<'a>(
    components: impl IntoIterator<Item = &'a str>,
    accounted: &HashSet<String>,
) -> Vec<String> {
    components
        .into_iter()
        .filter(|c| !accounted.contains(*c))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// What one submitted slip owes through the payable account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlipPayable {
    pub payable_account: String,
    pub currency: String,
    pub net_pay: Decimal,
    pub base_net_pay: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedPayment {
    pub payable_account: String,
    pub currency: String,
    pub amount: Decimal,
    pub base_amount: Decimal,
    pub slip_count: usize,
}

/// One payment per (payable account, currency), ordered by that key.
pub fn consolidate_payments(slips: &[SlipPayable]) -> Vec<ConsolidatedPayment> {
    let mut grouped: BTreeMap<(String, String), ConsolidatedPayment> = BTreeMap::new();

    for slip in slips {
        let entry = grouped
            .entry((slip.payable_account.clone(), slip.currency.clone()))
            .or_insert_with(|| ConsolidatedPayment {
                payable_account: slip.payable_account.clone(),
                currency: slip.currency.clone(),
                amount: Decimal::ZERO,
                base_amount: Decimal::ZERO,
                slip_count: 0,
            });
        entry.amount += slip.net_pay;
        entry.base_amount += slip.base_net_pay;
        entry.slip_count += 1;
    }

    grouped.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn component(name: &str, kind: ComponentType, amount: Decimal) -> ComponentAmount {
        ComponentAmount {
            salary_component: name.into(),
            component_type: kind,
            amount,
        }
    }

    #[test]
    fn totals_convert_to_company_currency() {
        let totals = compute_totals(
            &[
                component("Basic", ComponentType::Earning, dec!(1000)),
                component("HRA", ComponentType::Earning, dec!(250)),
                component("Tax", ComponentType::Deduction, dec!(150)),
            ],
            dec!(2),
        );

        assert_eq!(totals.gross_pay, dec!(1250));
        assert_eq!(totals.total_deduction, dec!(150));
        assert_eq!(totals.net_pay, dec!(1100));
        assert_eq!(totals.base_gross_pay, dec!(2500));
        assert_eq!(totals.base_net_pay, dec!(2200));
    }

    #[test]
    fn missing_accounts_are_deduplicated() {
        let accounted: HashSet<String> = ["Basic".to_string()].into_iter().collect();
        let missing = missing_component_accounts(["Tax", "Basic", "HRA", "Tax"], &accounted);
        assert_eq!(missing, vec!["HRA".to_string(), "Tax".to_string()]);
    }

    #[test]
    fn payments_group_by_account_and_currency() {
        let slip = |account: &str, currency: &str, net: Decimal, rate: Decimal| SlipPayable {
            payable_account: account.into(),
            currency: currency.into(),
            net_pay: net,
            base_net_pay: net * rate,
        };

        let payments = consolidate_payments(&[
            slip("Payroll Payable", "USD", dec!(100), dec!(1)),
            slip("Payroll Payable", "EUR", dec!(50), dec!(2)),
            slip("Payroll Payable", "USD", dec!(25), dec!(1)),
        ]);

        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].currency, "EUR");
        assert_eq!(payments[0].base_amount, dec!(100));
        assert_eq!(payments[1].currency, "USD");
        assert_eq!(payments[1].amount, dec!(125));
        assert_eq!(payments[1].slip_count, 2);
    }
}
