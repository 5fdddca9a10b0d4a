use chrono::{Datelike, Days, Months, NaiveDate};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PayrollFrequency {
    #[sea_orm(string_value = "Monthly")]
    Monthly,
    #[sea_orm(string_value = "Fortnightly")]
    Fortnightly,
    #[sea_orm(string_value = "Bimonthly")]
    Bimonthly,
    #[sea_orm(string_value = "Weekly")]
    Weekly,
    #[sea_orm(string_value = "Daily")]
    Daily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Last day of the pay period beginning on `start_date`.
///
/// Bimonthly periods are tied to calendar halves rather than a start date,
/// so they have no end date of their own.
pub fn end_date(start_date: NaiveDate, frequency: PayrollFrequency) -> Option<NaiveDate> {
    match frequency {
        PayrollFrequency::Monthly => start_date
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt()),
        PayrollFrequency::Fortnightly => start_date.checked_add_days(Days::new(13)),
        PayrollFrequency::Weekly => start_date.checked_add_days(Days::new(6)),
        PayrollFrequency::Daily => Some(start_date),
        PayrollFrequency::Bimonthly => None,
    }
}

/// The period of `frequency` that contains `date`.
pub fn period_containing(frequency: PayrollFrequency, date: NaiveDate) -> Option<PayrollPeriod> {
    match frequency {
        PayrollFrequency::Monthly => {
            let start_date = date.with_day(1)?;
            Some(PayrollPeriod {
                start_date,
                end_date: month_end(date)?,
            })
        }
        PayrollFrequency::Bimonthly => {
            if date.day() <= 15 {
                Some(PayrollPeriod {
                    start_date: date.with_day(1)?,
                    end_date: date.with_day(15)?,
                })
            } else {
                Some(PayrollPeriod {
                    start_date: date.with_day(16)?,
                    end_date: month_end(date)?,
                })
            }
        }
        _ => Some(PayrollPeriod {
            start_date: date,
            end_date: end_date(date, frequency)?,
        }),
    }
}

fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test_case("2017-01-01", PayrollFrequency::Monthly => Some(d("2017-01-31")); "monthly from first")]
    #[test_case("2017-02-01", PayrollFrequency::Monthly => Some(d("2017-02-28")); "monthly in february")]
    #[test_case("2017-02-15", PayrollFrequency::Monthly => Some(d("2017-03-14")); "monthly mid month")]
    #[test_case("2017-02-01", PayrollFrequency::Fortnightly => Some(d("2017-02-14")); "fortnightly")]
    #[test_case("2017-02-01", PayrollFrequency::Weekly => Some(d("2017-02-07")); "weekly")]
    #[test_case("2017-02-15", PayrollFrequency::Daily => Some(d("2017-02-15")); "daily")]
    #[test_case("2017-02-01", PayrollFrequency::Bimonthly => None; "bimonthly first half")]
    #[test_case("2020-02-15", PayrollFrequency::Bimonthly => None; "bimonthly mid month")]
    fn end_date_cases(start: &str, frequency: PayrollFrequency) -> Option<NaiveDate> {
        end_date(d(start), frequency)
    }

    #[test_case(PayrollFrequency::Monthly, "2024-02-10" => "2024-02-01..2024-02-29"; "leap february")]
    #[test_case(PayrollFrequency::Bimonthly, "2024-03-15" => "2024-03-01..2024-03-15"; "first half")]
    #[test_case(PayrollFrequency::Bimonthly, "2024-03-16" => "2024-03-16..2024-03-31"; "second half")]
    #[test_case(PayrollFrequency::Weekly, "2024-03-16" => "2024-03-16..2024-03-22"; "weekly starts at date")]
    fn period_cases(frequency: PayrollFrequency, date: &str) -> String {
        let period = period_containing(frequency, d(date)).unwrap();
        format!("{}..{}", period.start_date, period.end_date)
    }
}
