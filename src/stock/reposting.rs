use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum RepostStatus {
    #[sea_orm(string_value = "Queued")]
    Queued,
    #[sea_orm(string_value = "In Progress")]
    InProgress,
    #[sea_orm(string_value = "Completed")]
    Completed,
    #[sea_orm(string_value = "Skipped")]
    Skipped,
    #[sea_orm(string_value = "Failed")]
    Failed,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum RepostBasedOn {
    #[sea_orm(string_value = "Item and Warehouse")]
    ItemAndWarehouse,
    #[sea_orm(string_value = "Transaction")]
    Transaction,
}

/// Which of several queued reposts for the same item and warehouse survives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecencyPolicy {
    /// Keep the entry with the latest posting date and time
    #[default]
    LatestWins,
    /// Keep the entry with the earliest posting date and time
    EarliestWins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepostCandidate {
    pub id: Uuid,
    pub posting_date: NaiveDate,
    pub posting_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupDecision {
    pub keep: Uuid,
    pub skip: Vec<Uuid>,
}

/// Picks the survivor among queued reposts sharing an item and warehouse.
///
/// Entries with the same posting date and time are ranked by submission,
/// earliest first. Returns `None` for an empty slice.
pub fn deduplicate(candidates: &[RepostCandidate], policy: RecencyPolicy) -> Option<DedupDecision> {
    let keep = candidates.iter().min_by(|a, b| rank(a, b, policy))?;

    let skip = candidates
        .iter()
        .filter(|c| c.id != keep.id)
        .map(|c| c.id)
        .collect();

    Some(DedupDecision { keep: keep.id, skip })
}

/// `Less` means `a` should be kept over `b`.
fn rank(a: &RepostCandidate, b: &RepostCandidate, policy: RecencyPolicy) -> Ordering {
    let posting = (a.posting_date, a.posting_time).cmp(&(b.posting_date, b.posting_time));
    let posting = match policy {
        RecencyPolicy::LatestWins => posting.reverse(),
        RecencyPolicy::EarliestWins => posting,
    };

    posting
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn candidate(n: u128, day: u32, minute: u32, created_offset: i64) -> RepostCandidate {
        RepostCandidate {
            id: Uuid::from_u128(n),
            posting_date: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
            posting_time: NaiveTime::from_hms_opt(0, minute, 0).unwrap(),
            created_at: Utc.with_ymd_and_hms(2021, 2, 1, 0, 0, 0).unwrap()
                + chrono::Duration::seconds(created_offset),
        }
    }

    #[test]
    fn latest_posting_survives_by_default() {
        let older = candidate(1, 2, 1, 0);
        let newer = candidate(2, 3, 1, 10);

        let decision = deduplicate(&[older, newer], RecencyPolicy::default()).unwrap();
        assert_eq!(decision.keep, newer.id);
        assert_eq!(decision.skip, vec![older.id]);

        let reversed = deduplicate(&[newer, older], RecencyPolicy::LatestWins).unwrap();
        assert_eq!(reversed.keep, newer.id);
    }

    #[test]
    fn earliest_policy_keeps_oldest_posting() {
        let a = candidate(1, 2, 1, 0);
        let b = candidate(2, 3, 1, 10);
        let c = candidate(3, 1, 1, 20);

        let decision = deduplicate(&[a, b, c], RecencyPolicy::EarliestWins).unwrap();
        assert_eq!(decision.keep, c.id);
        assert_eq!(decision.skip, vec![a.id, b.id]);
    }

    #[test]
    fn posting_time_breaks_same_day() {
        let early = candidate(1, 2, 1, 0);
        let late = candidate(2, 2, 30, 0);
        assert_eq!(
            deduplicate(&[early, late], RecencyPolicy::LatestWins)
                .unwrap()
                .keep,
            late.id
        );
    }

    #[test]
    fn ties_keep_first_submitted() {
        let first = candidate(9, 2, 1, 0);
        let second = candidate(1, 2, 1, 5);
        for policy in [RecencyPolicy::LatestWins, RecencyPolicy::EarliestWins] {
            let decision = deduplicate(&[second, first], policy).unwrap();
            assert_eq!(decision.keep, first.id);
        }
    }

    #[test]
    fn empty_input_has_no_decision() {
        assert_eq!(deduplicate(&[], RecencyPolicy::LatestWins), None);
    }

    proptest! {
        #[test]
        fn exactly_one_survivor_regardless_of_order(
            specs in prop::collection::vec((1u32..28, 0u32..60, 0i64..1000), 1..20),
            rotate in 0usize..20
        ) {
            let candidates: Vec<_> = specs
                .iter()
                .enumerate()
                .map(|(i, (day, minute, created))| candidate(i as u128 + 1, *day, *minute, *created))
                .collect();
            let mut shuffled = candidates.clone();
            let len = shuffled.len();
            shuffled.rotate_left(rotate % len);

            let a = deduplicate(&candidates, RecencyPolicy::LatestWins).unwrap();
            let b = deduplicate(&shuffled, RecencyPolicy::LatestWins).unwrap();
            prop_assert_eq!(a.keep, b.keep);
            prop_assert_eq!(a.skip.len(), candidates.len() - 1);
            prop_assert!(!a.skip.contains(&a.keep));

            let kept = candidates.iter().find(|c| c.id == a.keep).unwrap();
            for c in &candidates {
                prop_assert!((kept.posting_date, kept.posting_time) >= (c.posting_date, c.posting_time));
            }
        }
    }
}
