//! Links between child rows of a plan before and after the parent rows exist.
//!
//! Sub-assembly rows are built against finished-good rows that may not have
//! been persisted yet. They carry a [`RowRef::Provisional`] key until the
//! parent rows are saved, after which [`reconcile_references`] rewrites each
//! key to the durable id recorded in an [`IdentityMap`].

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Local key handed out while a plan is being assembled in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProvisionalKey(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowRef {
    Provisional(ProvisionalKey),
    Durable(Uuid),
}

impl RowRef {
    pub fn durable_id(&self) -> Option<Uuid> {
        match self {
            RowRef::Durable(id) => Some(*id),
            RowRef::Provisional(_) => None,
        }
    }
}

/// Provisional key to durable id, filled in as parent rows are persisted.
#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
    resolved: HashMap<ProvisionalKey, Uuid>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: ProvisionalKey, id: Uuid) {
        self.resolved.insert(key, id);
    }

    pub fn resolve(&self, key: ProvisionalKey) -> Option<Uuid> {
        self.resolved.get(&key).copied()
    }

    pub fn durable_ids(&self) -> HashSet<Uuid> {
        self.resolved.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

/// Rows that point at a parent row.
pub trait ParentLinked {
    fn parent_ref(&self) -> Option<RowRef>;
    fn set_parent_ref(&mut self, parent: Option<RowRef>);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub rewritten: usize,
    pub nulled: usize,
    pub unchanged: usize,
}

/// Rewrites provisional parent references to durable ids.
///
/// Provisional keys missing from `map`, and durable ids not in `live_ids`,
/// are cleared. Running it again over the output changes nothing.
pub fn reconcile_references<T: ParentLinked>(
    rows: &mut [T],
    map: &IdentityMap,
    live_ids: &HashSet<Uuid>,
) -> ReconciliationReport {
    let mut report = ReconciliationReport::default();

    for row in rows.iter_mut() {
        match row.parent_ref() {
            None => report.unchanged += 1,
            Some(RowRef::Durable(id)) if live_ids.contains(&id) => report.unchanged += 1,
            Some(RowRef::Durable(_)) => {
                row.set_parent_ref(None);
                report.nulled += 1;
            }
            Some(RowRef::Provisional(key)) => match map.resolve(key) {
                Some(id) if live_ids.contains(&id) => {
                    row.set_parent_ref(Some(RowRef::Durable(id)));
                    report.rewritten += 1;
                }
                _ => {
                    row.set_parent_ref(None);
                    report.nulled += 1;
                }
            },
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Child(Option<RowRef>);

    impl ParentLinked for Child {
        fn parent_ref(&self) -> Option<RowRef> {
            self.0
        }

        fn set_parent_ref(&mut self, parent: Option<RowRef>) {
            self.0 = parent;
        }
    }

    #[test]
    fn provisional_keys_are_rewritten_and_orphans_nulled() {
        let parent = Uuid::new_v4();
        let stale = Uuid::new_v4();
        let mut map = IdentityMap::new();
        map.record(ProvisionalKey(1), parent);

        let mut rows = vec![
            Child(Some(RowRef::Provisional(ProvisionalKey(1)))),
            Child(Some(RowRef::Provisional(ProvisionalKey(2)))),
            Child(Some(RowRef::Durable(stale))),
            Child(None),
        ];

        let report = reconcile_references(&mut rows, &map, &map.durable_ids());

        assert_eq!(rows[0], Child(Some(RowRef::Durable(parent))));
        assert_eq!(rows[1], Child(None));
        assert_eq!(rows[2], Child(None));
        assert_eq!(rows[3], Child(None));
        assert_eq!(
            report,
            ReconciliationReport {
                rewritten: 1,
                nulled: 2,
                unchanged: 1
            }
        );
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let parent = Uuid::new_v4();
        let mut map = IdentityMap::new();
        map.record(ProvisionalKey(7), parent);
        let live = map.durable_ids();

        let mut rows = vec![
            Child(Some(RowRef::Provisional(ProvisionalKey(7)))),
            Child(Some(RowRef::Provisional(ProvisionalKey(8)))),
        ];
        reconcile_references(&mut rows, &map, &live);
        let after_first = rows.clone();

        let report = reconcile_references(&mut rows, &map, &live);
        assert_eq!(rows, after_first);
        assert_eq!(report.rewritten, 0);
        assert_eq!(report.nulled, 0);
        assert_eq!(report.unchanged, 2);
    }

    proptest! {
        #[test]
        fn reconciliation_is_idempotent(keys in prop::collection::vec(0u32..10, 0..40), resolved in prop::collection::vec(0u32..10, 0..10)) {
            let mut map = IdentityMap::new();
            for key in &resolved {
                map.record(ProvisionalKey(*key), Uuid::from_u128(*key as u128 + 1));
            }
            let live = map.durable_ids();

            let mut rows: Vec<Child> = keys
                .iter()
                .map(|k| Child(Some(RowRef::Provisional(ProvisionalKey(*k)))))
                .collect();
            reconcile_references(&mut rows, &map, &live);
            let once = rows.clone();
            reconcile_references(&mut rows, &map, &live);

            prop_assert_eq!(&rows, &once);
            for row in &rows {
                prop_assert!(!matches!(row.0, Some(RowRef::Provisional(_))));
            }
        }
    }
}
