//! Memoized report generation over one snapshot.
//!
//! An [`Engine`] owns the current [`Snapshot`] and remembers the
//! [`ReportBook`] produced for each distinct [`FilterContext`]. Asking for the
//! same context twice reuses the first result; replacing the snapshot forgets
//! everything.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use crate::context::FilterContext;
use crate::report::{self, Report, ReportBook, ReportId};
use crate::source::{EntitySource, Snapshot};

/// Distinct contexts remembered before the memo is flushed.
const MEMO_CAPACITY: usize = 32;

#[derive(Debug, Default)]
pub struct Engine {
    snapshot: Snapshot,
    memo: HashMap<FilterContext, ReportBook>,
}

impl Engine {
    #[must_use]
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            memo: HashMap::new(),
        }
    }

    /// Fetch a fresh snapshot from `source`.
    pub fn load<S: EntitySource + ?Sized>(source: &S) -> Self {
        Self::new(Snapshot::load(source))
    }

    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Swap in a new snapshot; every memoized book is dropped.
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.memo.clear();
    }

    /// Number of contexts currently memoized.
    #[must_use]
    pub fn memoized(&self) -> usize {
        self.memo.len()
    }

    /// The full report book for `ctx`, computed at most once per context.
    pub fn generate(&mut self, ctx: &FilterContext) -> &ReportBook {
        if self.memo.len() >= MEMO_CAPACITY && !self.memo.contains_key(ctx) {
            debug!(capacity = MEMO_CAPACITY, "report memo full, flushing");
            self.memo.clear();
        }

        match self.memo.entry(ctx.clone()) {
            Entry::Occupied(entry) => {
                debug!("report memo hit");
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(report::generate(&self.snapshot, ctx)),
        }
    }

    /// One report out of the memoized book for `ctx`.
    pub fn report(&mut self, id: ReportId, ctx: &FilterContext) -> Option<&Report> {
        self.generate(ctx).get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DateRange;
    use crate::model::{Member, Sex};
    use crate::source::Collection;
    use chrono::NaiveDate;

    fn d(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn members(sexes: &[Sex]) -> Snapshot {
        let records = sexes
            .iter()
            .enumerate()
            .map(|(idx, sex)| Member {
                id: format!("m{idx}"),
                sex: *sex,
                registration_date: Some(d("2024-05-01")),
                ..Member::default()
            })
            .collect();
        Snapshot {
            members: Collection::loaded(records),
            ..Snapshot::default()
        }
    }

    #[test]
    fn same_context_is_computed_once() {
        let mut engine = Engine::new(members(&[Sex::Male, Sex::Female]));
        let ctx = FilterContext::new(d("2025-01-01"));

        let first = engine.generate(&ctx).clone();
        let second = engine.generate(&ctx).clone();
        assert_eq!(first, second);
        assert_eq!(engine.memoized(), 1);

        let ranged = ctx.with_range(DateRange::new(Some(d("2025-01-01")), None));
        let narrowed = engine.report(ReportId::MembersBySex, &ranged).unwrap();
        assert_eq!(narrowed.total, 0);
        assert_eq!(engine.memoized(), 2);
    }

    #[test]
    fn replacing_the_snapshot_forgets_old_books() {
        let mut engine = Engine::new(members(&[Sex::Male]));
        let ctx = FilterContext::new(d("2025-01-01"));
        let before = engine.report(ReportId::MembersBySex, &ctx).unwrap();
        assert_eq!(before.total, 1);

        engine.replace_snapshot(members(&[Sex::Male, Sex::Female, Sex::Female]));
        assert_eq!(engine.memoized(), 0);
        let after = engine.report(ReportId::MembersBySex, &ctx).unwrap();
        assert_eq!(after.total, 3);
    }

    #[test]
    fn memo_is_bounded() {
        let mut engine = Engine::new(members(&[Sex::Unknown]));
        let base = d("2025-01-01");
        for offset in 0..=u64::try_from(MEMO_CAPACITY).unwrap() {
            let today = base + chrono::Days::new(offset);
            engine.generate(&FilterContext::new(today));
        }
        assert!(engine.memoized() <= MEMO_CAPACITY);
    }
}
