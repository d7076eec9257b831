//! Date-range filtering, applied uniformly to every entity kind.
//!
//! Each kind names exactly one filter date (unions name two and match on
//! either). All reports go through [`filter`], so a single active range
//! means the same thing everywhere.

use crate::context::DateRange;
use crate::model::{Agreement, Executive, Incident, Member, TerminatedUnion, Union};

/// An entity the global date range applies to.
pub trait DateFiltered {
    fn in_range(&self, range: &DateRange) -> bool;
}

impl DateFiltered for Member {
    fn in_range(&self, range: &DateRange) -> bool {
        range.admits(self.registration_date)
    }
}

impl DateFiltered for Union {
    fn in_range(&self, range: &DateRange) -> bool {
        range.admits(self.established_date) || range.admits(self.general_assembly_date)
    }
}

impl DateFiltered for Executive {
    fn in_range(&self, range: &DateRange) -> bool {
        range.admits(self.appointed_date)
    }
}

impl DateFiltered for Agreement {
    fn in_range(&self, range: &DateRange) -> bool {
        range.admits(self.registration_date)
    }
}

impl DateFiltered for Incident {
    fn in_range(&self, range: &DateRange) -> bool {
        range.admits(self.occurred_on)
    }
}

impl DateFiltered for TerminatedUnion {
    fn in_range(&self, range: &DateRange) -> bool {
        range.admits(self.terminated_date)
    }
}

/// Records admitted by `range`, in source order.
///
/// An inactive range returns every record.
#[must_use]
pub fn filter<'a, T: DateFiltered>(records: &'a [T], range: &DateRange) -> Vec<&'a T> {
    if !range.is_active() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| record.in_range(range))
        .collect()
}
