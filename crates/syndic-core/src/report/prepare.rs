use tracing::{debug, warn};

use crate::context::FilterContext;
use crate::filter::filter;
use crate::model::{Agreement, EntityKind, Executive, Incident, Member, TerminatedUnion, Union};
use crate::resolve::CrossRef;
use crate::source::Snapshot;

/// One generation's filtered collections and shared lookup indexes.
///
/// Collections are filtered by the context's date range. The indexes cover
/// the full loaded union and member collections, so a member registered in
/// range still resolves its union's sector when the union itself was
/// established outside the range.
#[derive(Debug)]
pub struct Prepared<'a> {
    snapshot: &'a Snapshot,
    pub members: Vec<&'a Member>,
    pub unions: Vec<&'a Union>,
    pub executives: Vec<&'a Executive>,
    pub agreements: Vec<&'a Agreement>,
    pub incidents: Vec<&'a Incident>,
    pub terminated: Vec<&'a TerminatedUnion>,
    pub xref: CrossRef<'a>,
}

impl<'a> Prepared<'a> {
    pub fn new(snapshot: &'a Snapshot, ctx: &FilterContext) -> Self {
        let range = &ctx.range;
        let all_unions = snapshot.unions.records().unwrap_or_default();
        let all_members = snapshot.members.records().unwrap_or_default();

        let prepared = Self {
            snapshot,
            members: filter(all_members, range),
            unions: filter(all_unions, range),
            executives: filter(snapshot.executives.records().unwrap_or_default(), range),
            agreements: filter(snapshot.agreements.records().unwrap_or_default(), range),
            incidents: filter(snapshot.incidents.records().unwrap_or_default(), range),
            terminated: filter(snapshot.terminated.records().unwrap_or_default(), range),
            xref: CrossRef::build(all_unions, all_members),
        };

        debug!(
            members = prepared.members.len(),
            unions = prepared.unions.len(),
            executives = prepared.executives.len(),
            agreements = prepared.agreements.len(),
            incidents = prepared.incidents.len(),
            terminated = prepared.terminated.len(),
            "collections filtered"
        );
        let dangling = prepared.dangling_union_refs();
        if dangling > 0 && snapshot.is_available(EntityKind::Unions) {
            warn!(dangling, "records reference unknown unions");
        }
        prepared
    }

    /// In-range records whose union reference does not resolve.
    fn dangling_union_refs(&self) -> usize {
        let dangles = |union_id: Option<&str>| {
            union_id.is_some() && self.xref.union(union_id).is_none()
        };
        let members = self.members.iter().map(|m| m.union_id.as_deref());
        let executives = self.executives.iter().map(|e| e.union_id.as_deref());
        let agreements = self.agreements.iter().map(|a| a.union_id.as_deref());
        let incidents = self.incidents.iter().map(|i| i.union_id.as_deref());
        members
            .chain(executives)
            .chain(agreements)
            .chain(incidents)
            .filter(|union_id| dangles(*union_id))
            .count()
    }

    /// Kinds in `required` whose fetch failed.
    #[must_use]
    pub fn missing(&self, required: &[EntityKind]) -> Vec<EntityKind> {
        required
            .iter()
            .copied()
            .filter(|kind| !self.snapshot.is_available(*kind))
            .collect()
    }
}
