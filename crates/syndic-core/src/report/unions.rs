use std::collections::HashMap;

use chrono::Datelike;

use super::members::year_label;
use super::rows::UnionDirectoryRow;
use super::{Body, Order, Prepared, Row, shares};
use crate::aggregate::{Grouping, group_by};
use crate::resolve::UNKNOWN;

const WITH_PLAN: &str = "With plan";
const WITHOUT_PLAN: &str = "Without plan";
const AUDITED: &str = "Audited";
const NOT_AUDITED: &str = "Not audited";

pub(super) fn by_sector(prepared: &Prepared<'_>) -> Body {
    let sectors = prepared
        .unions
        .iter()
        .map(|&u| u.sector.as_deref().unwrap_or(UNKNOWN));
    let grouping = group_by(sectors, |sector| Some(*sector));
    shares(&grouping, Order::Count, |sector| (*sector).to_string())
}

pub(super) fn by_organization(prepared: &Prepared<'_>) -> Body {
    let orgs = prepared
        .unions
        .iter()
        .map(|&u| u.organization.as_deref().unwrap_or(UNKNOWN));
    let grouping = group_by(orgs, |org| Some(*org));
    shares(&grouping, Order::Count, |org| (*org).to_string())
}

pub(super) fn by_established_year(prepared: &Prepared<'_>) -> Body {
    let grouping = group_by(&prepared.unions, |u| {
        Some(u.established_date.map(|d| d.year()))
    });
    shares(&grouping, Order::Key, |year| year_label(*year))
}

pub(super) fn strategic_plan(prepared: &Prepared<'_>) -> Body {
    let grouping = Grouping::seeded([WITH_PLAN, WITHOUT_PLAN]).tally(&prepared.unions, |u| {
        Some(if u.strategic_plan { WITH_PLAN } else { WITHOUT_PLAN })
    });
    shares(&grouping, Order::Key, |label| (*label).to_string())
}

pub(super) fn external_audit(prepared: &Prepared<'_>) -> Body {
    let grouping = Grouping::seeded([AUDITED, NOT_AUDITED]).tally(&prepared.unions, |u| {
        Some(if u.external_audit_date.is_some() {
            AUDITED
        } else {
            NOT_AUDITED
        })
    });
    shares(&grouping, Order::Key, |label| (*label).to_string())
}

/// Per-union counts of in-range members, executives, and agreements.
pub(super) fn directory(prepared: &Prepared<'_>) -> Body {
    let members = count_by_union(prepared.members.iter().map(|&m| m.union_id.as_deref()));
    let executives = count_by_union(prepared.executives.iter().map(|&e| e.union_id.as_deref()));
    let agreements = count_by_union(prepared.agreements.iter().map(|&a| a.union_id.as_deref()));
    let lookup = |counts: &HashMap<&str, usize>, id: &str| counts.get(id).copied().unwrap_or(0);

    let mut rows: Vec<UnionDirectoryRow> = prepared
        .unions
        .iter()
        .map(|u| UnionDirectoryRow {
            union_id: u.id.clone(),
            union_code: u.code.clone(),
            name: u.display_name().to_string(),
            sector: u.sector.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            organization: u.organization.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            members: lookup(&members, &u.id),
            executives: lookup(&executives, &u.id),
            agreements: lookup(&agreements, &u.id),
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.union_id.cmp(&b.union_id)));

    Body::listing(rows.into_iter().map(Row::UnionDirectory).collect())
}

fn count_by_union<'a>(refs: impl Iterator<Item = Option<&'a str>>) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for id in refs.flatten() {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}
