use chrono::Datelike;

use super::members::year_label;
use super::rows::TerminatedRow;
use super::{Body, Order, Prepared, Row, shares};
use crate::aggregate::group_by;
use crate::resolve::UNKNOWN;

pub(super) fn by_sector(prepared: &Prepared<'_>) -> Body {
    let sectors = prepared
        .terminated
        .iter()
        .map(|&t| t.union.sector.as_deref().unwrap_or(UNKNOWN));
    let grouping = group_by(sectors, |sector| Some(*sector));
    shares(&grouping, Order::Count, |sector| (*sector).to_string())
}

pub(super) fn by_year(prepared: &Prepared<'_>) -> Body {
    let grouping = group_by(&prepared.terminated, |t| {
        Some(t.terminated_date.map(|d| d.year()))
    });
    shares(&grouping, Order::Key, |year| year_label(*year))
}

/// Archive listing, most recent termination first.
pub(super) fn registry(prepared: &Prepared<'_>) -> Body {
    let mut rows: Vec<TerminatedRow> = prepared
        .terminated
        .iter()
        .map(|&t| TerminatedRow {
            union_id: t.union.id.clone(),
            union_code: t.union.code.clone(),
            name: t.union.display_name().to_string(),
            sector: t.union.sector.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            terminated_date: t.terminated_date,
            reason: t.reason.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        })
        .collect();
    rows.sort_by(|a, b| {
        (a.terminated_date.is_none(), b.terminated_date)
            .cmp(&(b.terminated_date.is_none(), a.terminated_date))
            .then_with(|| a.union_id.cmp(&b.union_id))
    });

    Body::listing(rows.into_iter().map(Row::Terminated).collect())
}
