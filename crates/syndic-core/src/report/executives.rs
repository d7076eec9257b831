use super::rows::ExecutiveTermRow;
use super::{Body, Order, Prepared, Row, shares};
use crate::aggregate::{Grouping, group_by};
use crate::context::FilterContext;
use crate::derive::{is_term_ending, term_end, term_remaining_days};
use crate::model::Sex;
use crate::resolve::UNKNOWN;

pub(super) fn by_position(prepared: &Prepared<'_>) -> Body {
    let positions = prepared
        .executives
        .iter()
        .map(|&e| e.position.as_deref().unwrap_or(UNKNOWN));
    let grouping = group_by(positions, |position| Some(*position));
    shares(&grouping, Order::Count, |position| (*position).to_string())
}

/// Sex comes from the executive's member record; unresolved members count as
/// `Unknown`.
pub(super) fn by_sex(prepared: &Prepared<'_>) -> Body {
    let xref = &prepared.xref;
    let grouping = Grouping::seeded(Sex::ALL).tally(&prepared.executives, |e| {
        Some(xref.member_sex(e.member_id.as_deref()))
    });
    shares(&grouping, Order::Key, |sex| sex.label().to_string())
}

/// Term listing. With a `window`, only terms whose remaining days fall in
/// `0..=window` are kept; executives without a computable term end drop out.
pub(super) fn terms(prepared: &Prepared<'_>, ctx: &FilterContext, window: Option<u32>) -> Body {
    let xref = &prepared.xref;
    let mut rows: Vec<ExecutiveTermRow> = prepared
        .executives
        .iter()
        .filter_map(|&e| {
            let remaining_days = term_remaining_days(e, ctx.today);
            let in_window = window.is_none_or(|window| {
                remaining_days.is_some_and(|days| is_term_ending(days, window))
            });
            in_window.then(|| ExecutiveTermRow {
                executive_id: e.id.clone(),
                union: xref.union_name(e.union_id.as_deref()).to_string(),
                member: xref.member_name(e.member_id.as_deref()).to_string(),
                position: e.position.clone().unwrap_or_else(|| UNKNOWN.to_string()),
                appointed_date: e.appointed_date,
                term_end: term_end(e),
                remaining_days,
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        (a.remaining_days.is_none(), a.remaining_days)
            .cmp(&(b.remaining_days.is_none(), b.remaining_days))
            .then_with(|| a.executive_id.cmp(&b.executive_id))
    });

    Body::listing(rows.into_iter().map(Row::ExecutiveTerm).collect())
}
