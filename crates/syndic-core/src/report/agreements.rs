use chrono::Datelike;

use super::members::year_label;
use super::rows::AgreementExpiryRow;
use super::{Body, Order, Prepared, Row, shares};
use crate::aggregate::{Grouping, group_by};
use crate::context::FilterContext;
use crate::derive::{AgreementStatus, agreement_status, days_until_expiry, is_expiring_soon};
use crate::resolve::UNKNOWN;

pub(super) fn by_status(prepared: &Prepared<'_>, ctx: &FilterContext) -> Body {
    let grouping = Grouping::seeded(AgreementStatus::ALL).tally(&prepared.agreements, |a| {
        Some(agreement_status(a, ctx.today))
    });
    shares(&grouping, Order::Key, |status| status.label().to_string())
}

pub(super) fn by_sector(prepared: &Prepared<'_>) -> Body {
    let xref = &prepared.xref;
    let grouping = group_by(&prepared.agreements, |a| {
        Some(xref.union_sector(a.union_id.as_deref()))
    });
    shares(&grouping, Order::Count, |sector| (*sector).to_string())
}

pub(super) fn by_registration_year(prepared: &Prepared<'_>) -> Body {
    let grouping = group_by(&prepared.agreements, |a| {
        Some(a.registration_date.map(|d| d.year()))
    });
    shares(&grouping, Order::Key, |year| year_label(*year))
}

pub(super) fn by_round(prepared: &Prepared<'_>) -> Body {
    let rounds = prepared
        .agreements
        .iter()
        .map(|&a| a.round.as_deref().unwrap_or(UNKNOWN));
    let grouping = group_by(rounds, |round| Some(*round));
    shares(&grouping, Order::Count, |round| (*round).to_string())
}

/// Agreements within `agreement_expiry_days` of their end date, on either
/// side. Agreements without an end date never appear.
pub(super) fn expiring(prepared: &Prepared<'_>, ctx: &FilterContext) -> Body {
    let window = ctx.selectors.agreement_expiry_days;
    let xref = &prepared.xref;
    let mut rows: Vec<AgreementExpiryRow> = prepared
        .agreements
        .iter()
        .filter_map(|&a| {
            let end_date = a.next_end_date?;
            let days = days_until_expiry(a, ctx.today)?;
            is_expiring_soon(days, window).then(|| AgreementExpiryRow {
                agreement_id: a.id.clone(),
                union: xref.union_name(a.union_id.as_deref()).to_string(),
                status: agreement_status(a, ctx.today),
                end_date,
                days_until_expiry: days,
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        a.days_until_expiry
            .cmp(&b.days_until_expiry)
            .then_with(|| a.agreement_id.cmp(&b.agreement_id))
    });

    Body::listing(rows.into_iter().map(Row::AgreementExpiry).collect())
}
