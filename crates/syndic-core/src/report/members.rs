use chrono::Datelike;

use super::{Body, Order, Prepared, shares};
use crate::aggregate::{Grouping, group_by};
use crate::context::FilterContext;
use crate::derive::{AgeBracket, age_bracket};
use crate::model::Sex;
use crate::resolve::UNKNOWN;

pub(super) fn by_sex(prepared: &Prepared<'_>) -> Body {
    let grouping = Grouping::seeded(Sex::ALL).tally(&prepared.members, |m| Some(m.sex));
    shares(&grouping, Order::Key, |sex| sex.label().to_string())
}

/// Members without a usable birth date are in neither bracket nor the total.
pub(super) fn by_age_bracket(prepared: &Prepared<'_>, ctx: &FilterContext) -> Body {
    let grouping = Grouping::seeded(AgeBracket::ALL)
        .tally(&prepared.members, |m| age_bracket(m.birth_date, ctx.today));
    shares(&grouping, Order::Key, |bracket| bracket.label().to_string())
}

pub(super) fn by_sex_and_age(prepared: &Prepared<'_>, ctx: &FilterContext) -> Body {
    let seeds = Sex::ALL
        .into_iter()
        .flat_map(|sex| AgeBracket::ALL.map(|bracket| (sex, bracket)));
    let grouping = Grouping::seeded(seeds).tally(&prepared.members, |m| {
        age_bracket(m.birth_date, ctx.today).map(|bracket| (m.sex, bracket))
    });
    shares(&grouping, Order::Key, |(sex, bracket)| {
        format!("{} / {}", sex.label(), bracket.label())
    })
}

pub(super) fn by_sector(prepared: &Prepared<'_>) -> Body {
    let xref = &prepared.xref;
    let grouping = group_by(&prepared.members, |m| {
        Some(xref.union_sector(m.union_id.as_deref()))
    });
    shares(&grouping, Order::Count, |sector| (*sector).to_string())
}

pub(super) fn by_organization(prepared: &Prepared<'_>) -> Body {
    let xref = &prepared.xref;
    let grouping = group_by(&prepared.members, |m| {
        Some(xref.union_organization(m.union_id.as_deref()))
    });
    shares(&grouping, Order::Count, |org| (*org).to_string())
}

/// Grouped by resolved union id, labelled with the union's name. Members
/// with no union or a dangling reference share one `Unknown` row.
pub(super) fn by_union(prepared: &Prepared<'_>) -> Body {
    let xref = &prepared.xref;
    let grouping = group_by(&prepared.members, |m| {
        Some(xref.union(m.union_id.as_deref()).map(|u| u.id.as_str()))
    });
    shares(&grouping, Order::Count, |union_id| {
        xref.union_name(*union_id).to_string()
    })
}

pub(super) fn by_registration_year(prepared: &Prepared<'_>) -> Body {
    let grouping = group_by(&prepared.members, |m| {
        Some(m.registration_date.map(|d| d.year()))
    });
    shares(&grouping, Order::Key, |year| year_label(*year))
}

/// Year key label; undated records group under `Unknown`.
pub(super) fn year_label(year: Option<i32>) -> String {
    year.map_or_else(|| UNKNOWN.to_string(), |y| y.to_string())
}
