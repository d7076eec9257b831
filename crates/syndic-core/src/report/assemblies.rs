use super::rows::AssemblyRow;
use super::{Body, Prepared, Row};
use crate::context::FilterContext;
use crate::date::days_until;
use crate::derive::is_upcoming;

/// General assemblies by date. With a `window`, only assemblies strictly
/// ahead of today and no more than `window` days out are kept.
pub(super) fn schedule(prepared: &Prepared<'_>, ctx: &FilterContext, window: Option<u32>) -> Body {
    let mut rows: Vec<AssemblyRow> = prepared
        .unions
        .iter()
        .filter_map(|&u| {
            let assembly_date = u.general_assembly_date?;
            let days = days_until(assembly_date, ctx.today);
            window
                .is_none_or(|window| is_upcoming(days, window))
                .then(|| AssemblyRow {
                    union_id: u.id.clone(),
                    union: u.display_name().to_string(),
                    assembly_date,
                    days_until: days,
                })
        })
        .collect();
    rows.sort_by(|a, b| {
        a.days_until
            .cmp(&b.days_until)
            .then_with(|| a.union_id.cmp(&b.union_id))
    });

    Body::listing(rows.into_iter().map(Row::Assembly).collect())
}
