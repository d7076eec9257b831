use super::rows::MetricRow;
use super::{Body, Prepared, Row};
use crate::context::FilterContext;
use crate::derive::{AgeBracket, AgreementStatus, age_bracket, agreement_status};
use crate::model::Sex;

/// Headline counts for the union named by the `union_id` selector.
///
/// Counts cover the in-range collections. No selection, or a selection that
/// does not resolve to a known union, yields an empty report.
pub(super) fn union_profile(prepared: &Prepared<'_>, ctx: &FilterContext) -> Body {
    let Some(union) = prepared.xref.union(ctx.selectors.union_id.as_deref()) else {
        return Body::default();
    };
    let belongs = |union_id: Option<&str>| union_id == Some(union.id.as_str());

    let members: Vec<_> = prepared
        .members
        .iter()
        .filter(|m| belongs(m.union_id.as_deref()))
        .collect();
    let brackets: Vec<_> = members
        .iter()
        .filter_map(|m| age_bracket(m.birth_date, ctx.today))
        .collect();
    let agreements: Vec<_> = prepared
        .agreements
        .iter()
        .filter(|a| belongs(a.union_id.as_deref()))
        .collect();
    let incidents: Vec<_> = prepared
        .incidents
        .iter()
        .filter(|i| belongs(i.union_id.as_deref()))
        .collect();

    let count_sex = |sex: Sex| members.iter().filter(|m| m.sex == sex).count();
    let count_bracket = |bracket: AgeBracket| brackets.iter().filter(|b| **b == bracket).count();

    let metrics = [
        ("members", members.len()),
        ("male", count_sex(Sex::Male)),
        ("female", count_sex(Sex::Female)),
        ("youth", count_bracket(AgeBracket::Youth)),
        ("elder", count_bracket(AgeBracket::Elder)),
        (
            "executives",
            prepared
                .executives
                .iter()
                .filter(|e| belongs(e.union_id.as_deref()))
                .count(),
        ),
        ("agreements", agreements.len()),
        (
            "agreements_ongoing",
            agreements
                .iter()
                .filter(|a| agreement_status(a, ctx.today) == AgreementStatus::Ongoing)
                .count(),
        ),
        ("incidents", incidents.len()),
        (
            "incidents_reportable",
            incidents
                .iter()
                .filter(|incident| incident.regulatory_report_required)
                .count(),
        ),
    ];

    Body::listing(
        metrics
            .into_iter()
            .map(|(metric, value)| {
                Row::Metric(MetricRow {
                    metric: metric.to_string(),
                    value,
                })
            })
            .collect(),
    )
}
