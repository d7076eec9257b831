use super::rows::IncidentRow;
use super::{Body, Order, Prepared, Row, shares};
use crate::aggregate::{Grouping, group_by};
use crate::context::FilterContext;
use crate::model::{Incident, Severity};
use crate::resolve::{CrossRef, UNKNOWN};

const REPORTABLE: &str = "Reportable";
const NOT_REPORTABLE: &str = "Not reportable";

pub(super) fn by_category(prepared: &Prepared<'_>) -> Body {
    let categories = prepared
        .incidents
        .iter()
        .map(|&i| i.category.as_deref().unwrap_or(UNKNOWN));
    let grouping = group_by(categories, |category| Some(*category));
    shares(&grouping, Order::Count, |category| (*category).to_string())
}

pub(super) fn by_injury_severity(prepared: &Prepared<'_>) -> Body {
    let grouping =
        Grouping::seeded(Severity::ALL).tally(&prepared.incidents, |i| Some(i.injury_severity));
    shares(&grouping, Order::Key, |level| level.label().to_string())
}

pub(super) fn by_damage_severity(prepared: &Prepared<'_>) -> Body {
    let grouping =
        Grouping::seeded(Severity::ALL).tally(&prepared.incidents, |i| Some(i.damage_severity));
    shares(&grouping, Order::Key, |level| level.label().to_string())
}

pub(super) fn by_status(prepared: &Prepared<'_>) -> Body {
    let statuses = prepared
        .incidents
        .iter()
        .map(|&i| i.status.as_deref().unwrap_or(UNKNOWN));
    let grouping = group_by(statuses, |status| Some(*status));
    shares(&grouping, Order::Count, |status| (*status).to_string())
}

pub(super) fn reportable(prepared: &Prepared<'_>) -> Body {
    let grouping = Grouping::seeded([REPORTABLE, NOT_REPORTABLE]).tally(&prepared.incidents, |i| {
        Some(if i.regulatory_report_required {
            REPORTABLE
        } else {
            NOT_REPORTABLE
        })
    });
    shares(&grouping, Order::Key, |label| (*label).to_string())
}

/// Incidents whose worse severity reaches `min_severity`, newest first.
pub(super) fn serious(prepared: &Prepared<'_>, ctx: &FilterContext) -> Body {
    let threshold = ctx.selectors.min_severity;
    let mut rows: Vec<IncidentRow> = prepared
        .incidents
        .iter()
        .filter(|i| i.worst_severity().is_at_least(threshold))
        .map(|&i| incident_row(i, &prepared.xref))
        .collect();
    rows.sort_by(|a, b| {
        (a.occurred_on.is_none(), b.occurred_on)
            .cmp(&(b.occurred_on.is_none(), a.occurred_on))
            .then_with(|| a.incident_id.cmp(&b.incident_id))
    });

    Body::listing(rows.into_iter().map(Row::Incident).collect())
}

fn incident_row(incident: &Incident, xref: &CrossRef<'_>) -> IncidentRow {
    IncidentRow {
        incident_id: incident.id.clone(),
        union: xref.union_name(incident.union_id.as_deref()).to_string(),
        occurred_on: incident.occurred_on,
        category: incident
            .category
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        injury_severity: incident.injury_severity,
        damage_severity: incident.damage_severity,
        status: incident
            .status
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        reportable: incident.regulatory_report_required,
    }
}
