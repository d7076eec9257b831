//! Report assembly.
//!
//! [`generate`] runs the whole pipeline for one [`FilterContext`]: filter every
//! collection once, build the lookup indexes once, then hand the same
//! [`Prepared`] view to each assembler in the catalogue. Assemblers never fetch
//! or filter on their own, so every report in a [`ReportBook`] reflects the
//! same range and the same classification rules.

mod agreements;
mod archive;
mod assemblies;
pub mod catalog;
mod executives;
mod incidents;
mod members;
mod prepare;
mod profile;
pub mod rows;
mod unions;

use serde::Serialize;
use tracing::{info, instrument};

use crate::aggregate::{Grouping, rank_by_count};
use crate::context::FilterContext;
use crate::model::EntityKind;
use crate::source::Snapshot;

pub use catalog::ReportId;
pub use prepare::Prepared;
pub use rows::{Row, ShareRow};

/// Whether a report could be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Ready,
    Unavailable,
}

/// One report result, consumed alike by charts, tables, and exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub id: ReportId,
    pub title: &'static str,
    pub status: ReportStatus,
    /// Entity kinds whose fetch failed, when unavailable.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<EntityKind>,
    pub rows: Vec<Row>,
    /// Sum of counts for share reports, row count for listings.
    pub total: usize,
}

impl Report {
    fn ready(id: ReportId, body: Body) -> Self {
        Self {
            id,
            title: id.title(),
            status: ReportStatus::Ready,
            missing: Vec::new(),
            rows: body.rows,
            total: body.total,
        }
    }

    const fn unavailable(id: ReportId, missing: Vec<EntityKind>) -> Self {
        Self {
            id,
            title: id.title(),
            status: ReportStatus::Unavailable,
            missing,
            rows: Vec::new(),
            total: 0,
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == ReportStatus::Ready
    }
}

/// Every report in the catalogue for one context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportBook {
    pub context: FilterContext,
    pub reports: Vec<Report>,
}

impl ReportBook {
    #[must_use]
    pub fn get(&self, id: ReportId) -> Option<&Report> {
        self.reports.iter().find(|report| report.id == id)
    }

    #[must_use]
    pub fn unavailable_count(&self) -> usize {
        self.reports.iter().filter(|r| !r.is_ready()).count()
    }
}

/// Rows and total produced by an assembler.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Body {
    pub rows: Vec<Row>,
    pub total: usize,
}

impl Body {
    /// A listing: the total is the number of rows.
    pub const fn listing(rows: Vec<Row>) -> Self {
        let total = rows.len();
        Self { rows, total }
    }
}

/// Row order for share reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Order {
    /// Key order: vocabulary order for enums, chronological for years.
    Key,
    /// Count descending, then key ascending.
    Count,
}

pub(crate) fn shares<K: Ord + Clone>(
    grouping: &Grouping<K>,
    order: Order,
    label: impl Fn(&K) -> String,
) -> Body {
    let mut shares = grouping.with_percentage();
    if order == Order::Count {
        rank_by_count(&mut shares);
    }
    let rows = shares
        .into_iter()
        .map(|share| {
            Row::Share(ShareRow {
                key: label(&share.key),
                count: share.count,
                percentage: share.percentage,
            })
        })
        .collect();
    Body {
        rows,
        total: grouping.total(),
    }
}

/// Assemble one report from an already prepared generation.
#[must_use]
pub fn assemble(id: ReportId, prepared: &Prepared<'_>, ctx: &FilterContext) -> Report {
    let missing = prepared.missing(id.depends_on());
    if !missing.is_empty() {
        return Report::unavailable(id, missing);
    }

    let body = match id {
        ReportId::MembersBySex => members::by_sex(prepared),
        ReportId::MembersByAgeBracket => members::by_age_bracket(prepared, ctx),
        ReportId::MembersBySexAndAge => members::by_sex_and_age(prepared, ctx),
        ReportId::MembersBySector => members::by_sector(prepared),
        ReportId::MembersByOrganization => members::by_organization(prepared),
        ReportId::MembersByUnion => members::by_union(prepared),
        ReportId::MembersByRegistrationYear => members::by_registration_year(prepared),
        ReportId::UnionsBySector => unions::by_sector(prepared),
        ReportId::UnionsByOrganization => unions::by_organization(prepared),
        ReportId::UnionsByEstablishedYear => unions::by_established_year(prepared),
        ReportId::UnionsStrategicPlan => unions::strategic_plan(prepared),
        ReportId::UnionsExternalAudit => unions::external_audit(prepared),
        ReportId::UnionDirectory => unions::directory(prepared),
        ReportId::ExecutivesByPosition => executives::by_position(prepared),
        ReportId::ExecutivesBySex => executives::by_sex(prepared),
        ReportId::ExecutiveTerms => executives::terms(prepared, ctx, None),
        ReportId::ExecutiveTermsEnding => {
            executives::terms(prepared, ctx, Some(ctx.selectors.executive_term_days))
        }
        ReportId::AgreementsByStatus => agreements::by_status(prepared, ctx),
        ReportId::AgreementsBySector => agreements::by_sector(prepared),
        ReportId::AgreementsByRegistrationYear => agreements::by_registration_year(prepared),
        ReportId::AgreementsByRound => agreements::by_round(prepared),
        ReportId::AgreementsExpiring => agreements::expiring(prepared, ctx),
        ReportId::IncidentsByCategory => incidents::by_category(prepared),
        ReportId::IncidentsByInjurySeverity => incidents::by_injury_severity(prepared),
        ReportId::IncidentsByDamageSeverity => incidents::by_damage_severity(prepared),
        ReportId::IncidentsByStatus => incidents::by_status(prepared),
        ReportId::IncidentsReportable => incidents::reportable(prepared),
        ReportId::IncidentsSerious => incidents::serious(prepared, ctx),
        ReportId::TerminatedBySector => archive::by_sector(prepared),
        ReportId::TerminatedByYear => archive::by_year(prepared),
        ReportId::TerminatedRegistry => archive::registry(prepared),
        ReportId::AssemblySchedule => assemblies::schedule(prepared, ctx, None),
        ReportId::AssembliesUpcoming => {
            assemblies::schedule(prepared, ctx, Some(ctx.selectors.assembly_upcoming_days))
        }
        ReportId::UnionProfile => profile::union_profile(prepared, ctx),
    };

    Report::ready(id, body)
}

/// Run the full pipeline for every report in the catalogue.
#[instrument(skip_all, fields(range_active = ctx.range.is_active()))]
#[must_use]
pub fn generate(snapshot: &Snapshot, ctx: &FilterContext) -> ReportBook {
    let prepared = Prepared::new(snapshot, ctx);
    let reports: Vec<Report> = ReportId::ALL
        .into_iter()
        .map(|id| assemble(id, &prepared, ctx))
        .collect();

    let book = ReportBook {
        context: ctx.clone(),
        reports,
    };
    info!(
        reports = book.reports.len(),
        unavailable = book.unavailable_count(),
        "report book generated"
    );
    book
}
