//! The fixed report catalogue.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::FilterError;
use crate::model::EntityKind;

use EntityKind::{Agreements, Executives, Incidents, Members, TerminatedUnions, Unions};

/// Every report the engine can produce, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportId {
    MembersBySex,
    MembersByAgeBracket,
    MembersBySexAndAge,
    MembersBySector,
    MembersByOrganization,
    MembersByUnion,
    MembersByRegistrationYear,
    UnionsBySector,
    UnionsByOrganization,
    UnionsByEstablishedYear,
    UnionsStrategicPlan,
    UnionsExternalAudit,
    UnionDirectory,
    ExecutivesByPosition,
    ExecutivesBySex,
    ExecutiveTerms,
    ExecutiveTermsEnding,
    AgreementsByStatus,
    AgreementsBySector,
    AgreementsByRegistrationYear,
    AgreementsByRound,
    AgreementsExpiring,
    IncidentsByCategory,
    IncidentsByInjurySeverity,
    IncidentsByDamageSeverity,
    IncidentsByStatus,
    IncidentsReportable,
    IncidentsSerious,
    TerminatedBySector,
    TerminatedByYear,
    TerminatedRegistry,
    AssemblySchedule,
    AssembliesUpcoming,
    UnionProfile,
}

impl ReportId {
    pub const ALL: [Self; 34] = [
        Self::MembersBySex,
        Self::MembersByAgeBracket,
        Self::MembersBySexAndAge,
        Self::MembersBySector,
        Self::MembersByOrganization,
        Self::MembersByUnion,
        Self::MembersByRegistrationYear,
        Self::UnionsBySector,
        Self::UnionsByOrganization,
        Self::UnionsByEstablishedYear,
        Self::UnionsStrategicPlan,
        Self::UnionsExternalAudit,
        Self::UnionDirectory,
        Self::ExecutivesByPosition,
        Self::ExecutivesBySex,
        Self::ExecutiveTerms,
        Self::ExecutiveTermsEnding,
        Self::AgreementsByStatus,
        Self::AgreementsBySector,
        Self::AgreementsByRegistrationYear,
        Self::AgreementsByRound,
        Self::AgreementsExpiring,
        Self::IncidentsByCategory,
        Self::IncidentsByInjurySeverity,
        Self::IncidentsByDamageSeverity,
        Self::IncidentsByStatus,
        Self::IncidentsReportable,
        Self::IncidentsSerious,
        Self::TerminatedBySector,
        Self::TerminatedByYear,
        Self::TerminatedRegistry,
        Self::AssemblySchedule,
        Self::AssembliesUpcoming,
        Self::UnionProfile,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MembersBySex => "members-by-sex",
            Self::MembersByAgeBracket => "members-by-age-bracket",
            Self::MembersBySexAndAge => "members-by-sex-and-age",
            Self::MembersBySector => "members-by-sector",
            Self::MembersByOrganization => "members-by-organization",
            Self::MembersByUnion => "members-by-union",
            Self::MembersByRegistrationYear => "members-by-registration-year",
            Self::UnionsBySector => "unions-by-sector",
            Self::UnionsByOrganization => "unions-by-organization",
            Self::UnionsByEstablishedYear => "unions-by-established-year",
            Self::UnionsStrategicPlan => "unions-strategic-plan",
            Self::UnionsExternalAudit => "unions-external-audit",
            Self::UnionDirectory => "union-directory",
            Self::ExecutivesByPosition => "executives-by-position",
            Self::ExecutivesBySex => "executives-by-sex",
            Self::ExecutiveTerms => "executive-terms",
            Self::ExecutiveTermsEnding => "executive-terms-ending",
            Self::AgreementsByStatus => "agreements-by-status",
            Self::AgreementsBySector => "agreements-by-sector",
            Self::AgreementsByRegistrationYear => "agreements-by-registration-year",
            Self::AgreementsByRound => "agreements-by-round",
            Self::AgreementsExpiring => "agreements-expiring",
            Self::IncidentsByCategory => "incidents-by-category",
            Self::IncidentsByInjurySeverity => "incidents-by-injury-severity",
            Self::IncidentsByDamageSeverity => "incidents-by-damage-severity",
            Self::IncidentsByStatus => "incidents-by-status",
            Self::IncidentsReportable => "incidents-reportable",
            Self::IncidentsSerious => "incidents-serious",
            Self::TerminatedBySector => "terminated-by-sector",
            Self::TerminatedByYear => "terminated-by-year",
            Self::TerminatedRegistry => "terminated-registry",
            Self::AssemblySchedule => "assembly-schedule",
            Self::AssembliesUpcoming => "assemblies-upcoming",
            Self::UnionProfile => "union-profile",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::MembersBySex => "Members by sex",
            Self::MembersByAgeBracket => "Members by age bracket",
            Self::MembersBySexAndAge => "Members by sex and age bracket",
            Self::MembersBySector => "Members by sector",
            Self::MembersByOrganization => "Members by organization",
            Self::MembersByUnion => "Members by union",
            Self::MembersByRegistrationYear => "Member registrations by year",
            Self::UnionsBySector => "Unions by sector",
            Self::UnionsByOrganization => "Unions by organization",
            Self::UnionsByEstablishedYear => "Unions by year established",
            Self::UnionsStrategicPlan => "Unions with a strategic plan",
            Self::UnionsExternalAudit => "Unions with an external audit",
            Self::UnionDirectory => "Union directory",
            Self::ExecutivesByPosition => "Executives by position",
            Self::ExecutivesBySex => "Executives by sex",
            Self::ExecutiveTerms => "Executive terms",
            Self::ExecutiveTermsEnding => "Executive terms ending soon",
            Self::AgreementsByStatus => "Agreements by status",
            Self::AgreementsBySector => "Agreements by sector",
            Self::AgreementsByRegistrationYear => "Agreements by registration year",
            Self::AgreementsByRound => "Agreements by round",
            Self::AgreementsExpiring => "Agreements expiring soon",
            Self::IncidentsByCategory => "Incidents by category",
            Self::IncidentsByInjurySeverity => "Incidents by injury severity",
            Self::IncidentsByDamageSeverity => "Incidents by damage severity",
            Self::IncidentsByStatus => "Incidents by status",
            Self::IncidentsReportable => "Incidents requiring a regulatory report",
            Self::IncidentsSerious => "Serious incidents",
            Self::TerminatedBySector => "Terminated unions by sector",
            Self::TerminatedByYear => "Terminated unions by year",
            Self::TerminatedRegistry => "Terminated union registry",
            Self::AssemblySchedule => "General assembly schedule",
            Self::AssembliesUpcoming => "Upcoming general assemblies",
            Self::UnionProfile => "Union profile",
        }
    }

    /// Entity kinds that must have loaded for the report to be computed.
    #[must_use]
    pub const fn depends_on(self) -> &'static [EntityKind] {
        match self {
            Self::MembersBySex
            | Self::MembersByAgeBracket
            | Self::MembersBySexAndAge
            | Self::MembersByRegistrationYear => &[Members],
            Self::MembersBySector | Self::MembersByOrganization | Self::MembersByUnion => {
                &[Members, Unions]
            }
            Self::UnionsBySector
            | Self::UnionsByOrganization
            | Self::UnionsByEstablishedYear
            | Self::UnionsStrategicPlan
            | Self::UnionsExternalAudit
            | Self::AssemblySchedule
            | Self::AssembliesUpcoming => &[Unions],
            Self::UnionDirectory => &[Unions, Members, Executives, Agreements],
            Self::ExecutivesByPosition => &[Executives],
            Self::ExecutivesBySex => &[Executives, Members],
            Self::ExecutiveTerms | Self::ExecutiveTermsEnding => &[Executives, Members, Unions],
            Self::AgreementsByStatus
            | Self::AgreementsByRegistrationYear
            | Self::AgreementsByRound => &[Agreements],
            Self::AgreementsBySector | Self::AgreementsExpiring => &[Agreements, Unions],
            Self::IncidentsByCategory
            | Self::IncidentsByInjurySeverity
            | Self::IncidentsByDamageSeverity
            | Self::IncidentsByStatus
            | Self::IncidentsReportable => &[Incidents],
            Self::IncidentsSerious => &[Incidents, Unions],
            Self::TerminatedBySector | Self::TerminatedByYear | Self::TerminatedRegistry => {
                &[TerminatedUnions]
            }
            Self::UnionProfile => &[Unions, Members, Executives, Agreements, Incidents],
        }
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportId {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| FilterError::UnknownReport(s.to_string()))
    }
}
