//! Row shapes, one per report family.
//!
//! Rows serialize untagged: a consumer sees the named fields of the row
//! directly, e.g. `{"key": "Female", "count": 3, "percentage": 60.0}`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::derive::AgreementStatus;
use crate::model::Severity;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Row {
    Share(ShareRow),
    UnionDirectory(UnionDirectoryRow),
    ExecutiveTerm(ExecutiveTermRow),
    AgreementExpiry(AgreementExpiryRow),
    Incident(IncidentRow),
    Terminated(TerminatedRow),
    Assembly(AssemblyRow),
    Metric(MetricRow),
}

/// One group of a "by category" breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareRow {
    pub key: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnionDirectoryRow {
    pub union_id: String,
    pub union_code: Option<String>,
    pub name: String,
    pub sector: String,
    pub organization: String,
    pub members: usize,
    pub executives: usize,
    pub agreements: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutiveTermRow {
    pub executive_id: String,
    pub union: String,
    pub member: String,
    pub position: String,
    pub appointed_date: Option<NaiveDate>,
    pub term_end: Option<NaiveDate>,
    pub remaining_days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgreementExpiryRow {
    pub agreement_id: String,
    pub union: String,
    pub status: AgreementStatus,
    pub end_date: NaiveDate,
    pub days_until_expiry: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentRow {
    pub incident_id: String,
    pub union: String,
    pub occurred_on: Option<NaiveDate>,
    pub category: String,
    pub injury_severity: Severity,
    pub damage_severity: Severity,
    pub status: String,
    pub reportable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminatedRow {
    pub union_id: String,
    pub union_code: Option<String>,
    pub name: String,
    pub sector: String,
    pub terminated_date: Option<NaiveDate>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblyRow {
    pub union_id: String,
    pub union: String,
    pub assembly_date: NaiveDate,
    /// Negative values are days since the assembly.
    pub days_until: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRow {
    pub metric: String,
    pub value: usize,
}

impl Row {
    /// Share key, when this is a share row.
    #[must_use]
    pub const fn share(&self) -> Option<&ShareRow> {
        match self {
            Self::Share(share) => Some(share),
            _ => None,
        }
    }
}
