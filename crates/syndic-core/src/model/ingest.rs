//! Ingestion boundary: one explicit schema per entity kind.
//!
//! Source systems disagree on field names, send identifiers as strings or
//! numbers, and encode flags as booleans, `"yes"`, or `1`. All of that is
//! resolved here, once, so every calculator downstream works on the typed
//! structs in [`super::entity`]. A record that is not an object or carries no
//! identifier is excluded and counted, never rejected with an error.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::entity::{Agreement, Executive, Incident, Member, Severity, Sex, TerminatedUnion, Union};
use super::{EntityKind, normalize};
use crate::date::parse_date;

// ---------------------------------------------------------------------------
// Field access
// ---------------------------------------------------------------------------

/// Alias-aware view over one raw JSON object.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    #[must_use]
    pub const fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    /// First alias whose value converts successfully.
    fn first<T>(self, keys: &[&str], convert: impl Fn(&'a Value) -> Option<T>) -> Option<T> {
        keys.iter()
            .filter_map(|key| self.map.get(*key))
            .find_map(convert)
    }

    /// Free text; numbers and booleans are rendered, blanks are missing.
    #[must_use]
    pub fn text(&self, keys: &[&str]) -> Option<String> {
        self.first(keys, scalar_text)
    }

    /// Identifier reference: a scalar, or an embedded object's `id`.
    #[must_use]
    pub fn reference(&self, keys: &[&str]) -> Option<String> {
        self.first(keys, |value| match value {
            Value::Object(inner) => inner.get("id").and_then(scalar_text),
            other => scalar_text(other),
        })
    }

    #[must_use]
    pub fn date(&self, keys: &[&str]) -> Option<NaiveDate> {
        self.first(keys, |value| value.as_str().and_then(parse_date))
    }

    #[must_use]
    pub fn number(&self, keys: &[&str]) -> Option<f64> {
        self.first(keys, |value| match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|n| n.is_finite())
    }

    /// Loose boolean; absent or unrecognized values are `false`.
    #[must_use]
    pub fn flag(&self, keys: &[&str]) -> bool {
        self.first(keys, |value| match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|n| n != 0.0),
            Value::String(s) => match normalize(s).as_str() {
                "true" | "yes" | "y" | "1" | "on" => Some(true),
                "false" | "no" | "n" | "0" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        })
        .unwrap_or(false)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Per-kind schemas
// ---------------------------------------------------------------------------

/// A typed entity that can be built from one raw record.
pub trait Ingest: Sized {
    const KIND: EntityKind;

    /// Build the entity, or `None` when the record has no usable identifier.
    fn from_fields(fields: &Fields<'_>) -> Option<Self>;
}

const ID: &[&str] = &["id", "_id", "uuid"];
const UNION_REF: &[&str] = &["union_id", "union", "union_ref"];

impl Ingest for Member {
    const KIND: EntityKind = EntityKind::Members;

    fn from_fields(fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id: fields.reference(ID)?,
            union_id: fields.reference(UNION_REF),
            name: member_name(*fields),
            sex: Sex::classify(fields.text(&["sex", "gender"]).as_deref()),
            birth_date: fields.date(&["birth_date", "dob", "date_of_birth"]),
            registration_date: fields.date(&[
                "registration_date",
                "registered_at",
                "registered_on",
                "created_at",
            ]),
            salary: fields.number(&["salary", "monthly_salary"]),
        })
    }
}

fn member_name(fields: Fields<'_>) -> Option<String> {
    if let Some(full) = fields.text(&["name", "full_name"]) {
        return Some(full);
    }
    let parts: Vec<String> = [
        &["first_name", "firstname"][..],
        &["father_name", "middle_name"][..],
        &["last_name", "lastname", "grandfather_name"][..],
    ]
    .iter()
    .filter_map(|keys| fields.text(keys))
    .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

fn union_from(fields: Fields<'_>, id_keys: &[&str]) -> Option<Union> {
    Some(Union {
        id: fields.reference(id_keys)?,
        code: fields.text(&["union_code", "code"]),
        name: fields.text(&["name", "union_name"]),
        sector: fields.text(&["sector", "industry"]),
        organization: fields.text(&["organization", "organization_name", "employer"]),
        established_date: fields.date(&["established_date", "established_at", "founded_date"]),
        general_assembly_date: fields.date(&["general_assembly_date", "assembly_date"]),
        strategic_plan: fields.flag(&[
            "strategic_plan",
            "has_strategic_plan",
            "strategic_plan_in_place",
        ]),
        external_audit_date: fields.date(&["external_audit_date", "audit_date"]),
    })
}

impl Ingest for Union {
    const KIND: EntityKind = EntityKind::Unions;

    fn from_fields(fields: &Fields<'_>) -> Option<Self> {
        union_from(*fields, ID)
    }
}

impl Ingest for Executive {
    const KIND: EntityKind = EntityKind::Executives;

    fn from_fields(fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id: fields.reference(ID)?,
            union_id: fields.reference(UNION_REF),
            member_id: fields.reference(&["member_id", "member", "mem_id"]),
            position: fields.text(&["position", "title", "role"]),
            appointed_date: fields.date(&["appointed_date", "appointed_at", "appointment_date"]),
            term_length_years: fields.number(&["term_length_years", "term_length", "term_years"]),
        })
    }
}

impl Ingest for Agreement {
    const KIND: EntityKind = EntityKind::Agreements;

    fn from_fields(fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id: fields.reference(ID)?,
            union_id: fields.reference(UNION_REF),
            registration_date: fields.date(&["registration_date", "registered_at", "signed_date"]),
            next_end_date: fields.date(&["next_end_date", "end_date", "expiry_date"]),
            duration_years: fields.number(&["duration_years", "duration"]),
            status: fields.text(&["status", "cba_status"]),
            round: fields.text(&["round", "cba_round", "round_number"]),
        })
    }
}

impl Ingest for Incident {
    const KIND: EntityKind = EntityKind::Incidents;

    fn from_fields(fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id: fields.reference(ID)?,
            union_id: fields.reference(UNION_REF),
            occurred_on: fields.date(&[
                "occurred_at",
                "date_time_occurred",
                "incident_date",
                "date",
            ]),
            category: fields.text(&["category", "accident_category", "incident_category"]),
            injury_severity: Severity::classify(fields.text(&["injury_severity"]).as_deref()),
            damage_severity: Severity::classify(
                fields
                    .text(&["damage_severity", "property_damage"])
                    .as_deref(),
            ),
            status: fields.text(&["status", "incident_status"]),
            regulatory_report_required: fields.flag(&[
                "regulatory_report_required",
                "is_reportable",
                "reportable",
            ]),
        })
    }
}

impl Ingest for TerminatedUnion {
    const KIND: EntityKind = EntityKind::TerminatedUnions;

    fn from_fields(fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            union: union_from(*fields, &["id", "_id", "union_id"])?,
            terminated_date: fields.date(&["terminated_date", "termination_date", "terminated_at"]),
            reason: fields.text(&["termination_reason", "reason"]),
        })
    }
}

// ---------------------------------------------------------------------------
// Batch ingestion
// ---------------------------------------------------------------------------

/// Typed records plus the number of raw records that were excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingested<T> {
    pub records: Vec<T>,
    pub excluded: usize,
}

/// Normalize a raw collection into typed entities.
pub fn ingest<T: Ingest>(values: &[Value]) -> Ingested<T> {
    let mut records = Vec::with_capacity(values.len());
    let mut excluded = 0_usize;

    for value in values {
        let parsed = value
            .as_object()
            .and_then(|map| T::from_fields(&Fields::new(map)));
        match parsed {
            Some(record) => records.push(record),
            None => excluded += 1,
        }
    }

    if excluded > 0 {
        warn!(kind = %T::KIND, excluded, "excluded malformed records");
    }
    debug!(kind = %T::KIND, ingested = records.len(), "ingested records");

    Ingested { records, excluded }
}
