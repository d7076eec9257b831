use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{ParseEnumError, normalize};

/// Member sex after normalization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Unknown];

    /// Total classification of free text; anything unrecognized is `Unknown`.
    #[must_use]
    pub fn classify(raw: Option<&str>) -> Self {
        match raw.map(normalize).as_deref() {
            Some("male" | "m") => Self::Male,
            Some("female" | "f") => Self::Female,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fixed severity vocabulary shared by injury and damage assessments.
///
/// Declaration order is severity order; `Unknown` sorts last and never
/// satisfies a minimum-severity threshold.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Minor,
    Moderate,
    Major,
    Critical,
    #[default]
    Unknown,
}

impl Severity {
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::Minor,
        Self::Moderate,
        Self::Major,
        Self::Critical,
        Self::Unknown,
    ];

    /// Pass-through bucket for raw severity text. Unrecognized or missing
    /// values land in `Unknown` instead of being dropped.
    #[must_use]
    pub fn classify(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Unknown;
        };
        let normalized = normalize(raw).replace(['_', '-'], " ");
        match normalized.as_str() {
            "none" | "no" | "no injury" | "no damage" => Self::None,
            "minor" | "low" | "first aid" | "slight" => Self::Minor,
            "moderate" | "medium" => Self::Moderate,
            "major" | "serious" | "severe" | "high" | "lost time" => Self::Major,
            "critical" | "fatal" | "fatality" | "death" | "catastrophic" => Self::Critical,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Minor => "Minor",
            Self::Moderate => "Moderate",
            Self::Major => "Major",
            Self::Critical => "Critical",
            Self::Unknown => "Unknown",
        }
    }

    /// True when `self` is a known severity at or above `threshold`.
    #[must_use]
    pub fn is_at_least(self, threshold: Self) -> bool {
        self != Self::Unknown && self >= threshold
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::classify(Some(s)) {
            Self::Unknown if normalize(s) != "unknown" => Err(ParseEnumError {
                expected: "severity",
                got: s.to_string(),
            }),
            severity => Ok(severity),
        }
    }
}

/// A union member.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Member {
    pub id: String,
    pub union_id: Option<String>,
    pub name: Option<String>,
    pub sex: Sex,
    pub birth_date: Option<NaiveDate>,
    pub registration_date: Option<NaiveDate>,
    pub salary: Option<f64>,
}

/// A registered union.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Union {
    pub id: String,
    pub code: Option<String>,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub organization: Option<String>,
    pub established_date: Option<NaiveDate>,
    pub general_assembly_date: Option<NaiveDate>,
    pub strategic_plan: bool,
    pub external_audit_date: Option<NaiveDate>,
}

impl Union {
    /// Name shown in report rows: name, then code, then id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.code.as_deref())
            .unwrap_or(&self.id)
    }
}

/// A union officer holding a time-bounded position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Executive {
    pub id: String,
    pub union_id: Option<String>,
    pub member_id: Option<String>,
    pub position: Option<String>,
    pub appointed_date: Option<NaiveDate>,
    pub term_length_years: Option<f64>,
}

/// A collective bargaining agreement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Agreement {
    pub id: String,
    pub union_id: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub next_end_date: Option<NaiveDate>,
    pub duration_years: Option<f64>,
    pub status: Option<String>,
    pub round: Option<String>,
}

/// An occupational safety and health incident.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Incident {
    pub id: String,
    pub union_id: Option<String>,
    pub occurred_on: Option<NaiveDate>,
    pub category: Option<String>,
    pub injury_severity: Severity,
    pub damage_severity: Severity,
    pub status: Option<String>,
    pub regulatory_report_required: bool,
}

impl Incident {
    /// The worse of the injury and damage assessments, ignoring `Unknown`.
    #[must_use]
    pub fn worst_severity(&self) -> Severity {
        match (self.injury_severity, self.damage_severity) {
            (Severity::Unknown, other) | (other, Severity::Unknown) => other,
            (a, b) => a.max(b),
        }
    }
}

/// Archived snapshot of a union taken when it was terminated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TerminatedUnion {
    pub union: Union,
    pub terminated_date: Option<NaiveDate>,
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sex_classification_is_total() {
        assert_eq!(Sex::classify(Some("Male")), Sex::Male);
        assert_eq!(Sex::classify(Some(" f ")), Sex::Female);
        assert_eq!(Sex::classify(Some("FEMALE")), Sex::Female);
        assert_eq!(Sex::classify(Some("other")), Sex::Unknown);
        assert_eq!(Sex::classify(None), Sex::Unknown);
    }

    #[test]
    fn severity_aliases_collapse_into_vocabulary() {
        assert_eq!(Severity::classify(Some("First Aid")), Severity::Minor);
        assert_eq!(Severity::classify(Some("lost_time")), Severity::Major);
        assert_eq!(Severity::classify(Some("FATAL")), Severity::Critical);
        assert_eq!(Severity::classify(Some("medium")), Severity::Moderate);
        assert_eq!(Severity::classify(Some("catastrophe?")), Severity::Unknown);
        assert_eq!(Severity::classify(None), Severity::Unknown);
    }

    #[test]
    fn unknown_severity_never_meets_a_threshold() {
        assert!(!Severity::Unknown.is_at_least(Severity::None));
        assert!(Severity::Critical.is_at_least(Severity::Major));
        assert!(Severity::Major.is_at_least(Severity::Major));
        assert!(!Severity::Moderate.is_at_least(Severity::Major));
    }

    #[test]
    fn severity_parse_rejects_unrecognized_text() {
        assert_eq!("major".parse::<Severity>().unwrap(), Severity::Major);
        assert_eq!("unknown".parse::<Severity>().unwrap(), Severity::Unknown);
        assert!("spicy".parse::<Severity>().is_err());
    }

    #[test]
    fn worst_severity_skips_unknown() {
        let incident = Incident {
            id: "1".into(),
            union_id: None,
            occurred_on: None,
            category: None,
            injury_severity: Severity::Unknown,
            damage_severity: Severity::Moderate,
            status: None,
            regulatory_report_required: false,
        };
        assert_eq!(incident.worst_severity(), Severity::Moderate);

        let both = Incident {
            injury_severity: Severity::Critical,
            ..incident
        };
        assert_eq!(both.worst_severity(), Severity::Critical);
    }

    #[test]
    fn union_display_name_falls_back() {
        let mut union = Union {
            id: "u-7".into(),
            ..Union::default()
        };
        assert_eq!(union.display_name(), "u-7");
        union.code = Some("TWU".into());
        assert_eq!(union.display_name(), "TWU");
        union.name = Some("Transport Workers".into());
        assert_eq!(union.display_name(), "Transport Workers");
    }
}
