//! Derived-status calculators.
//!
//! Pure, total functions over a single record and a reference date. Missing
//! inputs produce a defined answer (usually `None`, or the fail-safe bucket),
//! never a panic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::date::{add_years, age_on, days_until};
use crate::model::{Agreement, Executive, normalize};

/// Age at which a member stops counting as youth.
pub const YOUTH_AGE_LIMIT: u32 = 35;

// ---------------------------------------------------------------------------
// Age bracket
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBracket {
    Youth,
    Elder,
}

impl AgeBracket {
    pub const ALL: [Self; 2] = [Self::Youth, Self::Elder];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Youth => "Youth",
            Self::Elder => "Elder",
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bracket for a birth date, or `None` when there is no usable birth date.
#[must_use]
pub fn age_bracket(birth_date: Option<NaiveDate>, today: NaiveDate) -> Option<AgeBracket> {
    let age = age_on(birth_date?, today)?;
    Some(if age < YOUTH_AGE_LIMIT {
        AgeBracket::Youth
    } else {
        AgeBracket::Elder
    })
}

// ---------------------------------------------------------------------------
// Agreement status
// ---------------------------------------------------------------------------

/// Canonical agreement status used by every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgreementStatus {
    #[serde(rename = "signed")]
    Signed,
    #[serde(rename = "ongoing")]
    Ongoing,
    #[serde(rename = "not-signed")]
    NotSigned,
}

impl AgreementStatus {
    pub const ALL: [Self; 3] = [Self::Signed, Self::Ongoing, Self::NotSigned];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Signed => "Signed",
            Self::Ongoing => "Ongoing",
            Self::NotSigned => "Not-Signed",
        }
    }

    /// Map raw status text; `None` when the text is missing or unrecognized.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Option<Self> {
        match normalize(raw?).as_str() {
            "signed" | "pending" => Some(Self::Signed),
            "ongoing" | "active" => Some(Self::Ongoing),
            "not-signed" | "notsigned" | "not_signed" | "expired" => Some(Self::NotSigned),
            _ => None,
        }
    }

    /// Infer a status from the agreement dates alone.
    ///
    /// Future registration → Signed; registration ≤ today ≤ end → Ongoing;
    /// anything else, including missing dates → Not-Signed.
    #[must_use]
    pub fn from_dates(
        registration: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        match (registration, end) {
            (Some(registered), _) if registered > today => Self::Signed,
            (Some(_), Some(end)) if today <= end => Self::Ongoing,
            _ => Self::NotSigned,
        }
    }
}

impl fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical status: recognized raw text wins, dates are the fallback.
#[must_use]
pub fn agreement_status(agreement: &Agreement, today: NaiveDate) -> AgreementStatus {
    AgreementStatus::from_raw(agreement.status.as_deref()).unwrap_or_else(|| {
        AgreementStatus::from_dates(agreement.registration_date, agreement.next_end_date, today)
    })
}

/// Days until the agreement's next end date; negative once it has passed.
#[must_use]
pub fn days_until_expiry(agreement: &Agreement, today: NaiveDate) -> Option<i64> {
    agreement.next_end_date.map(|end| days_until(end, today))
}

// ---------------------------------------------------------------------------
// Executive terms
// ---------------------------------------------------------------------------

/// Appointment date plus term length; undefined if either is missing.
#[must_use]
pub fn term_end(executive: &Executive) -> Option<NaiveDate> {
    add_years(executive.appointed_date?, executive.term_length_years?)
}

/// Days left in the executive's term; negative once it has ended.
#[must_use]
pub fn term_remaining_days(executive: &Executive, today: NaiveDate) -> Option<i64> {
    term_end(executive).map(|end| days_until(end, today))
}

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------
//
// The three windows differ on purpose. Agreements look both ways, assemblies
// only forward, and terms forward including today.

/// `|days| ≤ window`: just-expired agreements count as expiring.
#[must_use]
pub fn is_expiring_soon(days: i64, window: u32) -> bool {
    days.unsigned_abs() <= u64::from(window)
}

/// `0 < days ≤ window`: only assemblies still ahead.
#[must_use]
pub fn is_upcoming(days: i64, window: u32) -> bool {
    days > 0 && days <= i64::from(window)
}

/// `0 ≤ days ≤ window`: terms ending today are still ending.
#[must_use]
pub fn is_term_ending(days: i64, window: u32) -> bool {
    days >= 0 && days <= i64::from(window)
}
