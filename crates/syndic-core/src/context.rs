//! The immutable value every calculator and assembler receives.
//!
//! Nothing in report generation reads ambient state: the reference date, the
//! active date range, and every report-local selector travel together in a
//! [`FilterContext`]. Equal contexts over the same snapshot produce identical
//! report books, which is what makes memoization by context sound.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::model::Severity;

pub const DEFAULT_AGREEMENT_EXPIRY_DAYS: u32 = 90;
pub const DEFAULT_ASSEMBLY_UPCOMING_DAYS: u32 = 30;
pub const DEFAULT_EXECUTIVE_TERM_DAYS: u32 = 90;

/// Inclusive calendar window; either bound may be absent.
///
/// With both bounds absent the range is "all time" and filtering is the
/// identity. Any present bound makes the range active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub const ALL_TIME: Self = Self {
        start: None,
        end: None,
    };

    #[must_use]
    pub const fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Like [`DateRange::new`] but rejects a start after the end.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvertedRange`] when both bounds are present and
    /// `start > end`.
    pub fn checked(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, FilterError> {
        match (start, end) {
            (Some(start), Some(end)) if start > end => {
                Err(FilterError::InvertedRange { start, end })
            }
            _ => Ok(Self { start, end }),
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Whether a record dated `date` passes the filter.
    ///
    /// Inactive ranges pass everything, including missing dates. Active ranges
    /// pass only present dates inside `[start, end]`; `end` covers its whole
    /// calendar day.
    #[must_use]
    pub fn admits(&self, date: Option<NaiveDate>) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(date) = date else {
            return false;
        };
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Report-local selectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selectors {
    /// Union chosen for the union profile report.
    pub union_id: Option<String>,
    /// Agreements within this many days of their end date, either side.
    pub agreement_expiry_days: u32,
    /// Assemblies strictly in the future and at most this many days away.
    pub assembly_upcoming_days: u32,
    /// Executive terms ending today or within this many days.
    pub executive_term_days: u32,
    /// Minimum severity for the serious-incident listing.
    pub min_severity: Severity,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            union_id: None,
            agreement_expiry_days: DEFAULT_AGREEMENT_EXPIRY_DAYS,
            assembly_upcoming_days: DEFAULT_ASSEMBLY_UPCOMING_DAYS,
            executive_term_days: DEFAULT_EXECUTIVE_TERM_DAYS,
            min_severity: Severity::Major,
        }
    }
}

/// Everything one report generation depends on besides the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterContext {
    pub today: NaiveDate,
    pub range: DateRange,
    pub selectors: Selectors,
}

impl FilterContext {
    /// All-time context with default selectors.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            range: DateRange::ALL_TIME,
            selectors: Selectors::default(),
        }
    }

    #[must_use]
    pub const fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn with_selectors(mut self, selectors: Selectors) -> Self {
        self.selectors = selectors;
        self
    }
}
