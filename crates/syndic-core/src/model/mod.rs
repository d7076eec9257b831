//! Typed entity model and the ingestion boundary that produces it.

pub mod entity;
pub mod ingest;

pub use entity::{Agreement, Executive, Incident, Member, Severity, Sex, TerminatedUnion, Union};
pub use ingest::{Ingest, Ingested, ingest};

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The entity collections the engine consumes, one fetch each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Members,
    Unions,
    Executives,
    Agreements,
    Incidents,
    TerminatedUnions,
}

impl EntityKind {
    pub const ALL: [Self; 6] = [
        Self::Members,
        Self::Unions,
        Self::Executives,
        Self::Agreements,
        Self::Incidents,
        Self::TerminatedUnions,
    ];

    /// Collection name used for file names and endpoint paths.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Members => "members",
            Self::Unions => "unions",
            Self::Executives => "executives",
            Self::Agreements => "agreements",
            Self::Incidents => "incidents",
            Self::TerminatedUnions => "terminated_unions",
        }
    }

}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

pub(crate) fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for EntityKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s).replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseEnumError {
                expected: "entity kind",
                got: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::EntityKind;
    use std::str::FromStr;

    #[test]
    fn kind_names_roundtrip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert_eq!(
            EntityKind::from_str("Terminated-Unions").unwrap(),
            EntityKind::TerminatedUnions
        );
        assert!(EntityKind::from_str("assemblies").is_err());
    }

    #[test]
    fn kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&EntityKind::TerminatedUnions).unwrap(),
            "\"terminated_unions\""
        );
    }
}
