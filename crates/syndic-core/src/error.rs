use std::fmt;
use std::path::PathBuf;

use crate::model::EntityKind;

/// Machine-readable error codes for operator- and script-friendly handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ConfigInvalidValue,
    SourceNotConfigured,
    InvalidDateRange,
    UnknownReport,
    InvalidSelector,
    SourceUnavailable,
    SourceDecodeFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::ConfigInvalidValue => "E1002",
            Self::SourceNotConfigured => "E1003",
            Self::InvalidDateRange => "E2001",
            Self::UnknownReport => "E2002",
            Self::InvalidSelector => "E2003",
            Self::SourceUnavailable => "E3001",
            Self::SourceDecodeFailed => "E3002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ConfigInvalidValue => "Invalid configuration value",
            Self::SourceNotConfigured => "No entity source configured",
            Self::InvalidDateRange => "Invalid date range",
            Self::UnknownReport => "Unknown report id",
            Self::InvalidSelector => "Invalid report selector",
            Self::SourceUnavailable => "Entity source unavailable",
            Self::SourceDecodeFailed => "Entity payload could not be decoded",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in syndic.toml and retry."),
            Self::ConfigInvalidValue => {
                Some("Run `syndic config show` to inspect resolved values.")
            }
            Self::SourceNotConfigured => {
                Some("Pass --source-dir or --base-url, or set [source] in syndic.toml.")
            }
            Self::InvalidDateRange => Some("Use YYYY-MM-DD and keep --from on or before --to."),
            Self::UnknownReport => Some("Run `syndic catalog` to list report ids."),
            Self::InvalidSelector => Some("Check --union, window sizes, and --min-severity."),
            Self::SourceUnavailable => {
                Some("Reports depending on this entity kind are marked unavailable.")
            }
            Self::SourceDecodeFailed => {
                Some("Expect a JSON array or an object with a `data` array.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failure to fetch or decode one entity kind.
///
/// Captured per kind inside a [`crate::source::Snapshot`]; never propagated
/// out of report generation.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {kind} from {path}: {source}")]
    Io {
        kind: EntityKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request for {kind} failed: {detail}")]
    Transport { kind: EntityKind, detail: String },

    #[error("{kind} payload is not valid JSON: {source}")]
    Json {
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} payload has no record array")]
    Shape { kind: EntityKind },

    #[error("fetch worker for {kind} terminated unexpectedly")]
    Worker { kind: EntityKind },
}

impl SourceError {
    /// Entity kind the failure belongs to.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Io { kind, .. }
            | Self::Transport { kind, .. }
            | Self::Json { kind, .. }
            | Self::Shape { kind }
            | Self::Worker { kind } => *kind,
        }
    }

    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } | Self::Transport { .. } => ErrorCode::SourceUnavailable,
            Self::Json { .. } | Self::Shape { .. } => ErrorCode::SourceDecodeFailed,
            Self::Worker { .. } => ErrorCode::InternalUnexpected,
        }
    }
}

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

impl ConfigError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } | Self::Parse { .. } => ErrorCode::ConfigParseError,
            Self::InvalidValue { .. } => ErrorCode::ConfigInvalidValue,
        }
    }
}

/// Rejected filter or selector input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("date range start {start} is after end {end}")]
    InvertedRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("unknown report id '{0}'")]
    UnknownReport(String),

    #[error("invalid severity '{0}'")]
    InvalidSeverity(String),
}

impl FilterError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidDate(_) | Self::InvertedRange { .. } => ErrorCode::InvalidDateRange,
            Self::UnknownReport(_) => ErrorCode::UnknownReport,
            Self::InvalidSeverity(_) => ErrorCode::InvalidSelector,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, FilterError, SourceError};
    use crate::model::EntityKind;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::ConfigInvalidValue,
            ErrorCode::SourceNotConfigured,
            ErrorCode::InvalidDateRange,
            ErrorCode::UnknownReport,
            ErrorCode::InvalidSelector,
            ErrorCode::SourceUnavailable,
            ErrorCode::SourceDecodeFailed,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::UnknownReport.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn source_error_reports_its_kind() {
        let err = SourceError::Shape {
            kind: EntityKind::Agreements,
        };
        assert_eq!(err.kind(), EntityKind::Agreements);
        assert_eq!(err.error_code(), ErrorCode::SourceDecodeFailed);
        assert!(err.to_string().contains("agreements"));
    }

    #[test]
    fn filter_errors_map_to_codes() {
        assert_eq!(
            FilterError::InvalidDate("2024-13-01".into()).error_code(),
            ErrorCode::InvalidDateRange
        );
        assert_eq!(
            FilterError::UnknownReport("nope".into()).error_code(),
            ErrorCode::UnknownReport
        );
    }
}
