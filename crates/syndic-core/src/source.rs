//! Entity sources and the per-generation snapshot.
//!
//! One fetch per entity kind, independent of the others. Kinds are fetched
//! concurrently and each outcome is kept on its own, so a failed kind only
//! takes down the reports that depend on it.

use std::path::PathBuf;
use std::thread;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::SourceError;
use crate::model::{
    Agreement, EntityKind, Executive, Incident, Ingest, Member, TerminatedUnion, Union, ingest,
};

/// Keys that may hold the record array when a payload is an envelope object.
const ENVELOPE_KEYS: &[&str] = &["data", "items", "results", "records"];

/// Anything that can hand over the raw records of one entity kind.
pub trait EntitySource: Sync {
    /// Fetch every record of `kind` as loosely-typed JSON values.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the kind cannot be read or its payload
    /// holds no record array.
    fn fetch(&self, kind: EntityKind) -> Result<Vec<Value>, SourceError>;
}

/// Pull the record array out of a decoded payload.
///
/// Accepts a bare array or an envelope object holding one under a well-known
/// key (`data`, `items`, `results`, `records`).
///
/// # Errors
///
/// Returns [`SourceError::Shape`] when no record array can be found.
pub fn records_from_payload(kind: EntityKind, payload: Value) -> Result<Vec<Value>, SourceError> {
    match payload {
        Value::Array(records) => Ok(records),
        Value::Object(mut envelope) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| match envelope.remove(*key) {
                Some(Value::Array(records)) => Some(records),
                _ => None,
            })
            .ok_or(SourceError::Shape { kind }),
        _ => Err(SourceError::Shape { kind }),
    }
}

// ---------------------------------------------------------------------------
// DirectorySource
// ---------------------------------------------------------------------------

/// Reads `<dir>/<kind>.json` for each entity kind.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn path_for(&self, kind: EntityKind) -> PathBuf {
        self.root.join(format!("{}.json", kind.as_str()))
    }
}

impl EntitySource for DirectorySource {
    fn fetch(&self, kind: EntityKind) -> Result<Vec<Value>, SourceError> {
        let path = self.path_for(kind);
        let content = std::fs::read_to_string(&path).map_err(|source| SourceError::Io {
            kind,
            path: path.clone(),
            source,
        })?;
        let payload: Value =
            serde_json::from_str(&content).map_err(|source| SourceError::Json { kind, source })?;
        records_from_payload(kind, payload)
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Outcome of loading one entity kind.
#[derive(Debug)]
pub enum Collection<T> {
    Loaded { records: Vec<T>, excluded: usize },
    Failed(SourceError),
}

impl<T> Collection<T> {
    #[must_use]
    pub const fn loaded(records: Vec<T>) -> Self {
        Self::Loaded {
            records,
            excluded: 0,
        }
    }

    /// Records when loaded, `None` when the fetch failed.
    #[must_use]
    pub fn records(&self) -> Option<&[T]> {
        match self {
            Self::Loaded { records, .. } => Some(records),
            Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub const fn failure(&self) -> Option<&SourceError> {
        match self {
            Self::Loaded { .. } => None,
            Self::Failed(err) => Some(err),
        }
    }

    #[must_use]
    pub const fn excluded(&self) -> usize {
        match self {
            Self::Loaded { excluded, .. } => *excluded,
            Self::Failed(_) => 0,
        }
    }
}

impl<T: Ingest> Collection<T> {
    fn from_fetch(fetched: Result<Vec<Value>, SourceError>) -> Self {
        match fetched {
            Ok(values) => {
                let ingested = ingest::<T>(&values);
                Self::Loaded {
                    records: ingested.records,
                    excluded: ingested.excluded,
                }
            }
            Err(err) => {
                warn!(kind = %T::KIND, error = %err, "entity fetch failed");
                Self::Failed(err)
            }
        }
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::loaded(Vec::new())
    }
}

/// Immutable per-generation copy of every entity collection.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub members: Collection<Member>,
    pub unions: Collection<Union>,
    pub executives: Collection<Executive>,
    pub agreements: Collection<Agreement>,
    pub incidents: Collection<Incident>,
    pub terminated: Collection<TerminatedUnion>,
}

impl Snapshot {
    /// Fetch all kinds concurrently and ingest each one.
    #[instrument(skip_all)]
    pub fn load<S: EntitySource + ?Sized>(source: &S) -> Self {
        let outcomes = thread::scope(|scope| {
            EntityKind::ALL
                .map(|kind| (kind, scope.spawn(move || source.fetch(kind))))
                .map(|(kind, handle)| handle.join().unwrap_or(Err(SourceError::Worker { kind })))
        });
        let [members, unions, executives, agreements, incidents, terminated] = outcomes;

        let snapshot = Self {
            members: Collection::from_fetch(members),
            unions: Collection::from_fetch(unions),
            executives: Collection::from_fetch(executives),
            agreements: Collection::from_fetch(agreements),
            incidents: Collection::from_fetch(incidents),
            terminated: Collection::from_fetch(terminated),
        };
        debug!(failed = snapshot.failed_kinds().len(), "snapshot loaded");
        snapshot
    }

    /// Whether `kind` loaded successfully.
    #[must_use]
    pub const fn is_available(&self, kind: EntityKind) -> bool {
        self.failure(kind).is_none()
    }

    #[must_use]
    pub const fn failure(&self, kind: EntityKind) -> Option<&SourceError> {
        match kind {
            EntityKind::Members => self.members.failure(),
            EntityKind::Unions => self.unions.failure(),
            EntityKind::Executives => self.executives.failure(),
            EntityKind::Agreements => self.agreements.failure(),
            EntityKind::Incidents => self.incidents.failure(),
            EntityKind::TerminatedUnions => self.terminated.failure(),
        }
    }

    #[must_use]
    pub fn failed_kinds(&self) -> Vec<EntityKind> {
        EntityKind::ALL
            .into_iter()
            .filter(|kind| !self.is_available(*kind))
            .collect()
    }

    /// Raw records excluded at ingestion, per kind.
    #[must_use]
    pub const fn excluded(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Members => self.members.excluded(),
            EntityKind::Unions => self.unions.excluded(),
            EntityKind::Executives => self.executives.excluded(),
            EntityKind::Agreements => self.agreements.excluded(),
            EntityKind::Incidents => self.incidents.excluded(),
            EntityKind::TerminatedUnions => self.terminated.excluded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct MapSource(HashMap<EntityKind, Value>);

    impl EntitySource for MapSource {
        fn fetch(&self, kind: EntityKind) -> Result<Vec<Value>, SourceError> {
            match self.0.get(&kind) {
                Some(payload) => records_from_payload(kind, payload.clone()),
                None => Err(SourceError::Transport {
                    kind,
                    detail: "503 Service Unavailable".into(),
                }),
            }
        }
    }

    #[test]
    fn envelope_payloads_are_unwrapped() {
        let payload = json!({"page": 1, "data": [{"id": 1}, {"id": 2}]});
        let records = records_from_payload(EntityKind::Members, payload).unwrap();
        assert_eq!(records.len(), 2);

        let empty = records_from_payload(EntityKind::Members, json!({"results": []})).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn scalar_and_arrayless_payloads_are_rejected() {
        let payload = json!({"data": {"id": 1}});
        let err = records_from_payload(EntityKind::Unions, payload).unwrap_err();
        assert!(matches!(err, SourceError::Shape { .. }));
        assert_eq!(err.kind(), EntityKind::Unions);
        assert!(records_from_payload(EntityKind::Unions, json!(42)).is_err());
    }

    #[test]
    fn failed_kind_does_not_block_the_others() {
        let mut payloads = HashMap::new();
        payloads.insert(EntityKind::Members, json!([{"id": "m1"}, {"nope": true}]));
        payloads.insert(EntityKind::Unions, json!([{"id": "u1"}]));
        payloads.insert(EntityKind::Executives, json!([]));
        payloads.insert(EntityKind::Incidents, json!([]));
        payloads.insert(EntityKind::TerminatedUnions, json!([]));

        let snapshot = Snapshot::load(&MapSource(payloads));
        assert_eq!(snapshot.failed_kinds(), vec![EntityKind::Agreements]);
        assert_eq!(snapshot.members.records().map(<[_]>::len), Some(1));
        assert_eq!(snapshot.excluded(EntityKind::Members), 1);
        assert!(snapshot.agreements.records().is_none());
        assert!(matches!(
            snapshot.failure(EntityKind::Agreements),
            Some(SourceError::Transport { .. })
        ));
    }

    #[test]
    fn directory_source_reads_kind_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("unions.json"),
            r#"{"data": [{"id": 1, "name": "Bank Workers"}]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("members.json"), "not json").unwrap();

        let source = DirectorySource::new(dir.path());
        assert_eq!(source.fetch(EntityKind::Unions).unwrap().len(), 1);
        assert!(matches!(
            source.fetch(EntityKind::Members),
            Err(SourceError::Json { .. })
        ));
        assert!(matches!(
            source.fetch(EntityKind::Incidents),
            Err(SourceError::Io { .. })
        ));
    }
}
