//! Entity sources backed by the admin API.

use std::time::Duration;

use serde_json::Value;
use syndic_core::error::SourceError;
use syndic_core::model::EntityKind;
use syndic_core::source::{EntitySource, records_from_payload};
use tracing::debug;

/// Fetches `GET <base_url>/<kind>?per_page=<n>` for each entity kind.
#[derive(Debug)]
pub struct HttpSource {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
    per_page: u32,
}

impl HttpSource {
    pub fn new(base_url: &str, token: Option<String>, per_page: u32, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("syndic/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            per_page,
        }
    }

    pub fn url_for(&self, kind: EntityKind) -> String {
        format!(
            "{}/{}?per_page={}",
            self.base_url,
            kind.as_str(),
            self.per_page
        )
    }
}

impl EntitySource for HttpSource {
    fn fetch(&self, kind: EntityKind) -> Result<Vec<Value>, SourceError> {
        let url = self.url_for(kind);
        let mut request = self.agent.get(&url).set("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let response = request.call().map_err(|err| SourceError::Transport {
            kind,
            detail: match err {
                ureq::Error::Status(code, _) => format!("{url} returned HTTP {code}"),
                ureq::Error::Transport(transport) => transport.to_string(),
            },
        })?;

        let payload: Value = serde_json::from_reader(response.into_reader())
            .map_err(|source| SourceError::Json { kind, source })?;
        let records = records_from_payload(kind, payload)?;
        debug!(%kind, count = records.len(), "fetched entity page");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_includes_kind_and_page_size() {
        let source = HttpSource::new(
            "https://union.example/api/",
            None,
            1000,
            Duration::from_secs(5),
        );
        assert_eq!(
            source.url_for(EntityKind::TerminatedUnions),
            "https://union.example/api/terminated_unions?per_page=1000"
        );
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let source = HttpSource::new("http://127.0.0.1:9", None, 10, Duration::from_millis(200));
        let err = source.fetch(EntityKind::Members).unwrap_err();
        assert!(matches!(
            err,
            SourceError::Transport {
                kind: EntityKind::Members,
                ..
            }
        ));
    }
}
