#![no_main]

use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;
use serde_json::Value;
use syndic_core::context::FilterContext;
use syndic_core::error::SourceError;
use syndic_core::model::EntityKind;
use syndic_core::report::generate;
use syndic_core::source::{EntitySource, Snapshot, records_from_payload};

/// Serves the same payload for every entity kind.
struct Fixed(Value);

impl EntitySource for Fixed {
    fn fetch(&self, kind: EntityKind) -> Result<Vec<Value>, SourceError> {
        records_from_payload(kind, self.0.clone())
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(payload) = serde_json::from_slice::<Value>(data) else {
        return;
    };
    let Some(today) = NaiveDate::from_ymd_opt(2025, 6, 1) else {
        return;
    };
    let snapshot = Snapshot::load(&Fixed(payload));
    let ctx = FilterContext::new(today);

    let first = generate(&snapshot, &ctx);
    let second = generate(&snapshot, &ctx);
    assert_eq!(first, second);
});
