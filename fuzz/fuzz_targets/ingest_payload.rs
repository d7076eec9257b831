#![no_main]

use libfuzzer_sys::fuzz_target;
use serde_json::Value;
use syndic_core::model::{
    Agreement, EntityKind, Executive, Incident, Member, TerminatedUnion, Union, ingest,
};
use syndic_core::source::records_from_payload;

fuzz_target!(|data: &[u8]| {
    let Ok(payload) = serde_json::from_slice::<Value>(data) else {
        return;
    };
    let Ok(records) = records_from_payload(EntityKind::Members, payload) else {
        return;
    };

    let members = ingest::<Member>(&records);
    assert!(members.records.len() + members.excluded == records.len());
    let _ = ingest::<Union>(&records);
    let _ = ingest::<Executive>(&records);
    let _ = ingest::<Agreement>(&records);
    let _ = ingest::<Incident>(&records);
    let _ = ingest::<TerminatedUnion>(&records);
});
