//! JSON encoding of stored records.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::entities::{Medication, TrackingEvent};
use super::errors::StoreError;

fn encode<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(value)
        .map_err(|e| StoreError::corruption(format!("failed to encode {what}: {e}")))
}

fn decode<T: DeserializeOwned>(bytes: &[u8], key: &[u8]) -> Result<T, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| {
        StoreError::corruption(format!(
            "failed to decode record at '{}': {e}",
            String::from_utf8_lossy(key)
        ))
    })
}

/// Encode a medication aggregate.
pub fn encode_medication(medication: &Medication) -> Result<Vec<u8>, StoreError> {
    encode(medication, "medication")
}

/// Decode a medication aggregate stored under `key`.
pub fn decode_medication(bytes: &[u8], key: &[u8]) -> Result<Medication, StoreError> {
    decode(bytes, key)
}

/// Encode an event log.
pub fn encode_events(events: &[TrackingEvent]) -> Result<Vec<u8>, StoreError> {
    encode(events, "event log")
}

/// Decode an event log stored under `key`.
pub fn decode_events(bytes: &[u8], key: &[u8]) -> Result<Vec<TrackingEvent>, StoreError> {
    decode(bytes, key)
}
