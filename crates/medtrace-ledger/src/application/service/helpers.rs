//! # Traceability Service - Helper Methods
//!
//! Private storage helpers shared by the engine and the queries.

use tracing::warn;

use super::*;
use crate::domain::codec;
use crate::domain::{
    next_timestamp, EventKind, KeyPrefix, LedgerError, Medication, TrackingEvent,
};

impl<S, P, C, E> TraceabilityService<S, P, C, E>
where
    S: LedgerStore,
    P: ProvenanceSource,
    C: TimeSource,
    E: LedgerEventPublisher,
{
    /// Read a medication aggregate, `None` if absent.
    pub(crate) async fn load_medication(
        &self,
        medication_id: &str,
    ) -> Result<Option<Medication>, LedgerError> {
        let key = KeyPrefix::medication_key(medication_id);
        match self.store.get(&key).await? {
            Some(bytes) => Ok(Some(codec::decode_medication(&bytes, &key)?)),
            None => Ok(None),
        }
    }

    /// Read a medication aggregate, `NotFound` if absent.
    pub(crate) async fn require_medication(
        &self,
        medication_id: &str,
    ) -> Result<Medication, LedgerError> {
        self.load_medication(medication_id)
            .await?
            .ok_or_else(|| LedgerError::not_found(medication_id))
    }

    /// Read an event log in append order; an absent log is empty.
    pub(crate) async fn load_events(
        &self,
        medication_id: &str,
    ) -> Result<Vec<TrackingEvent>, LedgerError> {
        let key = KeyPrefix::events_key(medication_id);
        match self.store.get(&key).await? {
            Some(bytes) => Ok(codec::decode_events(&bytes, &key)?),
            None => Ok(Vec::new()),
        }
    }

    pub(crate) async fn save_medication(&self, medication: &Medication) -> Result<(), LedgerError> {
        let key = KeyPrefix::medication_key(medication.id.as_str());
        let bytes = codec::encode_medication(medication)?;
        self.store.put(&key, bytes).await?;
        Ok(())
    }

    pub(crate) async fn save_events(
        &self,
        medication_id: &str,
        events: &[TrackingEvent],
    ) -> Result<(), LedgerError> {
        let key = KeyPrefix::events_key(medication_id);
        let bytes = codec::encode_events(events)?;
        self.store.put(&key, bytes).await?;
        Ok(())
    }

    /// Append one event to the log of `medication` and mirror its location
    /// onto the aggregate in memory. Writes the log only; the caller persists
    /// the aggregate. Caller must hold the id's lock.
    pub(crate) async fn append_event_locked(
        &self,
        medication: &mut Medication,
        kind: EventKind,
        location: &str,
        actor: &str,
        signature: Option<&str>,
    ) -> Result<TrackingEvent, LedgerError> {
        let id = medication.id.clone();
        let mut events = self.load_events(id.as_str()).await?;

        let event = TrackingEvent {
            event: kind,
            location: location.to_string(),
            timestamp: next_timestamp(self.clock.now(), &events),
            actor: actor.to_string(),
            medication_id: id.clone(),
            signature: signature
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
            transaction_hash: self.provenance.next_token(),
        };
        events.push(event.clone());
        self.save_events(id.as_str(), &events).await?;

        medication.relocate(location);
        Ok(event)
    }

    /// Decode every stored medication. Records that fail to decode are
    /// skipped; a failing scan is an error.
    pub(crate) async fn scan_medications(&self) -> Result<Vec<Medication>, LedgerError> {
        let entries = self
            .store
            .scan_prefix(KeyPrefix::Medication.as_bytes())
            .await?;

        let mut medications = Vec::with_capacity(entries.len());
        for (key, bytes) in entries {
            match codec::decode_medication(&bytes, &key) {
                Ok(medication) => medications.push(medication),
                Err(e) => warn!("[medtrace] Skipping unreadable medication record: {}", e),
            }
        }
        Ok(medications)
    }
}
