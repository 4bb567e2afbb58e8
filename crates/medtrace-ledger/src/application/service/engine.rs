//! # Traceability Engine
//!
//! `TraceabilityApi` implementation: commission, tracking, recall and
//! verification.
//!
//! Every write validates its input first, then takes the id's lock, then
//! checks existence, so a rejected call never touches the store.

use async_trait::async_trait;
use tracing::{debug, info};

use super::*;
use crate::domain::{
    medication_id, require_non_empty, validate_commission, verify, CommissionRequest, EventKind,
    LedgerError, LedgerEvent, Medication, MedicationId, MedicationStatus, TrackingEvent,
    TransactionHash, VerificationResult,
};
use crate::ports::inbound::TraceabilityApi;

#[async_trait]
impl<S, P, C, E> TraceabilityApi for TraceabilityService<S, P, C, E>
where
    S: LedgerStore,
    P: ProvenanceSource,
    C: TimeSource,
    E: LedgerEventPublisher,
{
    async fn commission_medication(
        &self,
        request: CommissionRequest,
    ) -> Result<MedicationId, LedgerError> {
        validate_commission(&request)?;
        let expiry_date = request.parsed_expiry().ok_or_else(|| {
            LedgerError::invalid(
                "expiryDate",
                format!("'{}' is not a YYYY-MM-DD date", request.expiry_date),
            )
        })?;

        let id = medication_id(&request.gtin, &request.batch, &request.serial_number);
        let _guard = self.locks.acquire(id.as_str()).await;

        if self.load_medication(id.as_str()).await?.is_some() {
            return Err(LedgerError::Conflict {
                medication_id: id.into_string(),
            });
        }

        let now = self.clock.now();
        let token = self.provenance.next_token();

        let medication = Medication {
            id: id.clone(),
            gtin: request.gtin,
            batch: request.batch,
            serial_number: request.serial_number,
            expiry_date,
            manufacturer: request.manufacturer,
            product_name: request.product_name,
            location: request.location,
            status: MedicationStatus::Commissioned,
            commission_time: now,
            recall_reason: None,
            transaction_hash: token.clone(),
        };
        let commission = TrackingEvent {
            event: EventKind::Commission,
            location: medication.location.clone(),
            timestamp: now,
            actor: medication.manufacturer.clone(),
            medication_id: id.clone(),
            signature: None,
            transaction_hash: token,
        };

        self.save_medication(&medication).await?;
        self.save_events(id.as_str(), &[commission]).await?;

        info!(
            "[medtrace] Commissioned {} ({} by {})",
            id, medication.product_name, medication.manufacturer
        );
        self.publisher
            .publish(LedgerEvent::MedicationCommissioned {
                medication_id: id.clone(),
                product_name: medication.product_name,
                manufacturer: medication.manufacturer,
                timestamp: now,
            })
            .await;

        Ok(id)
    }

    async fn add_tracking_event(
        &self,
        medication_id: &str,
        event: &str,
        location: &str,
        actor: &str,
        signature: Option<&str>,
    ) -> Result<TransactionHash, LedgerError> {
        require_non_empty("medicationId", medication_id)?;
        let kind: EventKind = event.parse()?;
        require_non_empty("location", location)?;
        require_non_empty("actor", actor)?;

        let _guard = self.locks.acquire(medication_id).await;
        let mut medication = self.require_medication(medication_id).await?;

        let appended = self
            .append_event_locked(&mut medication, kind, location, actor, signature)
            .await?;
        self.save_medication(&medication).await?;

        info!(
            "[medtrace] Tracking event {} for {} at {} by {}",
            kind, medication_id, location, actor
        );
        self.publisher
            .publish(LedgerEvent::TrackingEventAdded {
                medication_id: medication.id,
                event: kind,
                location: appended.location,
                actor: appended.actor,
                timestamp: appended.timestamp,
            })
            .await;

        Ok(appended.transaction_hash)
    }

    async fn issue_medication_recall(
        &self,
        medication_id: &str,
        reason: &str,
        issuer: Option<&str>,
    ) -> Result<TransactionHash, LedgerError> {
        require_non_empty("medicationId", medication_id)?;
        require_non_empty("reason", reason)?;
        let issuer = issuer
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.config.default_recall_issuer.as_str())
            .to_string();

        let _guard = self.locks.acquire(medication_id).await;
        let mut medication = self.require_medication(medication_id).await?;

        let appended = self
            .append_event_locked(
                &mut medication,
                EventKind::Recall,
                &self.config.recall_location,
                &issuer,
                None,
            )
            .await?;
        medication.mark_recalled(reason);
        self.save_medication(&medication).await?;

        info!(
            "[medtrace] Recall issued for {} by {}: {}",
            medication_id, issuer, reason
        );
        self.publisher
            .publish(LedgerEvent::MedicationRecalled {
                medication_id: medication.id,
                reason: reason.to_string(),
                issuer,
                timestamp: appended.timestamp,
            })
            .await;

        Ok(appended.transaction_hash)
    }

    async fn verify_medication(
        &self,
        medication_id: &str,
    ) -> Result<VerificationResult, LedgerError> {
        let now = self.clock.now();
        let Some(medication) = self.load_medication(medication_id).await? else {
            debug!("[medtrace] Verification of unknown id {}", medication_id);
            return Ok(VerificationResult::not_found(now));
        };
        let events = self.load_events(medication_id).await?;
        let result = verify(medication, events, now);

        debug!(
            "[medtrace] Verified {}: valid={} holder={:?}",
            medication_id, result.is_valid, result.current_holder
        );
        Ok(result)
    }
}
