//! # Inbound Ports (Driving Ports)
//!
//! The operations callers invoke on the ledger.

use async_trait::async_trait;

use crate::domain::{
    CommissionRequest, LedgerError, Medication, MedicationId, TrackingEvent, TransactionHash,
    VerificationResult, VerificationStats,
};

/// State-changing ledger operations plus verification.
#[async_trait]
pub trait TraceabilityApi: Send + Sync {
    /// Register a new medication unit.
    ///
    /// Fails with `Validation` if any field is empty or the expiry date does
    /// not parse, and with `Conflict` if the derived id already exists.
    async fn commission_medication(
        &self,
        request: CommissionRequest,
    ) -> Result<MedicationId, LedgerError>;

    /// Append a custody event and move the medication to `location`.
    ///
    /// `event` is one of `commission`, `ship`, `receive`, `dispense`, `recall`
    /// (case-insensitive). Returns the new event's provenance token.
    async fn add_tracking_event(
        &self,
        medication_id: &str,
        event: &str,
        location: &str,
        actor: &str,
        signature: Option<&str>,
    ) -> Result<TransactionHash, LedgerError>;

    /// Recall a medication. `issuer` defaults to the configured authority.
    ///
    /// Repeated recalls are accepted and append another recall event.
    async fn issue_medication_recall(
        &self,
        medication_id: &str,
        reason: &str,
        issuer: Option<&str>,
    ) -> Result<TransactionHash, LedgerError>;

    /// Verify authenticity and validity. An unknown id yields a negative
    /// result, not an error.
    async fn verify_medication(&self, medication_id: &str)
        -> Result<VerificationResult, LedgerError>;
}

/// Read-only ledger queries.
#[async_trait]
pub trait LedgerQueryApi: Send + Sync {
    /// Fetch one medication. `NotFound` if absent.
    async fn get_medication(&self, medication_id: &str) -> Result<Medication, LedgerError>;

    /// Event log in append order; empty for unknown ids.
    async fn get_tracking_history(
        &self,
        medication_id: &str,
    ) -> Result<Vec<TrackingEvent>, LedgerError>;

    /// Medications whose manufacturer equals `manufacturer` exactly, by id.
    async fn get_medications_by_manufacturer(
        &self,
        manufacturer: &str,
    ) -> Result<Vec<Medication>, LedgerError>;

    /// Token search over product name, manufacturer, batch and GTIN,
    /// newest commission first.
    async fn search_medications(&self, query: &str) -> Result<Vec<Medication>, LedgerError>;

    /// Counts of all, commissioned and recalled medications.
    async fn get_verification_stats(&self) -> Result<VerificationStats, LedgerError>;
}
