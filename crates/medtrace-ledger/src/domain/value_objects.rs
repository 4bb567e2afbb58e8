//! # Value Objects
//!
//! Identifiers, storage keys, request/response shapes and ledger notifications.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entities::{EventKind, Medication, MedicationStatus, TrackingEvent};

/// Issuer recorded on a recall when none is supplied.
pub const DEFAULT_RECALL_ISSUER: &str = "DIGEMID";

/// Location recorded on every recall event.
pub const RECALL_LOCATION: &str = "Sistema Central";

/// Opaque provenance token attached to aggregates and events.
pub type TransactionHash = String;

/// Medication identifier derived from the natural key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedicationId(String);

impl MedicationId {
    /// Wrap an already computed id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MedicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MedicationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MedicationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for MedicationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Key prefixes for the ledger store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPrefix {
    /// Medication aggregate: `med_{id}` -> Medication
    Medication,
    /// Event log: `events_{id}` -> [TrackingEvent]
    Events,
}

impl KeyPrefix {
    /// Get the byte prefix for this key type.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::Medication => b"med_",
            KeyPrefix::Events => b"events_",
        }
    }

    /// Build a full key with the given suffix.
    pub fn key(&self, suffix: &str) -> Vec<u8> {
        let mut key = self.as_bytes().to_vec();
        key.extend_from_slice(suffix.as_bytes());
        key
    }

    /// Key of a medication aggregate.
    pub fn medication_key(id: &str) -> Vec<u8> {
        KeyPrefix::Medication.key(id)
    }

    /// Key of a medication's event log.
    pub fn events_key(id: &str) -> Vec<u8> {
        KeyPrefix::Events.key(id)
    }
}

/// Input for commissioning a new medication unit.
///
/// `expiry_date` is kept as text here and parsed by the engine so that a
/// malformed date surfaces as a validation error on the `expiryDate` field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRequest {
    /// Global Trade Item Number
    pub gtin: String,
    /// Production batch
    pub batch: String,
    /// Unit serial number
    pub serial_number: String,
    /// Expiry date, `YYYY-MM-DD`
    pub expiry_date: String,
    /// Manufacturer name
    pub manufacturer: String,
    /// Commercial product name
    pub product_name: String,
    /// Commissioning site
    pub location: String,
}

impl CommissionRequest {
    /// Build a request from its seven fields.
    pub fn new(
        gtin: impl Into<String>,
        batch: impl Into<String>,
        serial_number: impl Into<String>,
        expiry_date: impl Into<String>,
        manufacturer: impl Into<String>,
        product_name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            gtin: gtin.into(),
            batch: batch.into(),
            serial_number: serial_number.into(),
            expiry_date: expiry_date.into(),
            manufacturer: manufacturer.into(),
            product_name: product_name.into(),
            location: location.into(),
        }
    }

    /// Parse `expiry_date` as a calendar date.
    pub fn parsed_expiry(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.expiry_date.trim(), "%Y-%m-%d").ok()
    }
}

/// Result of verifying a medication unit. Computed, never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// No recall event and status not recalled.
    pub is_valid: bool,
    /// The aggregate, if it exists.
    pub medication_data: Option<Medication>,
    /// Events sorted ascending by timestamp.
    pub tracking_history: Vec<TrackingEvent>,
    /// Actor of the latest event, or the manufacturer if the log is empty.
    pub current_holder: Option<String>,
    /// Commission-time provenance token of the aggregate.
    pub blockchain_hash: Option<TransactionHash>,
    /// Ledger time at which the verification was computed.
    pub verification_time: DateTime<Utc>,
}

impl VerificationResult {
    /// Negative result for an unknown id.
    pub fn not_found(now: DateTime<Utc>) -> Self {
        Self {
            is_valid: false,
            medication_data: None,
            tracking_history: Vec::new(),
            current_holder: None,
            blockchain_hash: None,
            verification_time: now,
        }
    }
}

/// Ledger-wide status counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStats {
    /// All medications.
    pub total: u64,
    /// Medications with status `commissioned`.
    pub authentic: u64,
    /// Medications with status `recalled`.
    pub alerts_active: u64,
}

impl VerificationStats {
    /// Count one medication.
    pub fn record(&mut self, status: MedicationStatus) {
        self.total += 1;
        match status {
            MedicationStatus::Commissioned => self.authentic += 1,
            MedicationStatus::Recalled => self.alerts_active += 1,
        }
    }
}

/// Notifications emitted after successful ledger writes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LedgerEvent {
    /// A medication unit was commissioned.
    #[serde(rename_all = "camelCase")]
    MedicationCommissioned {
        /// New medication id
        medication_id: MedicationId,
        /// Product name
        product_name: String,
        /// Manufacturer name
        manufacturer: String,
        /// Commission time
        timestamp: DateTime<Utc>,
    },
    /// A tracking event was appended.
    #[serde(rename_all = "camelCase")]
    TrackingEventAdded {
        /// Medication id
        medication_id: MedicationId,
        /// Event kind
        event: EventKind,
        /// Event location
        location: String,
        /// Event actor
        actor: String,
        /// Event timestamp
        timestamp: DateTime<Utc>,
    },
    /// A recall was issued.
    #[serde(rename_all = "camelCase")]
    MedicationRecalled {
        /// Medication id
        medication_id: MedicationId,
        /// Recall reason
        reason: String,
        /// Recall issuer
        issuer: String,
        /// Recall event timestamp
        timestamp: DateTime<Utc>,
    },
}

impl LedgerEvent {
    /// Medication the notification is about.
    pub fn medication_id(&self) -> &MedicationId {
        match self {
            LedgerEvent::MedicationCommissioned { medication_id, .. }
            | LedgerEvent::TrackingEventAdded { medication_id, .. }
            | LedgerEvent::MedicationRecalled { medication_id, .. } => medication_id,
        }
    }

    /// Notification name.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::MedicationCommissioned { .. } => "MedicationCommissioned",
            LedgerEvent::TrackingEventAdded { .. } => "TrackingEventAdded",
            LedgerEvent::MedicationRecalled { .. } => "MedicationRecalled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(KeyPrefix::medication_key("abc"), b"med_abc".to_vec());
        assert_eq!(KeyPrefix::events_key("abc"), b"events_abc".to_vec());
    }

    #[test]
    fn test_expiry_parsing() {
        let mut request = CommissionRequest {
            expiry_date: "2025-12-31".to_string(),
            ..Default::default()
        };
        assert_eq!(
            request.parsed_expiry(),
            NaiveDate::from_ymd_opt(2025, 12, 31)
        );

        request.expiry_date = "31/12/2025".to_string();
        assert!(request.parsed_expiry().is_none());

        request.expiry_date = "2025-02-30".to_string();
        assert!(request.parsed_expiry().is_none());
    }

    #[test]
    fn test_stats_tally() {
        let mut stats = VerificationStats::default();
        stats.record(MedicationStatus::Commissioned);
        stats.record(MedicationStatus::Commissioned);
        stats.record(MedicationStatus::Recalled);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.authentic + stats.alerts_active, stats.total);
        assert_eq!(stats.alerts_active, 1);
    }

    #[test]
    fn test_stats_json_names() {
        let json = serde_json::to_value(VerificationStats::default()).unwrap();
        assert!(json.get("alertsActive").is_some());
    }

    #[test]
    fn test_ledger_event_tagging() {
        let event = LedgerEvent::MedicationRecalled {
            medication_id: MedicationId::from("abc"),
            reason: "contamination".to_string(),
            issuer: DEFAULT_RECALL_ISSUER.to_string(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "MedicationRecalled");
        assert_eq!(json["medicationId"], "abc");
        assert_eq!(event.name(), "MedicationRecalled");
    }
}
