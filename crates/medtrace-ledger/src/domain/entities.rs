//! # Domain Entities
//!
//! The `Medication` aggregate and the `TrackingEvent` entries of its log.
//!
//! Field names serialize in camelCase so stored records keep the layout of the
//! existing ledger data (`serialNumber`, `commissionTime`, `transactionHash`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::LedgerError;
use super::value_objects::{MedicationId, TransactionHash};

/// Lifecycle status of a medication unit.
///
/// Only two values exist. `VerificationStats` relies on that exhaustiveness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationStatus {
    /// Registered and not recalled.
    Commissioned,
    /// Recalled; terminal.
    Recalled,
}

impl MedicationStatus {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicationStatus::Commissioned => "commissioned",
            MedicationStatus::Recalled => "recalled",
        }
    }
}

impl fmt::Display for MedicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of custody or state change recorded in a tracking event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// First registration by the manufacturer.
    Commission,
    /// Left a site.
    Ship,
    /// Arrived at a site.
    Receive,
    /// Handed to a patient.
    Dispense,
    /// Withdrawn by an authority.
    Recall,
}

impl EventKind {
    /// All event kinds, in lifecycle order.
    pub const ALL: [EventKind; 5] = [
        EventKind::Commission,
        EventKind::Ship,
        EventKind::Receive,
        EventKind::Dispense,
        EventKind::Recall,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Commission => "commission",
            EventKind::Ship => "ship",
            EventKind::Receive => "receive",
            EventKind::Dispense => "dispense",
            EventKind::Recall => "recall",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(LedgerError::missing("event"));
        }
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                LedgerError::invalid(
                    "event",
                    format!(
                        "unknown event kind '{}' (expected commission, ship, receive, dispense or recall)",
                        name
                    ),
                )
            })
    }
}

/// Medication aggregate root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    /// Identity derived from `(gtin, batch, serial_number)`.
    pub id: MedicationId,
    /// Global Trade Item Number.
    pub gtin: String,
    /// Production batch.
    pub batch: String,
    /// Unit serial number.
    pub serial_number: String,
    /// Expiry date (no time component).
    pub expiry_date: NaiveDate,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Commercial product name.
    pub product_name: String,
    /// Most recent known location.
    pub location: String,
    /// Lifecycle status.
    pub status: MedicationStatus,
    /// Ledger time of commissioning.
    pub commission_time: DateTime<Utc>,
    /// Reason for the recall, present once recalled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recall_reason: Option<String>,
    /// Provenance token assigned at commission time.
    pub transaction_hash: TransactionHash,
}

impl Medication {
    /// Has this unit been recalled?
    pub fn is_recalled(&self) -> bool {
        self.status == MedicationStatus::Recalled
    }

    /// Mirror the location of a newly appended event.
    pub(crate) fn relocate(&mut self, location: &str) {
        self.location = location.to_string();
    }

    /// Apply a recall. Idempotent for status; the reason is overwritten.
    pub(crate) fn mark_recalled(&mut self, reason: &str) {
        self.status = MedicationStatus::Recalled;
        self.recall_reason = Some(reason.to_string());
    }

    /// Does every (already lowercased) token occur in the searchable text?
    pub fn matches_tokens(&self, tokens: &[String]) -> bool {
        let haystack = format!(
            "{} {} {} {}",
            self.product_name, self.manufacturer, self.batch, self.gtin
        )
        .to_lowercase();
        tokens.iter().all(|token| haystack.contains(token.as_str()))
    }
}

/// Immutable entry in a medication's event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    /// What happened.
    pub event: EventKind,
    /// Where it happened.
    pub location: String,
    /// Ledger time of the append.
    pub timestamp: DateTime<Utc>,
    /// Person or entity responsible.
    pub actor: String,
    /// Owning medication.
    pub medication_id: MedicationId,
    /// Opaque signature supplied by the caller; stored, never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Per-event provenance token.
    pub transaction_hash: TransactionHash,
}
