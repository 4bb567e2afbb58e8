//! # Domain Invariants
//!
//! Pure rules over medications and their event logs. The service calls these;
//! nothing here touches storage.

use chrono::{DateTime, Utc};

use super::entities::{EventKind, Medication, MedicationStatus, TrackingEvent};
use super::errors::LedgerError;
use super::value_objects::{CommissionRequest, VerificationResult};

/// Reject empty or whitespace-only input.
pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::missing(field));
    }
    Ok(())
}

/// All seven commission fields must be present.
pub fn validate_commission(request: &CommissionRequest) -> Result<(), LedgerError> {
    require_non_empty("gtin", &request.gtin)?;
    require_non_empty("batch", &request.batch)?;
    require_non_empty("serialNumber", &request.serial_number)?;
    require_non_empty("expiryDate", &request.expiry_date)?;
    require_non_empty("manufacturer", &request.manufacturer)?;
    require_non_empty("productName", &request.product_name)?;
    require_non_empty("location", &request.location)?;
    Ok(())
}

/// The first event of a non-empty log must be a commission.
pub fn commission_first(events: &[TrackingEvent]) -> bool {
    events
        .first()
        .map_or(true, |first| first.event == EventKind::Commission)
}

/// Does the log contain a recall event?
pub fn has_recall(events: &[TrackingEvent]) -> bool {
    events.iter().any(|e| e.event == EventKind::Recall)
}

/// Valid iff never recalled, by status or by event.
pub fn is_valid(medication: &Medication, events: &[TrackingEvent]) -> bool {
    medication.status != MedicationStatus::Recalled && !has_recall(events)
}

/// Actor of the latest event in `sorted`, falling back to the manufacturer.
pub fn current_holder(medication: &Medication, sorted: &[TrackingEvent]) -> String {
    sorted
        .last()
        .map(|e| e.actor.clone())
        .unwrap_or_else(|| medication.manufacturer.clone())
}

/// Timestamp for a new event: never earlier than the previous event.
pub fn next_timestamp(now: DateTime<Utc>, events: &[TrackingEvent]) -> DateTime<Utc> {
    match events.last() {
        Some(previous) if previous.timestamp > now => previous.timestamp,
        _ => now,
    }
}

/// Stable sort by timestamp; equal timestamps keep append order.
pub fn sort_by_timestamp(mut events: Vec<TrackingEvent>) -> Vec<TrackingEvent> {
    events.sort_by_key(|e| e.timestamp);
    events
}

/// Build the verification view of an existing medication.
pub fn verify(
    medication: Medication,
    events: Vec<TrackingEvent>,
    now: DateTime<Utc>,
) -> VerificationResult {
    let history = sort_by_timestamp(events);
    let valid = is_valid(&medication, &history);
    let holder = current_holder(&medication, &history);
    let blockchain_hash = medication.transaction_hash.clone();

    VerificationResult {
        is_valid: valid,
        medication_data: Some(medication),
        tracking_history: history,
        current_holder: Some(holder),
        blockchain_hash: Some(blockchain_hash),
        verification_time: now,
    }
}

/// Split a search query into lowercase whitespace-separated tokens.
pub fn search_tokens(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MedicationId;
    use chrono::{Duration, NaiveDate};

    fn medication() -> Medication {
        Medication {
            id: MedicationId::from("m1"),
            gtin: "g".to_string(),
            batch: "b".to_string(),
            serial_number: "s".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            manufacturer: "Maker".to_string(),
            product_name: "Product".to_string(),
            location: "Plant".to_string(),
            status: MedicationStatus::Commissioned,
            commission_time: DateTime::<Utc>::UNIX_EPOCH,
            recall_reason: None,
            transaction_hash: "tx-commission".to_string(),
        }
    }

    fn event(kind: EventKind, actor: &str, secs: i64) -> TrackingEvent {
        TrackingEvent {
            event: kind,
            location: "somewhere".to_string(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(secs),
            actor: actor.to_string(),
            medication_id: MedicationId::from("m1"),
            signature: None,
            transaction_hash: format!("tx-{secs}"),
        }
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("actor", "x").is_ok());
        assert!(require_non_empty("actor", "").is_err());
        assert!(require_non_empty("actor", "   ").is_err());
    }

    #[test]
    fn test_validate_commission_names_field() {
        let request = CommissionRequest::new("g", "b", "s", "2030-01-01", "m", "", "l");
        match validate_commission(&request) {
            Err(LedgerError::Validation { field, .. }) => assert_eq!(field, "productName"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_commission_first() {
        assert!(commission_first(&[]));
        assert!(commission_first(&[event(EventKind::Commission, "a", 0)]));
        assert!(!commission_first(&[event(EventKind::Ship, "a", 0)]));
    }

    #[test]
    fn test_recall_event_invalidates_even_if_status_commissioned() {
        let med = medication();
        let events = vec![
            event(EventKind::Commission, "Maker", 0),
            event(EventKind::Recall, "DIGEMID", 1),
        ];
        assert!(!is_valid(&med, &events));
    }

    #[test]
    fn test_current_holder_fallback() {
        let med = medication();
        assert_eq!(current_holder(&med, &[]), "Maker");
        let events = vec![
            event(EventKind::Commission, "Maker", 0),
            event(EventKind::Ship, "Carrier", 5),
        ];
        assert_eq!(current_holder(&med, &events), "Carrier");
    }

    #[test]
    fn test_next_timestamp_never_goes_backwards() {
        let events = vec![event(EventKind::Commission, "Maker", 100)];
        let earlier = DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(50);
        let later = DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(150);
        assert_eq!(next_timestamp(earlier, &events), events[0].timestamp);
        assert_eq!(next_timestamp(later, &events), later);
        assert_eq!(next_timestamp(earlier, &[]), earlier);
    }

    #[test]
    fn test_verify_sorts_and_uses_commission_hash() {
        let events = vec![
            event(EventKind::Commission, "Maker", 0),
            event(EventKind::Receive, "Pharmacy", 20),
            event(EventKind::Ship, "Carrier", 10),
        ];
        let result = verify(medication(), events, DateTime::<Utc>::UNIX_EPOCH);
        assert!(result.is_valid);
        assert_eq!(result.current_holder.as_deref(), Some("Pharmacy"));
        assert_eq!(result.blockchain_hash.as_deref(), Some("tx-commission"));
        let kinds: Vec<_> = result.tracking_history.iter().map(|e| e.event).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Commission, EventKind::Ship, EventKind::Receive]
        );
    }

    #[test]
    fn test_search_tokens() {
        assert_eq!(search_tokens("  Paracetamol  500MG "), vec!["paracetamol", "500mg"]);
        assert!(search_tokens("   ").is_empty());
    }
}
