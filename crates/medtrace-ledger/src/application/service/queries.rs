//! # Query Service
//!
//! `LedgerQueryApi` implementation. Reads only; takes no locks.

use async_trait::async_trait;
use std::cmp::Reverse;
use tracing::debug;

use super::*;
use crate::domain::{
    search_tokens, LedgerError, Medication, TrackingEvent, VerificationStats,
};
use crate::ports::inbound::LedgerQueryApi;

#[async_trait]
impl<S, P, C, E> LedgerQueryApi for TraceabilityService<S, P, C, E>
where
    S: LedgerStore,
    P: ProvenanceSource,
    C: TimeSource,
    E: LedgerEventPublisher,
{
    async fn get_medication(&self, medication_id: &str) -> Result<Medication, LedgerError> {
        self.require_medication(medication_id).await
    }

    async fn get_tracking_history(
        &self,
        medication_id: &str,
    ) -> Result<Vec<TrackingEvent>, LedgerError> {
        self.load_events(medication_id).await
    }

    async fn get_medications_by_manufacturer(
        &self,
        manufacturer: &str,
    ) -> Result<Vec<Medication>, LedgerError> {
        let mut results: Vec<Medication> = self
            .scan_medications()
            .await?
            .into_iter()
            .filter(|m| m.manufacturer == manufacturer)
            .collect();
        results.sort_by(|a, b| a.id.cmp(&b.id));

        debug!(
            "[medtrace] {} medications from manufacturer '{}'",
            results.len(),
            manufacturer
        );
        Ok(results)
    }

    async fn search_medications(&self, query: &str) -> Result<Vec<Medication>, LedgerError> {
        let tokens = search_tokens(query);
        let mut results: Vec<Medication> = self
            .scan_medications()
            .await?
            .into_iter()
            .filter(|m| m.matches_tokens(&tokens))
            .collect();
        results.sort_by_key(|m| Reverse(m.commission_time));

        debug!(
            "[medtrace] Search '{}' matched {} medications",
            query,
            results.len()
        );
        Ok(results)
    }

    async fn get_verification_stats(&self) -> Result<VerificationStats, LedgerError> {
        let mut stats = VerificationStats::default();
        for medication in self.scan_medications().await? {
            stats.record(medication.status);
        }
        Ok(stats)
    }
}
