//! # Ledger Walk-Through
//!
//! Exercises every ledger operation against a throwaway in-memory ledger:
//! commission, five custody events, verification, queries, a second product,
//! a recall and the resulting statistics.

use anyhow::{ensure, Result};
use medtrace_ledger::{
    CommissionRequest, LedgerConfig, LedgerQueryApi, TraceabilityApi, TraceabilityService,
};
use serde_json::{json, Value};
use tracing::info;

const CUSTODY_CHAIN: [(&str, &str, &str, &str); 5] = [
    ("ship", "Centro Distribucion Lima", "LogiMed Peru", "sig1"),
    ("receive", "Centro Distribucion Lima", "LogiMed Peru", "sig2"),
    ("ship", "Ruta Lima - Miraflores", "Transporte Seguro SAC", "sig3"),
    ("receive", "Farmacia San Juan, Miraflores", "Farmacia San Juan", "sig4"),
    ("dispense", "Farmacia San Juan, Miraflores", "Dra. Maria Gonzalez", "sig5"),
];

/// Run the walk-through and return a JSON report of each step.
pub async fn run() -> Result<Value> {
    let ledger = TraceabilityService::new_in_memory(LedgerConfig::default());

    info!("[medtrace] Demo: commissioning Paracetamol 500mg");
    let first = ledger
        .commission_medication(CommissionRequest::new(
            "7501001234567",
            "PCT2024001",
            "123456789",
            "2025-12-31",
            "Laboratorios Unidos S.A.",
            "Paracetamol 500mg",
            "Planta Lima",
        ))
        .await?;

    for (event, location, actor, signature) in CUSTODY_CHAIN {
        ledger
            .add_tracking_event(first.as_str(), event, location, actor, Some(signature))
            .await?;
    }

    let verification = ledger.verify_medication(first.as_str()).await?;
    ensure!(verification.is_valid, "freshly tracked unit must be valid");
    ensure!(
        verification.tracking_history.len() == CUSTODY_CHAIN.len() + 1,
        "every custody event must be recorded"
    );

    let medication = ledger.get_medication(first.as_str()).await?;
    let history = ledger.get_tracking_history(first.as_str()).await?;
    let search = ledger.search_medications("Paracetamol").await?;
    let stats_before = ledger.get_verification_stats().await?;

    info!("[medtrace] Demo: commissioning and recalling Ibuprofeno 400mg");
    let second = ledger
        .commission_medication(CommissionRequest::new(
            "7501001234568",
            "IBU2024002",
            "987654321",
            "2025-08-15",
            "FarmaPeru S.A.C.",
            "Ibuprofeno 400mg",
            "Planta Arequipa",
        ))
        .await?;
    ledger
        .issue_medication_recall(second.as_str(), "Quality issue detected in batch", Some("DIGEMID"))
        .await?;

    let stats_after = ledger.get_verification_stats().await?;
    let by_manufacturer = ledger
        .get_medications_by_manufacturer("FarmaPeru S.A.C.")
        .await?;
    let recalled = ledger.verify_medication(second.as_str()).await?;
    ensure!(!recalled.is_valid, "recalled unit must not verify");

    info!("[medtrace] Demo complete");
    Ok(json!({
        "commissioned": first,
        "verification": {
            "isValid": verification.is_valid,
            "currentHolder": verification.current_holder,
            "events": verification.tracking_history.len(),
        },
        "medication": medication,
        "history": history.len(),
        "search": search.len(),
        "statsBefore": stats_before,
        "recalled": second,
        "statsAfter": stats_after,
        "byManufacturer": by_manufacturer.len(),
        "recalledIsValid": recalled.is_valid,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_report() {
        let report = run().await.unwrap();
        assert_eq!(report["verification"]["isValid"], true);
        assert_eq!(report["verification"]["currentHolder"], "Dra. Maria Gonzalez");
        assert_eq!(report["verification"]["events"], 6);
        assert_eq!(report["medication"]["location"], "Farmacia San Juan, Miraflores");
        assert_eq!(report["history"], 6);
        assert_eq!(report["search"], 1);
        assert_eq!(report["byManufacturer"], 1);
        assert_eq!(report["statsBefore"]["total"], 1);
        assert_eq!(report["statsAfter"]["total"], 2);
        assert_eq!(report["statsAfter"]["alertsActive"], 1);
        assert_eq!(report["recalledIsValid"], false);
    }
}
