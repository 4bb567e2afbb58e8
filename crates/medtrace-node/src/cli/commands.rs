//! Command dispatch.

use anyhow::Result;
use medtrace_ledger::{CommissionRequest, LedgerQueryApi, TraceabilityApi};
use serde_json::{json, Value};

use super::Command;
use crate::demo;

/// Run one command against `api` and return its JSON result.
pub async fn execute<A>(api: &A, command: Command) -> Result<Value>
where
    A: TraceabilityApi + LedgerQueryApi,
{
    let value = match command {
        Command::Commission {
            gtin,
            batch,
            serial,
            expiry,
            manufacturer,
            product,
            location,
        } => {
            let id = api
                .commission_medication(CommissionRequest {
                    gtin,
                    batch,
                    serial_number: serial,
                    expiry_date: expiry,
                    manufacturer,
                    product_name: product,
                    location,
                })
                .await?;
            json!({ "success": true, "medicationId": id })
        }
        Command::Track {
            id,
            event,
            location,
            actor,
            signature,
        } => {
            let tx = api
                .add_tracking_event(&id, &event, &location, &actor, signature.as_deref())
                .await?;
            json!({ "success": true, "transactionHash": tx })
        }
        Command::Recall { id, reason, issuer } => {
            let tx = api
                .issue_medication_recall(&id, &reason, issuer.as_deref())
                .await?;
            json!({ "success": true, "transactionHash": tx })
        }
        Command::Verify { id } => serde_json::to_value(api.verify_medication(&id).await?)?,
        Command::Get { id } => serde_json::to_value(api.get_medication(&id).await?)?,
        Command::History { id } => serde_json::to_value(api.get_tracking_history(&id).await?)?,
        Command::ByManufacturer { name } => {
            serde_json::to_value(api.get_medications_by_manufacturer(&name).await?)?
        }
        Command::Search { terms } => {
            serde_json::to_value(api.search_medications(&terms.join(" ")).await?)?
        }
        Command::Stats => serde_json::to_value(api.get_verification_stats().await?)?,
        Command::Demo => demo::run().await?,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medtrace_ledger::{LedgerConfig, LedgerError, LedgerErrorKind, TraceabilityService};

    fn commission() -> Command {
        Command::Commission {
            gtin: "7501001234567".to_string(),
            batch: "PCT2024001".to_string(),
            serial: "123456789".to_string(),
            expiry: "2025-12-31".to_string(),
            manufacturer: "Labs Unidos".to_string(),
            product: "Paracetamol 500mg".to_string(),
            location: "Planta Lima".to_string(),
        }
    }

    #[tokio::test]
    async fn test_commission_then_verify() {
        let service = TraceabilityService::new_in_memory(LedgerConfig::default());
        let out = execute(&service, commission()).await.unwrap();
        let id = out["medicationId"].as_str().unwrap().to_string();

        let out = execute(&service, Command::Verify { id: id.clone() })
            .await
            .unwrap();
        assert_eq!(out["isValid"], true);
        assert_eq!(out["currentHolder"], "Labs Unidos");

        let out = execute(
            &service,
            Command::Search {
                terms: vec!["paracetamol".to_string()],
            },
        )
        .await
        .unwrap();
        assert_eq!(out.as_array().unwrap().len(), 1);

        let out = execute(&service, Command::Stats).await.unwrap();
        assert_eq!(out["total"], 1);
    }

    #[tokio::test]
    async fn test_ledger_errors_surface() {
        let service = TraceabilityService::new_in_memory(LedgerConfig::default());
        let err = execute(&service, Command::Get { id: "missing".to_string() })
            .await
            .unwrap_err();
        let ledger_err = err.downcast_ref::<LedgerError>().unwrap();
        assert_eq!(ledger_err.kind(), LedgerErrorKind::NotFound);
    }
}
