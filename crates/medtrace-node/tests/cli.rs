//! Command dispatch against a file-backed node, reopened between commands.

use medtrace_node::cli::{execute, Command};
use medtrace_node::{Node, NodeConfig, StoreKind};
use tempfile::TempDir;

fn file_config(dir: &TempDir) -> NodeConfig {
    let mut config = NodeConfig::default();
    config.storage.kind = StoreKind::File;
    config.storage.data_dir = dir.path().to_path_buf();
    config.storage.sync_writes = false;
    config
}

async fn run(config: &NodeConfig, command: Command) -> anyhow::Result<serde_json::Value> {
    let node = Node::open(config)?;
    execute(node.service(), command).await
}

#[tokio::test]
async fn test_lifecycle_survives_restarts() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);

    let out = run(
        &config,
        Command::Commission {
            gtin: "7501001234568".to_string(),
            batch: "IBU2024002".to_string(),
            serial: "987654321".to_string(),
            expiry: "2025-08-15".to_string(),
            manufacturer: "FarmaPeru S.A.C.".to_string(),
            product: "Ibuprofeno 400mg".to_string(),
            location: "Planta Arequipa".to_string(),
        },
    )
    .await
    .unwrap();
    let id = out["medicationId"].as_str().unwrap().to_string();

    let out = run(
        &config,
        Command::Track {
            id: id.clone(),
            event: "ship".to_string(),
            location: "Callao".to_string(),
            actor: "LogiMed".to_string(),
            signature: Some("sig".to_string()),
        },
    )
    .await
    .unwrap();
    assert!(out["transactionHash"].is_string());

    run(
        &config,
        Command::Recall {
            id: id.clone(),
            reason: "Quality issue detected in batch".to_string(),
            issuer: None,
        },
    )
    .await
    .unwrap();

    let verification = run(&config, Command::Verify { id: id.clone() }).await.unwrap();
    assert_eq!(verification["isValid"], false);
    assert_eq!(verification["currentHolder"], "DIGEMID");
    assert_eq!(verification["trackingHistory"].as_array().unwrap().len(), 3);

    let stats = run(&config, Command::Stats).await.unwrap();
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["alertsActive"], 1);

    let listed = run(
        &config,
        Command::ByManufacturer {
            name: "FarmaPeru S.A.C.".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(listed[0]["status"], "recalled");
    assert_eq!(listed[0]["location"], "Sistema Central");
}

#[tokio::test]
async fn test_verify_unknown_id_is_soft_negative() {
    let dir = TempDir::new().unwrap();
    let out = run(&file_config(&dir), Command::Verify { id: "nope".to_string() })
        .await
        .unwrap();
    assert_eq!(out["isValid"], false);
    assert!(out["medicationData"].is_null());
}
