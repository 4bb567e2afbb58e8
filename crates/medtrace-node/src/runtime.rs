//! # Node Runtime
//!
//! Wires the configured store, the system clock, random provenance tokens and
//! a broadcast publisher into one `TraceabilityService`.

use std::sync::Arc;

use medtrace_ledger::{
    BroadcastEventPublisher, InMemoryLedgerStore, LedgerEvent, LedgerStore, RandomProvenance,
    SystemTimeSource, TraceabilityDependencies, TraceabilityService,
};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::{NodeConfig, StorageConfig, StoreKind};
use crate::storage::FileLedgerStore;

/// The service type the node runs.
pub type NodeService = TraceabilityService<
    Arc<dyn LedgerStore>,
    RandomProvenance,
    SystemTimeSource,
    BroadcastEventPublisher,
>;

/// Open the backend selected by `config`.
pub fn open_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn LedgerStore>> {
    let store: Arc<dyn LedgerStore> = match config.kind {
        StoreKind::Memory => Arc::new(InMemoryLedgerStore::new()),
        StoreKind::File => Arc::new(FileLedgerStore::open(
            config.ledger_file(),
            config.sync_writes,
        )?),
        StoreKind::RocksDb => open_rocksdb(config)?,
    };
    info!(
        "[medtrace] Ledger store: {} ({})",
        config.kind,
        config.data_dir.display()
    );
    Ok(store)
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(config: &StorageConfig) -> anyhow::Result<Arc<dyn LedgerStore>> {
    Ok(Arc::new(crate::storage::RocksDbLedgerStore::open(
        config.rocksdb_path(),
        config.sync_writes,
    )?))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(config: &StorageConfig) -> anyhow::Result<Arc<dyn LedgerStore>> {
    Err(crate::config::ConfigError::BackendUnavailable(config.kind).into())
}

/// A running ledger node.
pub struct Node {
    service: NodeService,
    publisher: BroadcastEventPublisher,
}

impl Node {
    /// Open the store and build the service.
    pub fn open(config: &NodeConfig) -> anyhow::Result<Self> {
        let store = open_store(&config.storage)?;
        Ok(Self::with_store(store, config))
    }

    /// Build the service over an already opened store.
    pub fn with_store(store: Arc<dyn LedgerStore>, config: &NodeConfig) -> Self {
        let publisher = BroadcastEventPublisher::default();
        let service = TraceabilityService::new(
            TraceabilityDependencies {
                store,
                provenance: RandomProvenance,
                clock: SystemTimeSource,
                publisher: publisher.clone(),
            },
            config.ledger.clone(),
        );
        Self { service, publisher }
    }

    /// The traceability service.
    pub fn service(&self) -> &NodeService {
        &self.service
    }

    /// Notification publisher shared with the service.
    pub fn publisher(&self) -> &BroadcastEventPublisher {
        &self.publisher
    }

    /// Log every ledger notification until the publisher goes away.
    ///
    /// The task resolves to the number of notifications logged once every
    /// sender is dropped; see [`Node::shutdown`].
    pub fn spawn_event_logger(&self) -> JoinHandle<u64> {
        let mut rx = self.publisher.subscribe();
        tokio::spawn(async move {
            let mut logged = 0;
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        log_ledger_event(&event);
                        logged += 1;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("[medtrace] Event logger lagged, {} notifications dropped", skipped)
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            logged
        })
    }

    /// Close the node and wait for `logger` to drain what was published.
    pub async fn shutdown(self, logger: JoinHandle<u64>) -> u64 {
        // Service and node hold the only senders; dropping both closes the channel.
        drop(self);
        match logger.await {
            Ok(logged) => logged,
            Err(e) => {
                warn!("[medtrace] Event logger task failed: {}", e);
                0
            }
        }
    }
}

fn log_ledger_event(event: &LedgerEvent) {
    match event {
        LedgerEvent::MedicationCommissioned {
            medication_id,
            product_name,
            ..
        } => info!(medication_id = %medication_id, product = %product_name, "MedicationCommissioned"),
        LedgerEvent::TrackingEventAdded {
            medication_id,
            event,
            location,
            ..
        } => info!(medication_id = %medication_id, event = %event, location = %location, "TrackingEventAdded"),
        LedgerEvent::MedicationRecalled {
            medication_id,
            issuer,
            ..
        } => warn!(medication_id = %medication_id, issuer = %issuer, "MedicationRecalled"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medtrace_ledger::{CommissionRequest, LedgerQueryApi, TraceabilityApi};

    fn memory_config() -> NodeConfig {
        let mut config = NodeConfig::default();
        config.storage.kind = StoreKind::Memory;
        config
    }

    #[tokio::test]
    async fn test_memory_node_round_trip() {
        let node = Node::open(&memory_config()).unwrap();
        let mut rx = node.publisher().subscribe();

        let id = node
            .service()
            .commission_medication(CommissionRequest::new(
                "1", "B", "S", "2030-01-01", "Maker", "Product", "Plant",
            ))
            .await
            .unwrap();
        assert_eq!(
            node.service().get_medication(id.as_str()).await.unwrap().id,
            id
        );
        assert_eq!(rx.recv().await.unwrap().name(), "MedicationCommissioned");
    }

    #[tokio::test]
    async fn test_file_node_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = NodeConfig::default();
        config.storage.data_dir = dir.path().to_path_buf();
        config.storage.sync_writes = false;

        let id = {
            let node = Node::open(&config).unwrap();
            node.service()
                .commission_medication(CommissionRequest::new(
                    "1", "B", "S", "2030-01-01", "Maker", "Product", "Plant",
                ))
                .await
                .unwrap()
        };

        let node = Node::open(&config).unwrap();
        let history = node
            .service()
            .get_tracking_history(id.as_str())
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_drains_every_notification() {
        let node = Node::open(&memory_config()).unwrap();
        let logger = node.spawn_event_logger();

        let id = node
            .service()
            .commission_medication(CommissionRequest::new(
                "1", "B", "S", "2030-01-01", "Maker", "Product", "Plant",
            ))
            .await
            .unwrap();
        node.service()
            .add_tracking_event(id.as_str(), "ship", "Callao", "Carrier", None)
            .await
            .unwrap();
        node.service()
            .issue_medication_recall(id.as_str(), "contamination", None)
            .await
            .unwrap();

        let logged = tokio::time::timeout(std::time::Duration::from_secs(5), node.shutdown(logger))
            .await
            .unwrap();
        assert_eq!(logged, 3);
    }

    #[tokio::test]
    async fn test_file_node_refuses_concurrent_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = NodeConfig::default();
        config.storage.data_dir = dir.path().to_path_buf();
        config.storage.sync_writes = false;

        let first = Node::open(&config).unwrap();
        let err = Node::open(&config).err().unwrap();
        assert!(err.to_string().contains("in use"), "{err}");

        first
            .service()
            .commission_medication(CommissionRequest::new(
                "1", "B", "S1", "2030-01-01", "Maker", "Product", "Plant",
            ))
            .await
            .unwrap();
        drop(first);

        let second = Node::open(&config).unwrap();
        second
            .service()
            .commission_medication(CommissionRequest::new(
                "1", "B", "S2", "2030-01-01", "Maker", "Product", "Plant",
            ))
            .await
            .unwrap();
        drop(second);

        let node = Node::open(&config).unwrap();
        let stats = node.service().get_verification_stats().await.unwrap();
        assert_eq!(stats.total, 2);
    }

    #[cfg(not(feature = "rocksdb"))]
    #[test]
    fn test_rocksdb_unavailable_without_feature() {
        let mut config = NodeConfig::default();
        config.storage.kind = StoreKind::RocksDb;
        let err = open_store(&config.storage).err().unwrap();
        assert!(err.to_string().contains("rocksdb"));
    }
}
