//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the traceability service.
//!
//! These are the interfaces the host application implements, or picks an
//! adapter for from `crate::adapters`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::{LedgerEvent, StoreError, TransactionHash};

/// Abstract key-value ledger store.
///
/// Production: `FileLedgerStore`, `RocksDbLedgerStore` (medtrace-node)
/// Testing: `InMemoryLedgerStore`
///
/// No multi-key atomicity is required. Same-id writers are serialized by the
/// service, so adapters only need per-key consistency.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Get a value by key.
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Put a single key-value pair, overwriting any previous value.
    async fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;

    /// All entries whose key starts with `prefix`, in key order.
    async fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;
}

/// Source of opaque provenance tokens.
pub trait ProvenanceSource: Send + Sync {
    /// A fresh token, unique for practical purposes.
    fn next_token(&self) -> TransactionHash;
}

/// Ledger-side clock.
pub trait TimeSource: Send + Sync {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Sink for ledger notifications. Publishing never fails an operation.
#[async_trait]
pub trait LedgerEventPublisher: Send + Sync {
    /// Deliver a notification to any listeners.
    async fn publish(&self, event: LedgerEvent);
}

#[async_trait]
impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key).await
    }

    async fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        (**self).put(key, value).await
    }

    async fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        (**self).scan_prefix(prefix).await
    }
}

impl<T: ProvenanceSource + ?Sized> ProvenanceSource for Arc<T> {
    fn next_token(&self) -> TransactionHash {
        (**self).next_token()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[async_trait]
impl<T: LedgerEventPublisher + ?Sized> LedgerEventPublisher for Arc<T> {
    async fn publish(&self, event: LedgerEvent) {
        (**self).publish(event).await
    }
}
