//! # RocksDB Ledger Store
//!
//! Production RocksDB implementation of `LedgerStore`.
//!
//! - Snappy compression
//! - Bloom filters for point lookups
//! - Optional fsync on every write
//!
//! RocksDB calls block, so each one runs on tokio's blocking pool.

use async_trait::async_trait;
use medtrace_ledger::{LedgerStore, StoreError};
use rocksdb::{BlockBasedOptions, DBCompressionType, Direction, IteratorMode, Options, WriteOptions, DB};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// RocksDB-backed ledger store.
pub struct RocksDbLedgerStore {
    db: Arc<DB>,
    sync_writes: bool,
}

impl RocksDbLedgerStore {
    /// Open or create a database at `path`.
    pub fn open(path: impl AsRef<Path>, sync_writes: bool) -> Result<Self, StoreError> {
        let path = path.as_ref();

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(DBCompressionType::Snappy);

        let mut block_opts = BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, path)
            .map_err(|e| StoreError::io(format!("Failed to open RocksDB: {}", e)))?;
        info!("[medtrace] Opened RocksDB ledger at {}", path.display());

        Ok(Self {
            db: Arc::new(db),
            sync_writes,
        })
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&DB) -> Result<T, rocksdb::Error> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| StoreError::io(format!("RocksDB task failed: {}", e)))?
            .map_err(|e| StoreError::io(format!("RocksDB error: {}", e)))
    }
}

#[async_trait]
impl LedgerStore for RocksDbLedgerStore {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let key = key.to_vec();
        self.blocking(move |db| db.get(&key)).await
    }

    async fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        let key = key.to_vec();
        let sync = self.sync_writes;
        self.blocking(move |db| {
            let mut write_opts = WriteOptions::default();
            write_opts.set_sync(sync);
            db.put_opt(&key, &value, &write_opts)
        })
        .await
    }

    async fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let prefix = prefix.to_vec();
        self.blocking(move |db| {
            let mut results = Vec::new();
            for item in db.iterator(IteratorMode::From(prefix.as_slice(), Direction::Forward)) {
                let (key, value) = item?;
                if !key.starts_with(&prefix) {
                    break;
                }
                results.push((key.to_vec(), value.to_vec()));
            }
            Ok(results)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_scan() {
        let dir = tempfile::tempdir().unwrap();
        let store = RocksDbLedgerStore::open(dir.path(), false).unwrap();

        store.put(b"med_b", b"2".to_vec()).await.unwrap();
        store.put(b"med_a", b"1".to_vec()).await.unwrap();
        store.put(b"events_a", b"[]".to_vec()).await.unwrap();
        store.put(b"mee", b"x".to_vec()).await.unwrap();

        assert_eq!(store.get(b"med_a").await.unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get(b"med_z").await.unwrap(), None);

        let keys: Vec<_> = store
            .scan_prefix(b"med_")
            .await
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![b"med_a".to_vec(), b"med_b".to_vec()]);
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = RocksDbLedgerStore::open(dir.path(), true).unwrap();
            store.put(b"med_a", b"1".to_vec()).await.unwrap();
        }
        let store = RocksDbLedgerStore::open(dir.path(), true).unwrap();
        assert_eq!(store.get(b"med_a").await.unwrap(), Some(b"1".to_vec()));
    }
}
